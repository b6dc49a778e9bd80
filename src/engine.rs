use std::vec;

use tracing::warn;

use crate::entry::Entry;
use crate::error::ScanError;
use crate::lister::{list_children, ListOptions};
use crate::remote::DEFAULT_PAGE_SIZE;
use crate::traits::DriveService;

// ---------------------------------------------------------------------------
// ScanConfig
// ---------------------------------------------------------------------------

/// Traversal parameters shared by every level of a walk.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of listing levels allowed below the starting depth.
    /// `None` walks the whole tree.
    pub max_depth: Option<usize>,

    /// Type filter forwarded to every listing call. Empty means everything.
    pub mime_types: Vec<String>,

    /// Children requested per listing page.
    pub page_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth:  None,
            mime_types: Vec::new(),
            page_size:  DEFAULT_PAGE_SIZE,
        }
    }
}

impl ScanConfig {
    /// Whether a folder visited at `level` may be listed.
    ///
    /// `level` is already incremented for the folder's own visit, so the root
    /// of a walk started at depth 0 is checked as level 1. With
    /// `max_depth = 0` nothing is ever listed and only the root is emitted.
    pub fn allows(&self, level: usize) -> bool {
        self.max_depth.map_or(true, |max| level <= max)
    }

    fn list_options(&self) -> ListOptions<'_> {
        ListOptions {
            mime_types: &self.mime_types,
            page_size:  self.page_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// One node on the current root-to-leaf path.
struct Frame {
    entry:    Entry,
    level:    usize,
    children: Option<vec::IntoIter<Entry>>,
}

/// Lazy post-order walk over a remote folder tree.
///
/// Every folder's descendants are yielded before the folder itself; the root
/// comes last. Children of one folder are listed in a single call when the
/// folder is first reached, then visited one subtree at a time, so remote
/// calls happen only between items and never concurrently.
///
/// The first error is yielded once and ends the walk.
///
/// A folder whose id already appears among its own ancestors is yielded
/// without being listed again, which keeps self-containing trees finite.
pub struct Walk<'a> {
    service: Box<dyn DriveService + 'a>,
    config:  ScanConfig,
    stack:   Vec<Frame>,
}

impl<'a> Walk<'a> {
    /// Walk the tree below `root`, starting at depth 0.
    pub fn new(service: impl DriveService + 'a, root: Entry, config: ScanConfig) -> Self {
        Self::starting_at(service, root, config, 0)
    }

    /// Walk the tree below `root` as if `current_depth` levels had already
    /// been consumed from the depth budget.
    pub fn starting_at(
        service:       impl DriveService + 'a,
        root:          Entry,
        config:        ScanConfig,
        current_depth: usize,
    ) -> Self {
        Self {
            service: Box::new(service),
            config,
            stack:   vec![Frame {
                entry:    root,
                level:    current_depth.saturating_add(1),
                children: None,
            }],
        }
    }

    /// List the children of the frame at `index`, or nothing if the frame is
    /// a file, out of depth budget, or already on its own ancestor chain.
    fn expand(&self, index: usize) -> Result<Vec<Entry>, ScanError> {
        let frame = &self.stack[index];
        if !frame.entry.is_folder() || !self.config.allows(frame.level) {
            return Ok(Vec::new());
        }

        let id = frame.entry.id();
        if self.stack[..index].iter().any(|f| f.entry.id() == id) {
            warn!(id, path = frame.entry.path(), "folder contains itself, not descending");
            return Ok(Vec::new());
        }

        list_children(self.service.as_ref(), &frame.entry, &self.config.list_options())
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<Entry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.len().checked_sub(1)?;

            if self.stack[top].children.is_none() {
                match self.expand(top) {
                    Ok(children) => self.stack[top].children = Some(children.into_iter()),
                    Err(e) => {
                        self.stack.clear();
                        return Some(Err(e));
                    }
                }
            }

            let frame = &mut self.stack[top];
            match frame.children.as_mut().and_then(Iterator::next) {
                Some(child) => {
                    let level = frame.level.saturating_add(1);
                    self.stack.push(Frame {
                        entry: child,
                        level,
                        children: None,
                    });
                }
                None => return self.stack.pop().map(|f| Ok(f.entry)),
            }
        }
    }
}

impl std::iter::FusedIterator for Walk<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_budget_counts_the_current_level() {
        let bounded = |max| ScanConfig { max_depth: Some(max), ..ScanConfig::default() };

        assert!(!bounded(0).allows(1));
        assert!(bounded(1).allows(1));
        assert!(!bounded(1).allows(2));
        assert!(bounded(3).allows(3));
        assert!(ScanConfig::default().allows(usize::MAX));
    }

    #[test]
    fn huge_start_depth_does_not_overflow() {
        let mut drive = crate::MemoryService::new();
        drive
            .folder("root", "Root", None)
            .folder("a", "A", Some("root"))
            .file("a1", "a1.txt", "text/plain", Some("a"));
        let root = crate::fetch_entry(&drive, "root").unwrap();

        let unbounded = Walk::starting_at(&drive, root.clone(), ScanConfig::default(), usize::MAX);
        assert_eq!(unbounded.count(), 3);

        let bounded = ScanConfig { max_depth: Some(2), ..ScanConfig::default() };
        let ids = Walk::starting_at(&drive, root, bounded, usize::MAX)
            .map(|e| e.unwrap().id().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["root"]);
    }
}
