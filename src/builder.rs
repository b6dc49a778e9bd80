use std::time::Instant;

use tracing::info;

use crate::engine::{ScanConfig, Walk};
use crate::error::ScanError;
use crate::fetch::fetch_entry;
use crate::remote::DEFAULT_PAGE_SIZE;
use crate::results::{Results, ScanStats};
use crate::traits::DriveService;

// ---------------------------------------------------------------------------
// ScanBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a drive scan.
///
/// Created via [`drivescan::scan()`](crate::scan). Configure with chained
/// builder methods, then call [`run()`](ScanBuilder::run) for a collected
/// result or [`walk()`](ScanBuilder::walk) for a lazy iterator.
///
/// # Example
///
/// ```rust,ignore
/// let results = drivescan::scan()
///     .service(client)
///     .folder_id("1AbC...")
///     .max_depth(3)
///     .run()?;
/// ```
pub struct ScanBuilder<'a> {
    service:    Option<Box<dyn DriveService + 'a>>,
    folder_id:  Option<String>,
    max_depth:  Option<usize>,
    mime_types: Vec<String>,
    page_size:  usize,
}

impl Default for ScanBuilder<'_> {
    fn default() -> Self {
        Self {
            service:    None,
            folder_id:  None,
            max_depth:  None,
            mime_types: Vec::new(),
            page_size:  DEFAULT_PAGE_SIZE,
        }
    }
}

impl<'a> ScanBuilder<'a> {
    // ── Service ───────────────────────────────────────────────────────────

    /// Set the remote service to scan. Borrowed handles (`&service`) work too.
    pub fn service(mut self, s: impl DriveService + 'a) -> Self {
        self.service = Some(Box::new(s));
        self
    }

    /// Id of the folder to start from.
    pub fn folder_id(mut self, id: impl Into<String>) -> Self {
        self.folder_id = Some(id.into());
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Maximum number of listing levels. `0` lists nothing and yields only
    /// the root, `1` lists the root's children, and so on. Unlimited by
    /// default.
    pub fn max_depth(mut self, d: usize) -> Self {
        self.max_depth = Some(d);
        self
    }

    /// Only list children with this type tag. May be called repeatedly; the
    /// tags are OR-ed together. The filter applies at every level, so leaving
    /// out the folder type stops the walk below the root.
    pub fn mime_type(mut self, t: impl Into<String>) -> Self {
        self.mime_types.push(t.into());
        self
    }

    /// Replace the type filter with `types`.
    pub fn mime_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.mime_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Children requested per listing page. Defaults to 1000.
    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = n;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Resolve the root and return a lazy post-order [`Walk`].
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidConfig`] when no service or folder id was given or
    /// the page size is zero; otherwise whatever the root lookup returns.
    pub fn walk(self) -> Result<Walk<'a>, ScanError> {
        let service = self
            .service
            .ok_or_else(|| ScanError::InvalidConfig("no service provided".into()))?;
        let folder_id = self
            .folder_id
            .ok_or_else(|| ScanError::InvalidConfig("no folder id provided".into()))?;
        if self.page_size == 0 {
            return Err(ScanError::InvalidConfig("page size must be at least 1".into()));
        }

        let root = fetch_entry(service.as_ref(), &folder_id)?;
        info!(
            id = root.id(),
            path = root.path(),
            max_depth = self.max_depth,
            "starting scan"
        );

        let config = ScanConfig {
            max_depth:  self.max_depth,
            mime_types: self.mime_types,
            page_size:  self.page_size,
        };
        Ok(Walk::new(service, root, config))
    }

    /// Execute the scan and collect every entry.
    ///
    /// Blocks until the walk completes. The first error aborts the scan and
    /// is returned unchanged; entries gathered so far are discarded.
    pub fn run(self) -> Result<Results, ScanError> {
        let start = Instant::now();
        let entries = self.walk()?.collect::<Result<Vec<_>, _>>()?;
        let stats = ScanStats::compute(&entries, start.elapsed());

        info!(
            folders = stats.folders,
            files = stats.files,
            elapsed_ms = stats.duration.as_millis() as u64,
            "scan complete"
        );

        Ok(Results { entries, stats })
    }
}
