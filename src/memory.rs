use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::entry::FOLDER_MIME_TYPE;
use crate::error::ScanError;
use crate::remote::{ChildRef, ListPage, ListQuery, RemoteFile};
use crate::traits::DriveService;

/// An in-memory [`DriveService`].
///
/// Test and dry-run support, not a storage backend. Holds a tree of folders
/// and files keyed by id, pages listings with numeric continuation tokens,
/// and applies type filters. The inspection and fault hooks
/// ([`fetched`](Self::fetched), [`listed`](Self::listed),
/// [`get_count`](Self::get_count), [`break_listing`](Self::break_listing))
/// exist so callers can assert what a scan asked the remote side for.
///
/// ```rust
/// use drivescan::MemoryService;
///
/// let mut drive = MemoryService::new();
/// drive
///     .folder("root", "Root", None)
///     .file("a", "a.txt", "text/plain", Some("root"));
///
/// let results = drivescan::scan().service(&drive).folder_id("root").run().unwrap();
/// assert_eq!(results.entries.len(), 2);
/// assert_eq!(drive.listed(), vec!["root".to_string()]);
/// ```
#[derive(Default)]
pub struct MemoryService {
    files:    HashMap<String, RemoteFile>,
    children: HashMap<String, Vec<String>>,
    broken:   HashMap<String, String>,
    gets:     AtomicUsize,
    fetched:  Mutex<Vec<String>>,
    listed:   Mutex<Vec<String>>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder, optionally below `parent`.
    pub fn folder(&mut self, id: &str, name: &str, parent: Option<&str>) -> &mut Self {
        self.file(id, name, FOLDER_MIME_TYPE, parent)
    }

    /// Add an entry with an arbitrary type tag, optionally below `parent`.
    pub fn file(&mut self, id: &str, name: &str, mime_type: &str, parent: Option<&str>) -> &mut Self {
        self.files.insert(
            id.to_string(),
            RemoteFile {
                id:        id.to_string(),
                name:      Some(name.to_string()),
                mime_type: Some(mime_type.to_string()),
            },
        );
        if let Some(parent) = parent {
            self.link(parent, id);
        }
        self
    }

    /// Make `child` appear in `parent`'s listing as well. An entry may have
    /// several parents, including one of its own descendants. A child id that
    /// was never added is still listed, but looking it up fails.
    pub fn link(&mut self, parent: &str, child: &str) -> &mut Self {
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
        self
    }

    /// Make every listing of `parent` fail with [`ScanError::Transient`].
    pub fn break_listing(&mut self, parent: &str, reason: &str) -> &mut Self {
        self.broken.insert(parent.to_string(), reason.to_string());
        self
    }

    /// Number of get-by-id calls served so far.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    /// Ids passed to `get`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Parent ids passed to `list`, one per page requested, in call order.
    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl DriveService for MemoryService {
    fn get(&self, id: &str) -> Result<RemoteFile, ScanError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(id.to_string());
        }
        self.files
            .get(id)
            .cloned()
            .ok_or_else(|| ScanError::NotFound(id.to_string()))
    }

    fn list(&self, query: &ListQuery) -> Result<ListPage, ScanError> {
        if let Ok(mut listed) = self.listed.lock() {
            listed.push(query.parent_id.clone());
        }
        if let Some(reason) = self.broken.get(&query.parent_id) {
            return Err(ScanError::Transient(reason.clone()));
        }

        let offset = match query.page_token.as_deref() {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ScanError::Transient(format!("bad page token: {token}")))?,
        };

        let matching = self
            .children
            .get(&query.parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|id| (id, self.files.get(id)))
            .filter(|(_, f)| query.accepts(f.and_then(|f| f.mime_type.as_deref())))
            .collect::<Vec<_>>();

        let page_size = query.page_size.max(1);
        let end = offset.saturating_add(page_size).min(matching.len());
        let files = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|(id, f)| ChildRef {
                id:   id.to_string(),
                name: f.and_then(|f| f.name.clone()).unwrap_or_else(|| id.to_string()),
            })
            .collect();

        Ok(ListPage {
            files,
            next_page_token: (end < matching.len()).then(|| end.to_string()),
        })
    }
}
