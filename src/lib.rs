//! # drivescan
//!
//! Depth-bounded inventory of a cloud drive folder tree.
//!
//! drivescan resolves a root folder, lists its children page by page,
//! hydrates each child's metadata, and recurses into subfolders until a depth
//! budget runs out. The result is a flat, post-order sequence of [`Entry`]
//! records: every folder's descendants come before the folder, and each entry
//! carries its breadcrumb path, depth, and parent id.
//!
//! The remote side is a [`DriveService`]. [`DriveClient`] talks to the Google
//! Drive v3 API; [`MemoryService`] is an in-memory tree for tests and dry runs.
//!
//! # Quick Start
//!
//! ```rust
//! use drivescan::MemoryService;
//!
//! let mut drive = MemoryService::new();
//! drive
//!     .folder("root", "Projects", None)
//!     .folder("a", "Alpha", Some("root"))
//!     .file("a1", "plan.txt", "text/plain", Some("a"))
//!     .file("r1", "readme.md", "text/markdown", Some("root"));
//!
//! let results = drivescan::scan()
//!     .service(&drive)
//!     .folder_id("root")
//!     .max_depth(3)
//!     .run()
//!     .unwrap();
//!
//! let paths: Vec<_> = results.entries.iter().filter_map(|e| e.path()).collect();
//! assert_eq!(
//!     paths,
//!     ["Projects > Alpha > plan.txt", "Projects > Alpha", "Projects > readme.md", "Projects"]
//! );
//! assert_eq!(results.stats.folders, 2);
//! ```
//!
//! # Streaming
//!
//! [`ScanBuilder::walk`] returns a lazy iterator instead of a collected list:
//!
//! ```rust
//! use drivescan::MemoryService;
//!
//! let mut drive = MemoryService::new();
//! drive.folder("root", "Root", None).folder("sub", "Sub", Some("root"));
//!
//! for entry in drivescan::scan().service(&drive).folder_id("root").walk().unwrap() {
//!     let entry = entry.unwrap();
//!     println!("{entry}");
//! }
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod http;

mod builder;
mod entry;
mod error;
mod fetch;
mod lister;
mod memory;
mod remote;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ScanBuilder;
pub use engine::{ScanConfig, Walk};
pub use entry::{
    Entry, EntryBuilder, EntryKind, ExportedEntry, FILE_URL, FOLDER_MIME_TYPE, FOLDER_URL,
    PATH_SEPARATOR,
};
pub use error::ScanError;
pub use fetch::fetch_entry;
pub use http::{ClientConfig, DriveClient};
pub use lister::{list_children, ListOptions};
pub use memory::MemoryService;
pub use remote::{ChildRef, ListPage, ListQuery, RemoteFile, DEFAULT_PAGE_SIZE};
pub use results::{Results, ScanStats};
pub use traits::DriveService;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ScanBuilder`] to configure and run a scan.
///
/// # Example
///
/// ```rust
/// use drivescan::MemoryService;
///
/// let mut drive = MemoryService::new();
/// drive.folder("root", "Root", None).folder("sub", "Sub", Some("root"));
///
/// let results = drivescan::scan()
///     .service(&drive)
///     .folder_id("root")
///     .max_depth(0)
///     .run()
///     .unwrap();
///
/// assert_eq!(results.entries.len(), 1);
/// assert!(drive.listed().is_empty());
/// ```
pub fn scan<'a>() -> ScanBuilder<'a> {
    ScanBuilder::default()
}
