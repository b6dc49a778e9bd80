use std::fmt;

use serde::Serialize;

/// Type tag the remote service assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Link prefix for folders. The entry id is appended.
pub const FOLDER_URL: &str = "https://drive.google.com/drive/u/0/folders/";

/// Link prefix for everything that is not a folder. The entry id is appended.
pub const FILE_URL: &str = "https://drive.google.com/file/d/";

/// Separator between ancestor names in [`Entry::path`].
pub const PATH_SEPARATOR: &str = " > ";

/// A single file or folder discovered during a scan.
///
/// Entries are built with [`Entry::builder`] and are read-only afterwards.
/// The three linkage fields (`parent_id`, `path`, `depth`) are filled in once
/// by the child lister, before the entry is handed to the traversal engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id:        String,
    name:      Option<String>,
    path:      Option<String>,
    mime_type: Option<String>,
    parent_id: Option<String>,
    depth:     usize,
}

/// Coarse classification of an entry, derived from its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A container that can be listed.
    Folder,

    /// Anything else, including entries with no type tag at all.
    File,
}

impl Entry {
    /// Start building an entry with the given remote identifier.
    pub fn builder(id: impl Into<String>) -> EntryBuilder {
        EntryBuilder {
            id:        id.into(),
            name:      None,
            path:      None,
            mime_type: None,
            parent_id: None,
            depth:     None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Breadcrumb of ancestor names joined by [`PATH_SEPARATOR`].
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Id of the folder this entry was listed from. `None` for the scan root.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Distance from the scan root. Root = 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn kind(&self) -> EntryKind {
        if self.is_folder() {
            EntryKind::Folder
        } else {
            EntryKind::File
        }
    }

    /// `true` iff the type tag equals [`FOLDER_MIME_TYPE`].
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }

    /// Browser link to the entry.
    pub fn url(&self) -> String {
        if self.is_folder() {
            format!("{FOLDER_URL}{}", self.id)
        } else {
            format!("{FILE_URL}{}", self.id)
        }
    }

    /// Snapshot of every stored attribute plus the derived ones, for sinks.
    pub fn export(&self) -> ExportedEntry {
        ExportedEntry {
            id:        self.id.clone(),
            name:      self.name.clone(),
            path:      self.path.clone(),
            mime_type: self.mime_type.clone(),
            parent_id: self.parent_id.clone(),
            depth:     self.depth,
            is_folder: self.is_folder(),
            url:       self.url(),
        }
    }

    /// Attach this entry below `parent`. `listed_name` is the name the
    /// listing reported, which is what the breadcrumb is built from.
    ///
    /// A parent with neither path nor name contributes its id to the
    /// breadcrumb instead.
    pub(crate) fn link_to(&mut self, parent: &Entry, listed_name: &str) {
        let parent_path = parent.path.as_deref().unwrap_or(&parent.id);
        self.parent_id = Some(parent.id.clone());
        self.path = Some(format!("{parent_path}{PATH_SEPARATOR}{listed_name}"));
        self.depth = parent.depth.saturating_add(1);
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.as_deref().unwrap_or_default(), self.url())
    }
}

// ---------------------------------------------------------------------------
// EntryBuilder
// ---------------------------------------------------------------------------

/// Named, typed optional fields for [`Entry`].
///
/// Defaults: `path` falls back to `name`, `depth` falls back to `0`, every
/// other field stays unset.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    id:        String,
    name:      Option<String>,
    path:      Option<String>,
    mime_type: Option<String>,
    parent_id: Option<String>,
    depth:     Option<usize>,
}

impl EntryBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn build(self) -> Entry {
        Entry {
            path:      self.path.or_else(|| self.name.clone()),
            id:        self.id,
            name:      self.name,
            mime_type: self.mime_type,
            parent_id: self.parent_id,
            depth:     self.depth.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// ExportedEntry
// ---------------------------------------------------------------------------

/// Serializable view of an [`Entry`]: all stored attributes plus
/// `is_folder` and `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedEntry {
    pub id:        String,
    pub name:      Option<String>,
    pub path:      Option<String>,
    pub mime_type: Option<String>,
    pub parent_id: Option<String>,
    pub depth:     usize,
    pub is_folder: bool,
    pub url:       String,
}
