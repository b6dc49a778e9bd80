use crate::error::ScanError;
use crate::remote::{ListPage, ListQuery, RemoteFile};

/// Handle to the remote listing service.
///
/// Implement this to scan any paginated tree: the Google Drive REST API
/// ([`DriveClient`](crate::DriveClient)), an in-memory fixture
/// ([`MemoryService`](crate::MemoryService)), or a recording proxy.
/// The handle is built once by the application and passed to every
/// component that talks to the remote side.
///
/// # Error Handling
///
/// Map "does not exist / not visible" to [`ScanError::NotFound`] and
/// transport or server failures to [`ScanError::Transient`]. Do not retry
/// inside the implementation; a failure aborts the scan.
///
/// # Example
///
/// ```rust
/// use drivescan::{DriveService, ListPage, ListQuery, RemoteFile, ScanError};
///
/// /// A service that knows a single, empty folder.
/// struct Lonely;
///
/// impl DriveService for Lonely {
///     fn get(&self, id: &str) -> Result<RemoteFile, ScanError> {
///         match id {
///             "root" => Ok(RemoteFile {
///                 id:        "root".into(),
///                 name:      Some("Root".into()),
///                 mime_type: Some(drivescan::FOLDER_MIME_TYPE.into()),
///             }),
///             other => Err(ScanError::NotFound(other.into())),
///         }
///     }
///
///     fn list(&self, _query: &ListQuery) -> Result<ListPage, ScanError> {
///         Ok(ListPage::default())
///     }
/// }
/// ```
pub trait DriveService: Send + Sync {
    /// Look up a single entry's metadata by id.
    fn get(&self, id: &str) -> Result<RemoteFile, ScanError>;

    /// Fetch one page of children matching `query`.
    fn list(&self, query: &ListQuery) -> Result<ListPage, ScanError>;
}

impl<S: DriveService + ?Sized> DriveService for &S {
    fn get(&self, id: &str) -> Result<RemoteFile, ScanError> {
        (**self).get(id)
    }

    fn list(&self, query: &ListQuery) -> Result<ListPage, ScanError> {
        (**self).list(query)
    }
}

impl<S: DriveService + ?Sized> DriveService for Box<S> {
    fn get(&self, id: &str) -> Result<RemoteFile, ScanError> {
        (**self).get(id)
    }

    fn list(&self, query: &ListQuery) -> Result<ListPage, ScanError> {
        (**self).list(query)
    }
}
