use tracing::debug;

use crate::entry::Entry;
use crate::error::ScanError;
use crate::traits::DriveService;

/// Resolve one entry's full metadata by id.
///
/// The returned entry is unlinked: depth 0, no parent, path equal to its name.
/// Used for the scan root and to hydrate every listed child.
pub fn fetch_entry<S>(service: &S, id: &str) -> Result<Entry, ScanError>
where
    S: DriveService + ?Sized,
{
    debug!(id, "fetching entry");
    service.get(id).map(|file| file.into_entry())
}
