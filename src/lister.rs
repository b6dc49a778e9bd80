use tracing::debug;

use crate::entry::Entry;
use crate::error::ScanError;
use crate::fetch::fetch_entry;
use crate::remote::{ListQuery, DEFAULT_PAGE_SIZE};
use crate::traits::DriveService;

/// Per-call listing parameters.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions<'a> {
    /// Type tags to keep. Empty means no type restriction.
    pub mime_types: &'a [String],

    /// Upper bound on children per page.
    pub page_size: usize,
}

impl Default for ListOptions<'_> {
    fn default() -> Self {
        Self {
            mime_types: &[],
            page_size:  DEFAULT_PAGE_SIZE,
        }
    }
}

/// Return every direct child of `parent`, in the order the service reports
/// them, following continuation tokens until the last page.
///
/// Each child is re-fetched for full metadata and linked below `parent`
/// (`parent_id`, `path`, `depth`). Any page or fetch failure aborts the whole
/// listing; no partial result is returned.
pub fn list_children<S>(
    service: &S,
    parent:  &Entry,
    opts:    &ListOptions<'_>,
) -> Result<Vec<Entry>, ScanError>
where
    S: DriveService + ?Sized,
{
    let mut query = ListQuery {
        parent_id:  parent.id().to_string(),
        mime_types: opts.mime_types.to_vec(),
        page_size:  opts.page_size,
        page_token: None,
    };
    let mut children = Vec::new();

    loop {
        let page = service.list(&query)?;

        for child in &page.files {
            let mut entry = fetch_entry(service, &child.id)?;
            entry.link_to(parent, &child.name);
            children.push(entry);
        }

        let next = page.next_token().map(str::to_string);
        debug!(
            parent = parent.id(),
            items = page.files.len(),
            next_page_token = next.as_deref(),
            "listed page"
        );

        match next {
            Some(token) => query.page_token = Some(token),
            None        => break,
        }
    }

    Ok(children)
}
