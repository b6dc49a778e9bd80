use serde::Deserialize;

use crate::entry::Entry;

/// Default number of children requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Full metadata for one entry, as returned by a get-by-id lookup.
///
/// Unknown payload fields (size, owners, timestamps, ...) are ignored by
/// deserialization and never reach the [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id:        String,
    #[serde(default)]
    pub name:      Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl RemoteFile {
    /// Convert into an unlinked [`Entry`] (depth 0, no parent, path = name).
    pub fn into_entry(self) -> Entry {
        let mut builder = Entry::builder(self.id);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(mime_type) = self.mime_type {
            builder = builder.mime_type(mime_type);
        }
        builder.build()
    }
}

/// Minimal child descriptor carried by a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildRef {
    pub id:   String,
    #[serde(default)]
    pub name: String,
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    #[serde(default)]
    pub files:           Vec<ChildRef>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListPage {
    /// Continuation token, treating an empty string as "no more pages".
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// A single listing request: children of `parent_id`, optionally limited to
/// a set of type tags, one page at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub parent_id:  String,
    pub mime_types: Vec<String>,
    pub page_size:  usize,
    pub page_token: Option<String>,
}

impl ListQuery {
    /// Render the search expression understood by the remote service.
    ///
    /// ```text
    /// 'ID' in parents
    /// (mimeType = 'a' or mimeType = 'b') and 'ID' in parents
    /// ```
    pub fn to_query_string(&self) -> String {
        let parents = format!("'{}' in parents", escape(&self.parent_id));
        if self.mime_types.is_empty() {
            return parents;
        }

        let types = self
            .mime_types
            .iter()
            .map(|t| format!("mimeType = '{}'", escape(t)))
            .collect::<Vec<_>>()
            .join(" or ");
        format!("({types}) and {parents}")
    }

    /// Whether an entry with this type tag satisfies the type filter.
    pub fn accepts(&self, mime_type: Option<&str>) -> bool {
        self.mime_types.is_empty()
            || mime_type.is_some_and(|m| self.mime_types.iter().any(|t| t == m))
    }
}

/// Quote escaping for string literals inside a query expression.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
