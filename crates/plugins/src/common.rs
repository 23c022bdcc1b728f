//! Response envelopes shared across plugins.

use serde::{Deserialize, Serialize};

/// Page size used by list endpoints that default it.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Offset used by list endpoints that default it.
pub const DEFAULT_PAGE_OFFSET: u32 = 0;

/// Pagination metadata returned next to every paged `data` array.
///
/// `currentPage`, `nextPage` and `prevPage` are only sent by newer servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of matching records.
    pub count: u64,
    /// Page size applied by the server.
    pub limit: u64,
    /// Offset applied by the server.
    pub offset: u64,
    /// Number of pages at this page size.
    pub total_pages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u64>,
}

/// A page of `T` plus its [`PageMeta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Returns `true` if records exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.meta.offset + (self.data.len() as u64) < self.meta.count
    }
}

/// The `{ "id": ... }` body returned by delete and action endpoints.
///
/// Those endpoints return `Option<ResourceRef<_>>`: a `204 No Content` or
/// other empty success body decodes to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef<Id> {
    pub id: Id,
}
