//! Server-reported pagination.

use serde::{Deserialize, Serialize};

/// Pagination block returned alongside every list page.
///
/// `page` is the server's echo of the requested page. It normally equals the
/// requested page; a mismatch means the server clamped the request (for example
/// a page past the end of a shrinking result set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl Pagination {
    /// Pagination for a response that carried none: everything on one page.
    #[must_use]
    pub fn single_page(page: u32, total: u64) -> Self {
        Self {
            page,
            total_pages: 1,
            total,
        }
    }

    /// Whether `page` is the last page according to this block.
    #[must_use]
    pub const fn is_last(&self, page: u32) -> bool {
        page >= self.total_pages
    }
}
