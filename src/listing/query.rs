//! Query state and the canonical query key.

use serde::{Deserialize, Serialize};

use crate::domain::Pagination;

/// Identity of one list request.
///
/// Two requests with equal keys ask for the same data; a new key supersedes
/// every request issued under an older one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub filter: String,
    pub page: u32,
    pub page_size: u32,
    pub scope: Option<String>,
}

/// Direction of a pager step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDelta {
    Previous,
    Next,
}

impl PageDelta {
    /// Maps `-1`/`+1` style deltas; zero is not a step.
    #[must_use]
    pub const fn from_step(step: i32) -> Option<Self> {
        match step {
            s if s < 0 => Some(Self::Previous),
            s if s > 0 => Some(Self::Next),
            _ => None,
        }
    }
}

/// Filter, page, page size and scope of one list view.
///
/// Mutators return whether the derived [`QueryKey`] changed; the caller issues
/// a fetch exactly when it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    filter: String,
    page: u32,
    page_size: u32,
    scope: Option<String>,
}

impl QueryState {
    /// Creates the state for page 1 with an empty filter.
    ///
    /// A zero page size is bumped to 1.
    #[must_use]
    pub fn new(page_size: u32, scope: Option<String>) -> Self {
        Self {
            filter: String::new(),
            page: 1,
            page_size: page_size.max(1),
            scope,
        }
    }

    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey {
            filter: self.filter.clone(),
            page: self.page,
            page_size: self.page_size,
            scope: self.scope.clone(),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Commits a debounced filter value.
    ///
    /// The value is trimmed and the page is reset to 1 whether or not the
    /// filter actually changed.
    pub fn commit_filter(&mut self, raw: &str) -> bool {
        let before = self.key();
        self.filter = raw.trim().to_string();
        self.page = 1;
        self.key() != before
    }

    /// Moves one page back or forth, clamped to `1..=total_pages`.
    ///
    /// `last_known` is the pagination of the last applied response and may be
    /// stale while a request is in flight. Without it "next" is disabled.
    /// Never touches the filter.
    pub fn step_page(&mut self, delta: PageDelta, last_known: Option<&Pagination>) -> bool {
        match delta {
            PageDelta::Previous => {
                if self.page <= 1 {
                    return false;
                }
                self.page -= 1;
                true
            }
            PageDelta::Next => match last_known {
                Some(p) if !p.is_last(self.page) => {
                    self.page += 1;
                    true
                }
                _ => false,
            },
        }
    }

    /// Replaces the scope and resets the page to 1.
    pub fn set_scope(&mut self, scope: Option<String>) -> bool {
        let before = self.key();
        self.scope = scope.filter(|s| !s.trim().is_empty());
        self.page = 1;
        self.key() != before
    }

    /// Adopts the page the server actually served.
    pub fn sync_page(&mut self, page: u32) {
        self.page = page.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(page: u32, total_pages: u32) -> Pagination {
        Pagination {
            page,
            total_pages,
            total: u64::from(total_pages) * 10,
        }
    }

    #[test]
    fn committing_filter_resets_page_for_any_value() {
        for value in ["", "john", "  john  ", "x"] {
            let mut q = QueryState::new(10, None);
            q.commit_filter("john");
            q.sync_page(4);
            q.commit_filter(value);
            assert_eq!(q.page(), 1, "value {value:?}");
        }
    }

    #[test]
    fn same_filter_on_first_page_is_not_a_change() {
        let mut q = QueryState::new(10, None);
        assert!(q.commit_filter("ann"));
        assert!(!q.commit_filter(" ann "));
        assert_eq!(q.filter(), "ann");
    }

    #[test]
    fn same_filter_on_later_page_changes_key_through_reset() {
        let mut q = QueryState::new(10, None);
        q.commit_filter("ann");
        assert!(q.step_page(PageDelta::Next, Some(&pagination(1, 3))));
        assert!(q.commit_filter("ann"));
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn previous_is_noop_on_first_page() {
        let mut q = QueryState::new(10, None);
        assert!(!q.step_page(PageDelta::Previous, Some(&pagination(1, 5))));
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn next_is_noop_on_last_known_page() {
        let mut q = QueryState::new(10, None);
        q.sync_page(3);
        assert!(!q.step_page(PageDelta::Next, Some(&pagination(3, 3))));
        assert_eq!(q.page(), 3);
    }

    #[test]
    fn next_is_noop_without_pagination() {
        let mut q = QueryState::new(10, None);
        assert!(!q.step_page(PageDelta::Next, None));
    }

    #[test]
    fn paging_keeps_filter() {
        let mut q = QueryState::new(20, None);
        q.commit_filter("smith");
        q.step_page(PageDelta::Next, Some(&pagination(1, 2)));
        assert_eq!(q.filter(), "smith");
        assert_eq!(q.page(), 2);
    }

    #[test]
    fn scope_change_resets_page_and_blank_scope_clears() {
        let mut q = QueryState::new(20, None);
        q.sync_page(2);
        assert!(q.set_scope(Some("0xabc".into())));
        assert_eq!(q.page(), 1);
        assert_eq!(q.scope(), Some("0xabc"));
        assert!(q.set_scope(Some("   ".into())));
        assert_eq!(q.scope(), None);
    }

    #[test]
    fn page_delta_from_step() {
        assert_eq!(PageDelta::from_step(-1), Some(PageDelta::Previous));
        assert_eq!(PageDelta::from_step(1), Some(PageDelta::Next));
        assert_eq!(PageDelta::from_step(0), None);
    }
}
