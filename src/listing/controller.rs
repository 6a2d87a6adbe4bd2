//! Generic list view controller.
//!
//! Composes [`Debouncer`] → [`QueryState`] → [`FetchCoordinator`] for one list
//! view. The controller performs no I/O: every method that needs the network
//! returns a [`FetchRequest`] which the caller turns into a host request, and
//! the host's answer comes back through [`ListViewController::apply`] tagged
//! with the same token.
//!
//! A fetch is issued exactly when the query key changes (filter commit that
//! alters the key, a page step that is not clamped, a scope change), on mount,
//! and on explicit refresh.

use std::time::{Duration, Instant};

use super::debounce::{DebounceTick, Debouncer};
use super::fetch::{FetchCoordinator, RequestToken, Resolution};
use super::query::{PageDelta, QueryKey, QueryState};
use crate::domain::{FetchError, ListItem, Pagination};

/// One page of results as returned by the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// A request the caller must send to the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub key: QueryKey,
}

/// What the caller should do after a timer fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerOutcome {
    Idle,
    /// Arm another host timer for the given duration.
    Rearm(Duration),
    /// The committed filter changed the query; send this request.
    Fetch(FetchRequest),
}

/// Read-only view of a list controller for the display layer.
///
/// `loading`, `error` and an empty `items` slice are independent: an empty
/// page that loaded fine, a failed first load and a load in progress are all
/// distinguishable.
#[derive(Debug)]
pub struct ListSnapshot<'a, T> {
    pub items: &'a [T],
    pub pagination: Option<Pagination>,
    pub loading: bool,
    pub error: Option<&'a FetchError>,
    /// Raw input text, updated on every keystroke.
    pub filter_input: &'a str,
    /// Filter of the current query (trimmed, debounced).
    pub committed_filter: &'a str,
    pub page: u32,
    /// Whether any page has been applied yet.
    pub has_loaded: bool,
}

impl<T> ListSnapshot<'_, T> {
    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.pagination.is_some_and(|p| !p.is_last(self.page))
    }

    /// The view loaded successfully and the result set is empty.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.has_loaded && self.items.is_empty() && self.error.is_none()
    }
}

/// Debounced, paginated, race-safe controller for one list view.
#[derive(Debug, Clone)]
pub struct ListViewController<T> {
    query: QueryState,
    debouncer: Debouncer,
    fetch: FetchCoordinator<ListPage<T>>,
    input: String,
    issued_key: Option<QueryKey>,
    mounted: bool,
}

impl<T: ListItem> ListViewController<T> {
    #[must_use]
    pub fn new(page_size: u32, debounce: Duration, scope: Option<String>) -> Self {
        Self {
            query: QueryState::new(page_size, scope),
            debouncer: Debouncer::new(debounce),
            fetch: FetchCoordinator::new(),
            input: String::new(),
            issued_key: None,
            mounted: false,
        }
    }

    /// Issues the initial query. Subsequent calls are no-ops.
    pub fn mount(&mut self) -> Option<FetchRequest> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.run_query())
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Records a keystroke. Returns the timer duration the caller must arm.
    pub fn on_search_input(&mut self, raw: impl Into<String>, now: Instant) -> Duration {
        self.input = raw.into();
        self.debouncer.input(self.input.clone(), now)
    }

    /// Polls the debouncer after a host timer fired.
    ///
    /// Before mount a committed filter is only recorded, like a scope change.
    pub fn on_timer(&mut self, now: Instant) -> TimerOutcome {
        match self.debouncer.tick(now) {
            DebounceTick::Idle => TimerOutcome::Idle,
            DebounceTick::Rearm(remaining) => TimerOutcome::Rearm(remaining),
            DebounceTick::Commit(value) => {
                let changed = self.query.commit_filter(&value);
                if changed && !self.mounted {
                    tracing::debug!(filter = %self.query.filter(), "filter recorded before mount");
                    TimerOutcome::Idle
                } else if changed {
                    tracing::debug!(filter = %self.query.filter(), "filter committed");
                    TimerOutcome::Fetch(self.run_query())
                } else {
                    tracing::trace!("filter commit left query unchanged");
                    TimerOutcome::Idle
                }
            }
        }
    }

    /// Steps one page back or forth. Clamped steps issue nothing.
    pub fn on_page_change(&mut self, delta: PageDelta) -> Option<FetchRequest> {
        let last_known = self.fetch.data().map(|page| page.pagination);
        if self.query.step_page(delta, last_known.as_ref()) {
            Some(self.run_query())
        } else {
            tracing::trace!(?delta, page = self.query.page(), "page change clamped");
            None
        }
    }

    /// Replaces the scope (for example the connected wallet account).
    ///
    /// Before mount the new scope is only recorded; the initial query picks
    /// it up.
    pub fn set_scope(&mut self, scope: Option<String>) -> Option<FetchRequest> {
        if self.query.set_scope(scope) && self.mounted {
            Some(self.run_query())
        } else {
            None
        }
    }

    /// Re-issues the current query under a fresh token.
    pub fn refresh(&mut self) -> FetchRequest {
        self.mounted = true;
        self.run_query()
    }

    /// Applies the data source's answer for `token`.
    pub fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<ListPage<T>, FetchError>,
    ) -> Resolution {
        let served_page = outcome.as_ref().ok().map(|page| page.pagination.page);
        let resolution = self.fetch.resolve(token, outcome);

        if resolution == Resolution::Applied {
            if let (Some(served), Some(issued)) = (served_page, self.issued_key.as_ref()) {
                if served >= 1 && served != issued.page {
                    tracing::warn!(
                        requested = issued.page,
                        served,
                        "server served a different page than requested"
                    );
                    self.query.sync_page(served);
                }
            }
            tracing::debug!(
                token = %token,
                items = self.items().len(),
                "list page applied"
            );
        }

        resolution
    }

    /// Cancels the pending debounce and drops every in-flight response.
    pub fn dispose(&mut self) {
        self.debouncer.cancel();
        self.fetch.invalidate();
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        self.fetch.data().map_or(&[], |page| page.items.as_slice())
    }

    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub fn filter_input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<'_, T> {
        ListSnapshot {
            items: self.items(),
            pagination: self.fetch.data().map(|page| page.pagination),
            loading: self.fetch.loading(),
            error: self.fetch.error(),
            filter_input: &self.input,
            committed_filter: self.query.filter(),
            page: self.query.page(),
            has_loaded: self.fetch.data().is_some(),
        }
    }

    fn run_query(&mut self) -> FetchRequest {
        let key = self.query.key();
        let token = self.fetch.issue();
        tracing::debug!(
            token = %token,
            filter = %key.filter,
            page = key.page,
            page_size = key.page_size,
            scope = ?key.scope,
            "issuing list query"
        );
        self.issued_key = Some(key.clone());
        FetchRequest { token, key }
    }
}
