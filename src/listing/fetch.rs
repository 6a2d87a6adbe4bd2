//! Token-guarded fetch coordination.
//!
//! Every issued request gets a fresh [`RequestToken`] and becomes the only one
//! whose outcome may reach visible state. Responses are allowed to arrive in
//! any order; the rule is equality with the current token, never arrival
//! order, so a slow response for an old query can never overwrite a newer
//! one. Superseded requests are not aborted; their results are dropped on
//! arrival.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::FetchError;

/// Monotonic sequence number assigned to each issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a resolved request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The payload replaced the visible data.
    Applied,
    /// The request failed; the error is visible and prior data is kept.
    Failed,
    /// A newer request was issued meanwhile; the outcome was dropped.
    Superseded,
}

impl Resolution {
    /// Whether visible state changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Superseded)
    }
}

/// Owns the current token and the last applied payload of one view.
#[derive(Debug, Clone)]
pub struct FetchCoordinator<R> {
    last_issued: u64,
    current: Option<RequestToken>,
    loading: bool,
    error: Option<FetchError>,
    data: Option<R>,
}

impl<R> Default for FetchCoordinator<R> {
    fn default() -> Self {
        Self {
            last_issued: 0,
            current: None,
            loading: false,
            error: None,
            data: None,
        }
    }
}

impl<R> FetchCoordinator<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new token, makes it current, marks the view as loading and
    /// clears the previous error.
    pub fn issue(&mut self) -> RequestToken {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        self.current = Some(token);
        self.loading = true;
        self.error = None;
        token
    }

    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Applies the outcome of the request tagged `token`, if still current.
    pub fn resolve(&mut self, token: RequestToken, outcome: Result<R, FetchError>) -> Resolution {
        if !self.is_current(token) {
            tracing::debug!(
                token = %token,
                current = ?self.current.map(RequestToken::get),
                failed = outcome.is_err(),
                "discarding superseded response"
            );
            return Resolution::Superseded;
        }

        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                Resolution::Applied
            }
            Err(error) => {
                tracing::debug!(token = %token, error = %error, "request failed");
                self.error = Some(error);
                Resolution::Failed
            }
        }
    }

    /// Forgets the current token; any outcome still in flight is dropped.
    pub fn invalidate(&mut self) {
        self.current = None;
        self.loading = false;
    }

    /// Drops the applied payload and error; the token sequence continues.
    pub fn clear(&mut self) {
        self.data = None;
        self.error = None;
    }

    #[must_use]
    pub const fn current_token(&self) -> Option<RequestToken> {
        self.current
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn data(&self) -> Option<&R> {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_strictly_increasing() {
        let mut c: FetchCoordinator<u32> = FetchCoordinator::new();
        let a = c.issue();
        let b = c.issue();
        assert!(b > a);
        assert_eq!(c.current_token(), Some(b));
    }

    #[test]
    fn late_response_for_older_token_is_dropped() {
        let mut c = FetchCoordinator::new();
        let t1 = c.issue();
        let t2 = c.issue();

        assert_eq!(c.resolve(t1, Ok("first")), Resolution::Superseded);
        assert!(c.data().is_none());
        assert!(c.loading());

        assert_eq!(c.resolve(t2, Ok("second")), Resolution::Applied);
        assert_eq!(c.data(), Some(&"second"));
        assert!(!c.loading());
    }

    #[test]
    fn late_response_after_newer_applied_is_dropped() {
        let mut c = FetchCoordinator::new();
        let t1 = c.issue();
        let t2 = c.issue();
        c.resolve(t2, Ok(2));
        assert_eq!(c.resolve(t1, Ok(1)), Resolution::Superseded);
        assert_eq!(c.data(), Some(&2));
    }

    #[test]
    fn superseded_error_is_dropped_silently() {
        let mut c = FetchCoordinator::new();
        let t1 = c.issue();
        let t2 = c.issue();
        c.resolve(t2, Ok(7));
        let late = c.resolve(t1, Err(FetchError::Network("timeout".into())));
        assert_eq!(late, Resolution::Superseded);
        assert!(c.error().is_none());
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut c = FetchCoordinator::new();
        let t1 = c.issue();
        c.resolve(t1, Ok(vec![1, 2, 3]));

        let t2 = c.issue();
        assert!(c.error().is_none());
        assert_eq!(
            c.resolve(t2, Err(FetchError::server(500, "boom"))),
            Resolution::Failed
        );
        assert_eq!(c.data(), Some(&vec![1, 2, 3]));
        assert_eq!(c.error(), Some(&FetchError::server(500, "boom")));
        assert!(!c.loading());
    }

    #[test]
    fn new_issue_clears_error() {
        let mut c: FetchCoordinator<()> = FetchCoordinator::new();
        let t1 = c.issue();
        c.resolve(t1, Err(FetchError::Network("down".into())));
        c.issue();
        assert!(c.error().is_none());
        assert!(c.loading());
    }

    #[test]
    fn clear_keeps_token_sequence() {
        let mut c = FetchCoordinator::new();
        let t1 = c.issue();
        c.resolve(t1, Ok("a"));
        c.clear();
        assert!(c.data().is_none());
        let t2 = c.issue();
        assert!(t2 > t1);
        assert_eq!(c.resolve(t1, Ok("stale")), Resolution::Superseded);
    }

    #[test]
    fn invalidated_coordinator_drops_everything() {
        let mut c = FetchCoordinator::new();
        let t1 = c.issue();
        c.invalidate();
        assert_eq!(c.resolve(t1, Ok(1)), Resolution::Superseded);
        assert!(!c.loading());
    }
}
