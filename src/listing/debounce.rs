//! Input debouncing driven by host timers.
//!
//! The plugin host offers one-shot timers that cannot be cancelled, so the
//! debouncer does not own a timer. Instead every input records a deadline and
//! asks the caller to arm a timer for the full delay; whenever any timer fires
//! the caller polls [`Debouncer::tick`] with the current instant. Timers armed
//! for superseded inputs therefore fire harmlessly: their tick finds a deadline
//! still in the future and does nothing.
//!
//! ```text
//! input("jo")   t=0    ─┐ due 300
//! input("joh")  t=100   ├ due 400
//! input("john") t=200  ─┘ due 500
//! tick t=300 → Idle   tick t=400 → Idle   tick t=500 → Commit("john")
//! ```

use std::time::{Duration, Instant};

/// Default quiet period before a search input is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A host timer that fires this close to the deadline is treated as the
/// timer armed for the latest input, even if it fired a little early.
const EARLY_FIRE_SLACK: Duration = Duration::from_millis(5);

/// Result of polling the debouncer on a timer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceTick {
    /// Nothing to do: no pending value, or a superseded timer fired.
    Idle,
    /// The latest timer fired before the deadline; arm another one.
    Rearm(Duration),
    /// The quiet period elapsed; the value is committed downstream.
    Commit(String),
}

#[derive(Debug, Clone)]
struct PendingCommit {
    value: String,
    due: Instant,
}

/// Coalesces bursts of input into a single committed value.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingCommit>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Records the latest raw value and restarts the quiet period.
    ///
    /// Returns the duration of the timer the caller must arm.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) -> Duration {
        self.pending = Some(PendingCommit {
            value: value.into(),
            due: now + self.delay,
        });
        self.delay
    }

    /// Polls the debouncer after a host timer fired.
    pub fn tick(&mut self, now: Instant) -> DebounceTick {
        let Some(pending) = &self.pending else {
            return DebounceTick::Idle;
        };

        if now >= pending.due {
            let value = self
                .pending
                .take()
                .map(|p| p.value)
                .unwrap_or_default();
            return DebounceTick::Commit(value);
        }

        let remaining = pending.due - now;
        if remaining <= EARLY_FIRE_SLACK {
            DebounceTick::Rearm(remaining)
        } else {
            DebounceTick::Idle
        }
    }

    /// Drops any pending value so nothing is committed after teardown.
    ///
    /// Returns the value that was waiting, if any.
    pub fn cancel(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.value)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_commits_only_last_value_once() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();

        assert_eq!(d.input("jo", t0), ms(300));
        d.input("joh", t0 + ms(100));
        d.input("john", t0 + ms(200));

        assert_eq!(d.tick(t0 + ms(300)), DebounceTick::Idle);
        assert_eq!(d.tick(t0 + ms(400)), DebounceTick::Idle);
        assert_eq!(d.tick(t0 + ms(500)), DebounceTick::Commit("john".into()));
        assert_eq!(d.tick(t0 + ms(500)), DebounceTick::Idle);
        assert!(!d.is_pending());
    }

    #[test]
    fn separate_quiet_periods_commit_separately() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));

        d.input("a", t0);
        assert_eq!(d.tick(t0 + ms(300)), DebounceTick::Commit("a".into()));

        d.input("ab", t0 + ms(1000));
        assert_eq!(d.tick(t0 + ms(1300)), DebounceTick::Commit("ab".into()));
    }

    #[test]
    fn early_latest_timer_asks_for_rearm() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        d.input("x", t0);

        assert_eq!(d.tick(t0 + ms(298)), DebounceTick::Rearm(ms(2)));
        assert_eq!(d.tick(t0 + ms(300)), DebounceTick::Commit("x".into()));
    }

    #[test]
    fn cancel_prevents_commit() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.input("pending", t0);

        assert_eq!(d.cancel(), Some("pending".into()));
        assert_eq!(d.tick(t0 + ms(1000)), DebounceTick::Idle);
    }
}
