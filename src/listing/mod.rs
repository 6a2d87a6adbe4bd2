//! Paginated, debounced, race-safe list views.
//!
//! This is the coordination core of the dashboard. It owns no I/O and no
//! timers; the application layer feeds it keystrokes, timer ticks and host
//! responses, and forwards the requests it emits.
//!
//! ```text
//! keystroke ─▶ Debouncer ─commit─▶ QueryState ─key changed─▶ FetchCoordinator
//!                                                         issue(token) │
//! host response (token) ──────────────────────▶ resolve: token == current?
//! ```
//!
//! # Modules
//!
//! - [`debounce`]: Deadline-based debouncer polled on host timer events
//! - [`query`]: Filter/page/page-size/scope state and the derived query key
//! - [`fetch`]: Request tokens and stale-response suppression
//! - [`controller`]: The list view controller composing the three

pub mod controller;
pub mod debounce;
pub mod fetch;
pub mod query;

pub use controller::{FetchRequest, ListPage, ListSnapshot, ListViewController, TimerOutcome};
pub use debounce::{DebounceTick, Debouncer, DEFAULT_DEBOUNCE};
pub use fetch::{FetchCoordinator, RequestToken, Resolution};
pub use query::{PageDelta, QueryKey, QueryState};
