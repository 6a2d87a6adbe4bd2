//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin shim (`main.rs`) and the list/detail controllers.
//!
//! ```text
//! Key/Timer/WebRequestResult → Event → handle_event → AppState → Vec<Action>
//!                                 ↑                                  │
//!                                 └──── host executes (web, timer) ──┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`detail`]: Patient detail loader joining patient and records
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input mode, tab and screen types
//! - [`state`]: Central application state and view model computation

pub mod actions;
pub mod detail;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use detail::{DetailLoader, DetailPayload, JoinStep};
pub use handler::{handle_event, Event, ListOutcome};
pub use modes::{InputMode, Screen, Tab};
pub use state::AppState;
