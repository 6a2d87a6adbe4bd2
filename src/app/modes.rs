//! Input mode, tab and screen types.
//!
//! # State Machine
//!
//! The dashboard is always on one [`Tab`]. The patients tab can push a
//! [`Screen::PatientDetail`] on top of itself; `Back` pops it.
//!
//! Input is interpreted according to [`InputMode`]:
//! - **Normal**: navigation, paging, tab switching
//! - **Search**: characters edit the active list's search input
//!
//! # Example
//!
//! ```rust
//! use medboard::app::modes::{InputMode, Tab};
//!
//! let tab = Tab::Patients.next();
//! assert_eq!(tab, Tab::Transactions);
//! assert_eq!(InputMode::default(), InputMode::Normal);
//! ```

use crate::api::ListKind;

/// Current input handling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation and command keys.
    #[default]
    Normal,

    /// Characters go to the search input of the active list.
    ///
    /// Leaving search mode keeps the typed text and any pending debounce.
    Search,
}

/// Top-level dashboard tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Patients,
    Transactions,
    Stats,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::Patients, Self::Transactions, Self::Stats];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Patients => "Patients",
            Self::Transactions => "Transactions",
            Self::Stats => "Stats",
        }
    }

    /// The following tab, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Patients => Self::Transactions,
            Self::Transactions => Self::Stats,
            Self::Stats => Self::Patients,
        }
    }

    /// The paginated list shown on this tab, if any.
    #[must_use]
    pub const fn list(self) -> Option<ListKind> {
        match self {
            Self::Patients => Some(ListKind::Patients),
            Self::Transactions => Some(ListKind::Transactions),
            Self::Stats => None,
        }
    }
}

/// What occupies the body of the pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    /// The active tab's content.
    #[default]
    Browse,
    /// Detail of one patient, entered from the patients tab.
    PatientDetail,
}
