//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold
//! display-ready strings only: truncation, address shortening, date
//! formatting and highlight ranges are all resolved before rendering.

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Present on list tabs while searching or when the input is non-empty.
    pub search_bar: Option<SearchBarInfo>,

    pub body: Body,

    /// Loading, error or notice line above the footer.
    pub status: Option<StatusLine>,

    pub footer: FooterInfo,
}

/// Main content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Table(TableView),
    Detail(DetailView),
    Stats(StatsView),
}

/// Title and tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub tabs: Vec<TabLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub label: String,
    pub active: bool,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Raw input value, updated on every keystroke.
    pub query: String,
    /// Whether keystrokes currently go to the input.
    pub focused: bool,
    /// A typed value that has not been committed yet.
    pub pending: bool,
}

/// A page of list rows plus its pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<DisplayRow>,
    /// Index of the selected row within `rows`.
    pub selected_index: usize,
    pub pager: Option<PagerInfo>,
    /// Shown in place of rows when a load succeeded with no results.
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Cell texts, already truncated to their column width.
    pub cells: Vec<String>,

    pub is_selected: bool,

    /// Character ranges of the first cell to highlight (search matches).
    ///
    /// Each tuple is `(start_index, end_index)` in UTF-8 character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// `Page p of n (total t)` plus the enabled state of each direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerInfo {
    pub text: String,
    pub can_previous: bool,
    pub can_next: bool,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No patients found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Patient detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    /// Label/value pairs of the patient record.
    pub fields: Vec<(String, String)>,
    pub records: TableView,
}

/// Aggregate counters screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub counters: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusLine {
    #[must_use]
    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Notice,
            message: message.into(),
        }
    }
}
