//! Composable UI component renderers.
//!
//! Each component draws one part of the interface at a given row and
//! returns the next free row, so the renderer can stack them.
//!
//! # Components
//!
//! - [`header`]: Title bar with the tab strip
//! - [`search`]: Search input box
//! - [`table`]: Column-driven list table
//! - [`pager`]: Page position with previous/next hints
//! - [`empty`]: Empty state message for lists with no results
//! - [`detail`]: Patient detail fields and medical records
//! - [`stats`]: Aggregate counters
//! - [`status`]: Loading and error line
//! - [`footer`]: Keybinding hints

mod detail;
mod empty;
mod footer;
mod header;
mod pager;
mod search;
mod stats;
mod status;
mod table;

pub use detail::render_detail;
pub use empty::render_empty_state;
pub use footer::render_footer;
pub use header::render_header;
pub use pager::render_pager;
pub use search::render_search_bar;
pub use stats::render_stats;
pub use status::render_status;
pub use table::render_table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;

/// Renders a horizontal border line at the specified row.
///
/// Returns the next available row position (row + 1).
pub fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Prints `text` starting at column 1 and pads the rest of the line.
fn print_line(row: usize, text: &str, cols: usize) {
    let len = text.chars().count().min(cols);
    position_cursor(row, 1);
    print!("{}", text.chars().take(len).collect::<String>());
    print!("{}", " ".repeat(cols.saturating_sub(len)));
}

/// Blanks every row in `from..to`.
fn clear_rows(from: usize, to: usize, cols: usize) {
    for row in from..to {
        print_line(row, "", cols);
    }
}
