//! Statistics component renderer.

use super::{clear_rows, print_line};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StatsView;

const LABEL_WIDTH: usize = 24;

/// Renders one counter per line as a dotted label/value list.
///
/// Returns the first row after the counters.
pub fn render_stats(
    row: usize,
    end_row: usize,
    stats: &StatsView,
    theme: &Theme,
    cols: usize,
) -> usize {
    print_line(row, "", cols);
    let mut current_row = row + 1;

    for (label, value) in &stats.counters {
        if current_row >= end_row {
            break;
        }
        let dots = ".".repeat(LABEL_WIDTH.saturating_sub(label.chars().count()));
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print_line(current_row, &format!("  {label} {dots} {value}"), cols);
        print!("{}", Theme::reset());
        current_row += 1;
    }

    clear_rows(current_row, end_row, cols);
    current_row
}
