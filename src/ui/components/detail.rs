//! Patient detail component renderer.

use super::{clear_rows, print_line, render_table};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailView;

const LABEL_WIDTH: usize = 16;

/// Renders the patient title, its fields and the medical records table.
///
/// Returns the first row after the records table.
pub fn render_detail(
    row: usize,
    end_row: usize,
    detail: &DetailView,
    theme: &Theme,
    cols: usize,
) -> usize {
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print_line(row, &format!(" {}", detail.title), cols);
    print!("{}", Theme::reset());
    let mut current_row = row + 1;

    for (label, value) in &detail.fields {
        if current_row >= end_row {
            return current_row;
        }
        position_label(current_row, label, value, theme, cols);
        current_row += 1;
    }

    if current_row + 2 >= end_row {
        clear_rows(current_row, end_row, cols);
        return end_row;
    }

    print_line(current_row, "", cols);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.active_tab_fg));
    print_line(current_row + 1, " Medical Records", cols);
    print!("{}", Theme::reset());

    render_table(current_row + 2, end_row, &detail.records, theme, cols)
}

fn position_label(row: usize, label: &str, value: &str, theme: &Theme, cols: usize) {
    let label = format!("  {label:<LABEL_WIDTH$}");
    let used = label.chars().count();
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print_line(row, &label, used.min(cols));
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{}", value.chars().take(cols.saturating_sub(used)).collect::<String>());
    print!("{}", " ".repeat(cols.saturating_sub(used + value.chars().count())));
    print!("{}", Theme::reset());
}
