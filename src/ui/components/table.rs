//! Table component renderer.
//!
//! Renders a [`TableView`] as fixed-width columns. Columns that would run
//! past the pane edge are dropped from the right, so narrow panes keep the
//! leading columns intact.

use super::{clear_rows, render_empty_state};
use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Column, DisplayRow, TableView};

/// Renders column headers, rows and the empty state between `row` and
/// `end_row` (exclusive), blanking any rows left over.
///
/// Returns the first row after the table content.
pub fn render_table(
    row: usize,
    end_row: usize,
    table: &TableView,
    theme: &Theme,
    cols: usize,
) -> usize {
    let visible = visible_columns(&table.columns, cols);

    let mut current_row = render_table_headers(row, &table.columns[..visible], theme, cols);

    if let Some(empty) = &table.empty_state {
        clear_rows(current_row, current_row + 1, cols);
        current_row = render_empty_state(current_row + 1, empty, theme, cols);
    } else {
        for item in &table.rows {
            if current_row >= end_row {
                break;
            }
            current_row = render_table_row(current_row, item, visible, theme, cols);
        }
    }

    clear_rows(current_row, end_row, cols);
    current_row
}

/// Number of leading columns that fit in `cols`.
fn visible_columns(columns: &[Column], cols: usize) -> usize {
    let mut used = 0;
    columns
        .iter()
        .take_while(|column| {
            let width = column.width + usize::from(used > 0);
            used += width;
            used <= cols
        })
        .count()
}

/// Renders the bold column titles.
///
/// Returns the next available row position (row + 1).
fn render_table_headers(row: usize, columns: &[Column], theme: &Theme, cols: usize) -> usize {
    let line = columns
        .iter()
        .map(|column| fit(column.title, column.width))
        .collect::<Vec<_>>()
        .join(" ");

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{line}");
    print!("{}", " ".repeat(cols.saturating_sub(line.chars().count())));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders a single table row.
///
/// # Styling Precedence
///
/// 1. Selection background (if `is_selected`)
/// 2. Search match highlights on the first cell (unless selected)
/// 3. Normal text color
///
/// The row is padded to the full width so the selection background spans
/// the whole line.
fn render_table_row(
    row: usize,
    item: &DisplayRow,
    visible: usize,
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }

    let mut line_len = 0;
    for (index, cell) in item.cells.iter().take(visible).enumerate() {
        if index > 0 {
            print!(" ");
            line_len += 1;
        }
        if index == 0 {
            helpers::render_highlighted_text(cell, &item.highlight_ranges, theme, item.is_selected);
        } else {
            print!("{cell}");
        }
        line_len += cell.chars().count();
    }

    print!("{}", " ".repeat(cols.saturating_sub(line_len)));
    print!("{}", Theme::reset());
    row + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column { title: "NAME", width: 10 },
            Column { title: "EMAIL", width: 10 },
            Column { title: "PHONE", width: 10 },
        ]
    }

    #[test]
    fn drops_columns_that_do_not_fit() {
        assert_eq!(visible_columns(&columns(), 80), 3);
        assert_eq!(visible_columns(&columns(), 32), 3);
        assert_eq!(visible_columns(&columns(), 31), 2);
        assert_eq!(visible_columns(&columns(), 9), 0);
    }
}
