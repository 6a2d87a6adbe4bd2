//! Status line component renderer.

use super::print_line;
use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{StatusKind, StatusLine};

/// Renders the loading/error line, or a blank line when there is none.
///
/// Returns the next available row position (row + 1).
pub fn render_status(row: usize, status: Option<&StatusLine>, theme: &Theme, cols: usize) -> usize {
    let Some(status) = status else {
        print_line(row, "", cols);
        return row + 1;
    };

    let color = match status.kind {
        StatusKind::Loading => &theme.colors.loading_fg,
        StatusKind::Error => &theme.colors.error_fg,
        StatusKind::Notice => &theme.colors.text_dim,
    };
    let prefix = match status.kind {
        StatusKind::Error => " ✗ ",
        StatusKind::Loading | StatusKind::Notice => " ",
    };

    print!("{}", Theme::fg(color));
    print_line(row, &truncate(&format!("{prefix}{}", status.message), cols), cols);
    print!("{}", Theme::reset());
    row + 1
}
