//! Header component renderer.
//!
//! Draws the title on the left and the tab strip after it, with the active
//! tab bracketed and colored.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header title bar at the specified row.
///
/// # Layout
///
/// ```text
///  Medboard   [Patients (42)]  Transactions (7)  Stats
/// ```
///
/// Returns the next available row position (row + 1).
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    let mut used = header.title.chars().count().min(cols);
    print!("{}", header.title.chars().take(used).collect::<String>());

    for tab in &header.tabs {
        let label = if tab.active {
            format!("  [{}]", tab.label)
        } else {
            format!("   {} ", tab.label)
        };
        let len = label.chars().count();
        if used + len > cols {
            break;
        }
        if tab.active {
            print!("{}", Theme::fg(&theme.colors.active_tab_fg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{label}");
        used += len;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
