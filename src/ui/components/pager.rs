//! Pager component renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PagerInfo;

const PREVIOUS: &str = "◀ h: prev";
const NEXT: &str = "l: next ▶";

/// Renders `◀ h: prev   Page 2 of 5 (total 42)   l: next ▶` centered.
///
/// A direction that cannot be taken is drawn dimmed.
///
/// Returns the next available row position (row + 1).
pub fn render_pager(row: usize, pager: &PagerInfo, theme: &Theme, cols: usize) -> usize {
    let len = PREVIOUS.chars().count() + pager.text.chars().count() + NEXT.chars().count() + 6;
    let padding = cols.saturating_sub(len) / 2;

    let direction = |enabled: bool| {
        if enabled {
            Theme::fg(&theme.colors.text_normal)
        } else {
            format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim))
        }
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(padding));
    print!("{}{PREVIOUS}{}", direction(pager.can_previous), Theme::reset());
    print!("   ");
    print!("{}{}", Theme::fg(&theme.colors.text_normal), pager.text);
    print!("   ");
    print!("{}{NEXT}{}", direction(pager.can_next), Theme::reset());
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
    row + 1
}
