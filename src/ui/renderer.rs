//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to specialized component renderers
//!
//! The bottom of the pane is fixed (pager, status line, border, footer); the
//! body fills whatever is left between it and the header.

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Body, UIViewModel};

/// Renders the plugin UI to stdout.
///
/// Does not clear the screen; every line is padded to `cols` instead.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);

    render_viewmodel(&viewmodel, &state.theme, rows, cols);
}

/// Renders a view model.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header + tabs]
/// [Border]
/// [Search Bar - 3 lines, optional]
/// [Body]
/// [Pager, tables only]
/// [Status line]
/// [Border]
/// [Footer]
/// ```
fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2;

    current_row = components::render_header(current_row, &vm.header, theme, cols);
    current_row = components::render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = components::render_search_bar(current_row, search, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);
    let pager_row = status_row.saturating_sub(1);

    match &vm.body {
        Body::Table(table) => {
            components::render_table(current_row, pager_row, table, theme, cols);
            if let Some(pager) = &table.pager {
                components::render_pager(pager_row, pager, theme, cols);
            }
        }
        Body::Detail(detail) => {
            components::render_detail(current_row, status_row, detail, theme, cols);
        }
        Body::Stats(stats) => {
            components::render_stats(current_row, status_row, stats, theme, cols);
        }
    }

    components::render_status(status_row, vm.status.as_ref(), theme, cols);
    components::render_border(border_row, &theme.colors.border, cols);
    components::render_footer(footer_row, &vm.footer, theme, cols);
}
