//! Zellij plugin wrapper and entry point.
//!
//! This is the thin integration layer between the Medboard library and the
//! Zellij plugin system. It turns host events into library events, runs
//! `handle_event`, and executes the returned actions through host calls.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for `Key`, `Timer`, `WebRequestResult` and
//!    `PermissionRequestResult` events
//! 3. **Mount**: Once permissions are granted, issue the initial fetches
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Render**: Call library render function
//!
//! # Host Mapping
//!
//! - `Timer` → `Event::Tick` (debouncers are polled with `Instant::now()`)
//! - `WebRequestResult` → decoded into `ListLoaded`/`DetailPartLoaded`/`StatsLoaded`
//! - pipe `wallet` → `Event::ScopeChanged` (empty payload disconnects)
//! - `Action::Fetch*` → `web_request`, `ArmTimer` → `set_timeout`,
//!   `CloseFocus` → `hide_self`
//!
//! # Keybindings
//!
//! In normal mode:
//! - `Tab`: Next tab, `1`/`2`/`3`: Jump to tab
//! - `j`/`Down`, `k`/`Up`: Move selection
//! - `h`/`Left`, `l`/`Right`: Previous/next page
//! - `/`: Search the current list
//! - `Enter`: Open the selected patient
//! - `Esc`: Back from the detail screen
//! - `r`: Refresh, `q`: Close plugin
//!
//! In search mode:
//! - Characters and `Backspace` edit the query
//! - `Down`/`Up`: Move selection
//! - `Enter`/`Esc`: Leave the input (the query stays)

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_family = "wasm")]
use zellij_tile::prelude::*;

#[cfg(target_family = "wasm")]
use plugin::State;

// Defines `main` and the exported plugin entry points.
#[cfg(target_family = "wasm")]
register_plugin!(State);

#[cfg(target_family = "wasm")]
mod plugin {
    use std::collections::BTreeMap;
    use std::time::Instant;

    use zellij_tile::prelude::*;

    use medboard::{handle_event, Action, AppState, Config, Event, InputMode, Tab};

    /// Name of the pipe that connects a wallet account.
    const WALLET_PIPE: &str = "wallet";

    /// Plugin state wrapper around the library's `AppState`.
    pub struct State {
        app: AppState,
    }

    impl Default for State {
        fn default() -> Self {
            Self {
                app: medboard::initialize(&Config::default()),
            }
        }
    }

    impl ZellijPlugin for State {
        /// Parses configuration, builds the application state, requests
        /// permissions and subscribes to events. Nothing is fetched until
        /// permissions are granted.
        fn load(&mut self, configuration: BTreeMap<String, String>) {
            let config = Config::from_zellij(&configuration);
            medboard::observability::init_tracing(&config);

            let span = tracing::debug_span!("plugin_load");
            let _guard = span.entered();

            tracing::debug!(
                api_url = %config.api_url,
                patients_page_size = config.patients_page_size,
                transactions_page_size = config.transactions_page_size,
                debounce_ms = config.debounce.as_millis(),
                "parsed configuration"
            );
            self.app = medboard::initialize(&config);

            request_permission(&[
                PermissionType::WebAccess,
                PermissionType::ReadApplicationState,
            ]);

            subscribe(&[
                EventType::Key,
                EventType::Timer,
                EventType::WebRequestResult,
                EventType::PermissionRequestResult,
            ]);

            tracing::debug!("plugin load complete - waiting for permissions");
        }

        /// Translates a host event, runs it through the library and executes
        /// the resulting actions. Returns `true` if the UI should re-render.
        fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
            let event_name = Self::get_event_name(&event);
            let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
            let _guard = span.entered();

            let our_event = match event {
                zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                    Some(event) => event,
                    None => return false,
                },
                zellij_tile::prelude::Event::Timer(_) => Event::Tick,
                zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                    match Event::from_web_response(status, &body, &context) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(error = %e, status, "dropping unroutable web response");
                            return false;
                        }
                    }
                }
                zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Granted) => {
                    tracing::debug!("permissions granted - mounting views");
                    Event::Mount
                }
                zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Denied) => {
                    tracing::warn!("permissions denied - no data can be fetched");
                    return false;
                }
                _ => return false,
            };

            self.dispatch(&our_event)
        }

        /// Handles `zellij pipe --name wallet -- <address>`.
        fn pipe(&mut self, pipe_message: PipeMessage) -> bool {
            if pipe_message.name != WALLET_PIPE {
                tracing::debug!(name = %pipe_message.name, "ignoring pipe message");
                return false;
            }
            let wallet = pipe_message
                .payload
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());
            self.dispatch(&Event::ScopeChanged(wallet))
        }

        fn render(&mut self, rows: usize, cols: usize) {
            medboard::ui::render(&self.app, rows, cols);
        }
    }

    impl State {
        fn dispatch(&mut self, event: &Event) -> bool {
            match handle_event(&mut self.app, event, Instant::now()) {
                Ok((should_render, actions)) => {
                    tracing::debug!(action_count = actions.len(), should_render, "event handled");
                    for action in &actions {
                        self.execute_action(action);
                    }
                    should_render
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error handling event");
                    false
                }
            }
        }

        fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
            match event {
                zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
                zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
                zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                    format!("WebRequestResult({status})")
                }
                zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                    "PermissionRequestResult".to_string()
                }
                _ => "Other".to_string(),
            }
        }

        /// Maps keyboard events to application events.
        fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
            tracing::debug!(bare_key = ?key.bare_key, "key event");

            if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
                return Some(Event::KeyDown);
            }
            if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
                return Some(Event::KeyUp);
            }

            if self.app.input_mode == InputMode::Search {
                return Some(match key.bare_key {
                    BareKey::Enter | BareKey::Esc => Event::ExitSearch,
                    BareKey::Down => Event::KeyDown,
                    BareKey::Up => Event::KeyUp,
                    BareKey::Backspace => Event::Backspace,
                    BareKey::Char(c) => Event::Char(c),
                    _ => return None,
                });
            }

            Some(match key.bare_key {
                BareKey::Tab => Event::NextTab,
                BareKey::Char('1') => Event::SelectTab(Tab::Patients),
                BareKey::Char('2') => Event::SelectTab(Tab::Transactions),
                BareKey::Char('3') => Event::SelectTab(Tab::Stats),
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                BareKey::Left | BareKey::Char('h') => Event::PrevPage,
                BareKey::Right | BareKey::Char('l') => Event::NextPage,
                BareKey::Char('/') => Event::SearchMode,
                BareKey::Enter => Event::OpenSelected,
                BareKey::Esc => Event::Back,
                BareKey::Char('r') => Event::Refresh,
                BareKey::Char('q') => Event::CloseFocus,
                _ => return None,
            })
        }

        /// Executes an action returned from event handling.
        #[tracing::instrument(level = "debug", skip(self))]
        fn execute_action(&self, action: &Action) {
            match action {
                Action::CloseFocus => hide_self(),
                Action::ArmTimer(delay) => set_timeout(delay.as_secs_f64()),
                Action::FetchList { .. } | Action::FetchDetail { .. } | Action::FetchStats { .. } => {
                    if let Some(request) = action.web_request(&self.app.api) {
                        tracing::debug!(url = %request.url, "issuing web request");
                        web_request(
                            request.url.as_str(),
                            HttpVerb::Get,
                            BTreeMap::from([(
                                "Accept".to_string(),
                                "application/json".to_string(),
                            )]),
                            vec![],
                            request.context.to_map(),
                        );
                    }
                }
            }
        }
    }
}

/// The plugin only runs inside Zellij's WASM runtime.
#[cfg(not(target_family = "wasm"))]
fn main() {
    eprintln!("medboard is a Zellij plugin; build it for wasm32-wasip1 and load the .wasm in Zellij");
}
