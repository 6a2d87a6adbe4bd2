//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point through which every keystroke,
//! timer tick and host response reaches the application. It mutates
//! [`AppState`] and returns whether a render is needed plus the side effects
//! to run, in order.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Mount`, `Tick`
//! - **Navigation**: `KeyDown`, `KeyUp`, `NextTab`, `SelectTab`, `PrevPage`,
//!   `NextPage`, `OpenSelected`, `Back`, `Refresh`, `CloseFocus`
//! - **Input**: `SearchMode`, `Char`, `Backspace`, `ExitSearch`
//! - **Responses**: `ListLoaded`, `DetailPartLoaded`, `StatsLoaded`
//! - **External**: `ScopeChanged`
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use medboard::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_render, actions) = handle_event(&mut state, &Event::Mount, Instant::now())?;
//! assert_eq!(actions.len(), 3);
//! # Ok::<(), medboard::DashboardError>(())
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use super::actions::Action;
use super::detail::DetailPayload;
use super::modes::{InputMode, Screen, Tab};
use super::state::AppState;
use crate::api::codec;
use crate::api::{DetailPart, ListKind, RequestContext};
use crate::domain::{FetchError, Patient, Result, Stats, Transaction};
use crate::listing::{ListPage, PageDelta, RequestToken, Resolution, TimerOutcome};

/// Decoded page of either list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Patients(std::result::Result<ListPage<Patient>, FetchError>),
    Transactions(std::result::Result<ListPage<Transaction>, FetchError>),
}

/// Events triggered by user input, timers or host responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Permissions were granted; issue the initial queries.
    Mount,
    /// A host timer fired; poll the debouncers.
    Tick,

    KeyDown,
    KeyUp,
    NextTab,
    SelectTab(Tab),
    PrevPage,
    NextPage,
    /// Opens the detail of the selected patient.
    OpenSelected,
    /// Leaves the detail screen.
    Back,
    /// Re-issues the visible query under a fresh token.
    Refresh,
    CloseFocus,

    SearchMode,
    ExitSearch,
    Char(char),
    Backspace,

    ListLoaded {
        token: RequestToken,
        outcome: ListOutcome,
    },
    DetailPartLoaded {
        token: RequestToken,
        part: DetailPart,
        outcome: std::result::Result<DetailPayload, FetchError>,
    },
    StatsLoaded {
        token: RequestToken,
        outcome: std::result::Result<Stats, FetchError>,
    },

    /// Sets or clears the wallet account scoping the transactions view.
    ScopeChanged(Option<String>),
}

impl Event {
    /// Decodes a host web response using the context echoed back with it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Decode`](crate::DashboardError::Decode) if
    /// the context is not one this plugin produced. Failures of the request
    /// itself are carried inside the returned event.
    pub fn from_web_response(
        status: u16,
        body: &[u8],
        context: &BTreeMap<String, String>,
    ) -> Result<Self> {
        Ok(match RequestContext::from_map(context)? {
            RequestContext::List { kind, token, page } => {
                let outcome = match kind {
                    ListKind::Patients => {
                        ListOutcome::Patients(codec::decode_list(kind, page, status, body))
                    }
                    ListKind::Transactions => {
                        ListOutcome::Transactions(codec::decode_list(kind, page, status, body))
                    }
                };
                Self::ListLoaded { token, outcome }
            }
            RequestContext::Detail { part, token } => {
                let outcome = match part {
                    DetailPart::Patient => {
                        codec::decode_patient(status, body).map(DetailPayload::Patient)
                    }
                    DetailPart::Records => {
                        codec::decode_records(status, body).map(DetailPayload::Records)
                    }
                };
                Self::DetailPartLoaded {
                    token,
                    part,
                    outcome,
                }
            }
            RequestContext::Stats { token } => Self::StatsLoaded {
                token,
                outcome: codec::decode_stats(status, body),
            },
        })
    }
}

/// Processes an event, mutates application state, and returns actions.
///
/// `now` is the instant the event is handled at; the debouncers measure
/// their quiet period against it.
///
/// # Errors
///
/// Reserved for failures that cannot be represented in state; request
/// failures never surface here.
#[allow(clippy::too_many_lines)]
pub fn handle_event(
    state: &mut AppState,
    event: &Event,
    now: Instant,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_name(event)).entered();

    match event {
        Event::Mount => {
            let actions = state.mount();
            Ok((!actions.is_empty(), actions))
        }
        Event::Tick => Ok(poll_debouncers(state, now)),
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::NextTab => {
            state.switch_tab(state.tab.next());
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        Event::SelectTab(tab) => {
            state.switch_tab(*tab);
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        Event::PrevPage | Event::NextPage => {
            let delta = if matches!(event, Event::PrevPage) {
                PageDelta::Previous
            } else {
                PageDelta::Next
            };
            let request = match state.active_list() {
                Some(ListKind::Patients) => state
                    .patients
                    .on_page_change(delta)
                    .map(|request| (ListKind::Patients, request)),
                Some(ListKind::Transactions) => state
                    .transactions
                    .on_page_change(delta)
                    .map(|request| (ListKind::Transactions, request)),
                None => None,
            };
            Ok(request.map_or_else(
                || (false, vec![]),
                |(kind, request)| (true, vec![Action::FetchList { kind, request }]),
            ))
        }
        Event::OpenSelected => {
            let Some(id) = state.selected_patient().map(|p| p.id.clone()) else {
                tracing::debug!("no patient selected");
                return Ok((false, vec![]));
            };
            Ok((true, state.open_detail(id)))
        }
        Event::Back => {
            if state.screen != Screen::PatientDetail {
                return Ok((false, vec![]));
            }
            state.detail.close();
            state.screen = Screen::Browse;
            Ok((true, vec![]))
        }
        Event::Refresh => Ok((true, refresh(state))),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::SearchMode => {
            if state.active_list().is_none() {
                return Ok((false, vec![]));
            }
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search;
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        Event::Char(c) => Ok(edit_search(state, now, |raw| raw.push(*c))),
        Event::Backspace => Ok(edit_search(state, now, |raw| {
            raw.pop();
        })),
        Event::ListLoaded { token, outcome } => {
            let (kind, resolution) = match outcome {
                ListOutcome::Patients(result) => (
                    ListKind::Patients,
                    state.patients.apply(*token, result.clone()),
                ),
                ListOutcome::Transactions(result) => (
                    ListKind::Transactions,
                    state.transactions.apply(*token, result.clone()),
                ),
            };
            if resolution == Resolution::Applied && state.tab.list() == Some(kind) {
                state.selected_index = 0;
            }
            Ok((resolution.changed(), vec![]))
        }
        Event::DetailPartLoaded {
            token,
            part,
            outcome,
        } => {
            let step = state.detail.on_part(*token, *part, outcome.clone());
            Ok((step.changed(), vec![]))
        }
        Event::StatsLoaded { token, outcome } => {
            let resolution = state.stats.resolve(*token, outcome.clone());
            Ok((resolution.changed(), vec![]))
        }
        Event::ScopeChanged(scope) => {
            tracing::debug!(scope = ?scope, "transactions scope changed");
            let request = state.transactions.set_scope(scope.clone());
            Ok((
                true,
                request
                    .map(|request| Action::FetchList {
                        kind: ListKind::Transactions,
                        request,
                    })
                    .into_iter()
                    .collect(),
            ))
        }
    }
}

/// Edits the raw search input of the active list in search mode.
fn edit_search(
    state: &mut AppState,
    now: Instant,
    edit: impl FnOnce(&mut String),
) -> (bool, Vec<Action>) {
    if state.input_mode != InputMode::Search {
        return (false, vec![]);
    }
    let Some(kind) = state.active_list() else {
        return (false, vec![]);
    };

    let mut raw = state.filter_input(kind).to_string();
    edit(&mut raw);
    tracing::trace!(query = %raw, "search input updated");
    let delay = state.search_input(kind, raw, now);
    (true, vec![Action::ArmTimer(delay)])
}

fn poll_debouncers(state: &mut AppState, now: Instant) -> (bool, Vec<Action>) {
    let mut actions = Vec::new();
    for (kind, outcome) in [
        (ListKind::Patients, state.patients.on_timer(now)),
        (ListKind::Transactions, state.transactions.on_timer(now)),
    ] {
        match outcome {
            TimerOutcome::Idle => {}
            TimerOutcome::Rearm(remaining) => actions.push(Action::ArmTimer(remaining)),
            TimerOutcome::Fetch(request) => actions.push(Action::FetchList { kind, request }),
        }
    }
    let render = actions
        .iter()
        .any(|action| matches!(action, Action::FetchList { .. }));
    (render, actions)
}

fn refresh(state: &mut AppState) -> Vec<Action> {
    match (state.screen, state.tab) {
        (Screen::PatientDetail, _) => state.reload_detail(),
        (Screen::Browse, Tab::Patients) => vec![Action::FetchList {
            kind: ListKind::Patients,
            request: state.patients.refresh(),
        }],
        (Screen::Browse, Tab::Transactions) => vec![Action::FetchList {
            kind: ListKind::Transactions,
            request: state.transactions.refresh(),
        }],
        (Screen::Browse, Tab::Stats) => vec![state.refresh_stats()],
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mount => "mount",
        Event::Tick => "tick",
        Event::KeyDown => "key_down",
        Event::KeyUp => "key_up",
        Event::NextTab => "next_tab",
        Event::SelectTab(_) => "select_tab",
        Event::PrevPage => "prev_page",
        Event::NextPage => "next_page",
        Event::OpenSelected => "open_selected",
        Event::Back => "back",
        Event::Refresh => "refresh",
        Event::CloseFocus => "close_focus",
        Event::SearchMode => "search_mode",
        Event::ExitSearch => "exit_search",
        Event::Char(_) => "char",
        Event::Backspace => "backspace",
        Event::ListLoaded { .. } => "list_loaded",
        Event::DetailPartLoaded { .. } => "detail_part_loaded",
        Event::StatsLoaded { .. } => "stats_loaded",
        Event::ScopeChanged(_) => "scope_changed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiEndpoints, DEFAULT_API_URL};
    use crate::domain::Pagination;
    use crate::listing::FetchRequest;
    use crate::ui::Theme;
    use crate::Config;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(
            &Config::default(),
            ApiEndpoints::parse(DEFAULT_API_URL).unwrap(),
            Theme::default(),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn list_requests(actions: &[Action]) -> Vec<(ListKind, FetchRequest)> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::FetchList { kind, request } => Some((*kind, request.clone())),
                _ => None,
            })
            .collect()
    }

    fn patients_loaded(request: &FetchRequest, names: &[&str], total_pages: u32) -> Event {
        let items = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                serde_json::from_value(serde_json::json!({ "id": i, "name": n })).unwrap()
            })
            .collect();
        Event::ListLoaded {
            token: request.token,
            outcome: ListOutcome::Patients(Ok(ListPage {
                items,
                pagination: Pagination {
                    page: request.key.page,
                    total_pages,
                    total: u64::from(total_pages) * 10,
                },
            })),
        }
    }

    fn mounted() -> (AppState, FetchRequest, Instant) {
        let t0 = Instant::now();
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Mount, t0).unwrap();
        let patients = list_requests(&actions)[0].1.clone();
        (state, patients, t0)
    }

    #[test]
    fn typing_burst_results_in_one_fetch() {
        let (mut state, mount, t0) = mounted();
        handle_event(&mut state, &patients_loaded(&mount, &["a"], 4), t0).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::NextPage, t0).unwrap();
        let page2 = list_requests(&actions)[0].1.clone();
        handle_event(&mut state, &patients_loaded(&page2, &["b"], 4), t0).unwrap();

        handle_event(&mut state, &Event::SearchMode, t0).unwrap();
        let mut timers = Vec::new();
        for (i, c) in "john".chars().enumerate() {
            let at = t0 + ms(100 * i as u64);
            let (_, actions) = handle_event(&mut state, &Event::Char(c), at).unwrap();
            timers.push(actions);
        }
        assert!(timers
            .iter()
            .all(|actions| matches!(actions.as_slice(), [Action::ArmTimer(d)] if *d == ms(300))));

        let mut fetches = Vec::new();
        for fire in [300, 400, 500, 600] {
            let (_, actions) = handle_event(&mut state, &Event::Tick, t0 + ms(fire)).unwrap();
            fetches.extend(list_requests(&actions));
        }

        assert_eq!(fetches.len(), 1);
        let (kind, request) = &fetches[0];
        assert_eq!(*kind, ListKind::Patients);
        assert_eq!(request.key.filter, "john");
        assert_eq!(request.key.page, 1);
    }

    #[test]
    fn slightly_early_tick_rearms_for_remaining_time() {
        let (mut state, _, t0) = mounted();
        handle_event(&mut state, &Event::SearchMode, t0).unwrap();
        handle_event(&mut state, &Event::Char('x'), t0).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Tick, t0 + ms(100)).unwrap();
        assert!(actions.is_empty(), "superseded or early timer is ignored");
        let (_, actions) = handle_event(&mut state, &Event::Tick, t0 + ms(297)).unwrap();
        assert_eq!(actions, vec![Action::ArmTimer(ms(3))]);
    }

    #[test]
    fn stale_page_response_does_not_overwrite_newer() {
        let (mut state, mount, t0) = mounted();
        handle_event(&mut state, &patients_loaded(&mount, &["p1"], 3), t0).unwrap();

        let (_, a) = handle_event(&mut state, &Event::Refresh, t0).unwrap();
        let refresh = list_requests(&a)[0].1.clone();
        let (_, a) = handle_event(&mut state, &Event::NextPage, t0).unwrap();
        let next = list_requests(&a)[0].1.clone();

        let (render, _) =
            handle_event(&mut state, &patients_loaded(&refresh, &["stale"], 3), t0).unwrap();
        assert!(!render);
        handle_event(&mut state, &patients_loaded(&next, &["p2"], 3), t0).unwrap();

        let snap = state.patients.snapshot();
        assert_eq!(snap.page, 2);
        assert_eq!(snap.items[0].name.as_deref(), Some("p2"));
    }

    #[test]
    fn paging_is_clamped_at_both_ends() {
        let (mut state, mount, t0) = mounted();
        handle_event(&mut state, &patients_loaded(&mount, &["only"], 1), t0).unwrap();
        let (render, actions) = handle_event(&mut state, &Event::PrevPage, t0).unwrap();
        assert!(!render && actions.is_empty());
        let (render, actions) = handle_event(&mut state, &Event::NextPage, t0).unwrap();
        assert!(!render && actions.is_empty());
    }

    #[test]
    fn chars_outside_search_mode_are_ignored() {
        let (mut state, _, t0) = mounted();
        let (render, actions) = handle_event(&mut state, &Event::Char('a'), t0).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.patients.filter_input(), "");
    }

    #[test]
    fn exit_search_keeps_pending_input() {
        let (mut state, _, t0) = mounted();
        handle_event(&mut state, &Event::SearchMode, t0).unwrap();
        handle_event(&mut state, &Event::Char('z'), t0).unwrap();
        handle_event(&mut state, &Event::ExitSearch, t0).unwrap();
        assert_eq!(state.input_mode, InputMode::Normal);

        let (_, actions) = handle_event(&mut state, &Event::Tick, t0 + ms(300)).unwrap();
        let fetches = list_requests(&actions);
        assert_eq!(fetches.len(), 1);
        assert_eq!(fetches[0].1.key.filter, "z");
    }

    #[test]
    fn search_targets_active_tab() {
        let (mut state, _, t0) = mounted();
        handle_event(&mut state, &Event::SelectTab(Tab::Transactions), t0).unwrap();
        handle_event(&mut state, &Event::SearchMode, t0).unwrap();
        handle_event(&mut state, &Event::Char('0'), t0).unwrap();
        assert_eq!(state.transactions.filter_input(), "0");
        assert_eq!(state.patients.filter_input(), "");

        let (_, actions) = handle_event(&mut state, &Event::Tick, t0 + ms(300)).unwrap();
        assert_eq!(list_requests(&actions)[0].0, ListKind::Transactions);
    }

    #[test]
    fn stats_tab_has_no_search() {
        let (mut state, _, t0) = mounted();
        handle_event(&mut state, &Event::SelectTab(Tab::Stats), t0).unwrap();
        let (render, _) = handle_event(&mut state, &Event::SearchMode, t0).unwrap();
        assert!(!render);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn open_selected_patient_fetches_both_parts() {
        let (mut state, mount, t0) = mounted();
        handle_event(&mut state, &patients_loaded(&mount, &["Ann", "Bo"], 1), t0).unwrap();
        handle_event(&mut state, &Event::KeyDown, t0).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::OpenSelected, t0).unwrap();
        assert_eq!(state.screen, Screen::PatientDetail);
        let parts: Vec<DetailPart> = actions
            .iter()
            .filter_map(|a| match a {
                Action::FetchDetail { id, part, .. } => {
                    assert_eq!(id.as_str(), "1");
                    Some(*part)
                }
                _ => None,
            })
            .collect();
        assert_eq!(parts, vec![DetailPart::Patient, DetailPart::Records]);

        handle_event(&mut state, &Event::Back, t0).unwrap();
        assert_eq!(state.screen, Screen::Browse);
        assert!(state.detail.target().is_none());
    }

    #[test]
    fn scope_change_refetches_transactions() {
        let (mut state, _, t0) = mounted();
        let (_, actions) =
            handle_event(&mut state, &Event::ScopeChanged(Some("0xabc".into())), t0).unwrap();
        let fetches = list_requests(&actions);
        assert_eq!(fetches[0].0, ListKind::Transactions);
        assert_eq!(fetches[0].1.key.scope.as_deref(), Some("0xabc"));
    }

    #[test]
    fn refresh_on_stats_tab_reissues_stats() {
        let (mut state, _, t0) = mounted();
        handle_event(&mut state, &Event::NextTab, t0).unwrap();
        handle_event(&mut state, &Event::NextTab, t0).unwrap();
        assert_eq!(state.tab, Tab::Stats);
        let (_, actions) = handle_event(&mut state, &Event::Refresh, t0).unwrap();
        assert!(matches!(actions.as_slice(), [Action::FetchStats { .. }]));
    }

    #[test]
    fn web_response_routes_by_context() {
        let ctx = RequestContext::List {
            kind: ListKind::Patients,
            token: RequestToken::new(3),
            page: 1,
        }
        .to_map();
        let event = Event::from_web_response(
            200,
            br#"{"patients": [{"id": 1, "name": "Ann"}], "pagination": {"page": 1, "totalPages": 1, "total": 1}}"#,
            &ctx,
        )
        .unwrap();
        let Event::ListLoaded {
            token,
            outcome: ListOutcome::Patients(Ok(page)),
        } = event
        else {
            panic!("expected a patients page");
        };
        assert_eq!(token, RequestToken::new(3));
        assert_eq!(page.items.len(), 1);

        let ctx = RequestContext::Detail {
            part: DetailPart::Patient,
            token: RequestToken::new(4),
        }
        .to_map();
        let event = Event::from_web_response(404, b"", &ctx).unwrap();
        assert!(matches!(
            event,
            Event::DetailPartLoaded {
                outcome: Err(FetchError::NotFound(_)),
                ..
            }
        ));

        assert!(Event::from_web_response(200, b"{}", &BTreeMap::new()).is_err());
    }
}
