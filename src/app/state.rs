//! Application state and view model computation.
//!
//! [`AppState`] owns one [`ListViewController`] per list tab, the patient
//! detail loader and the stats coordinator, plus the purely visual state
//! (tab, screen, input mode, selected row, theme).
//!
//! The controllers are the source of truth for what is on screen. Everything
//! the renderer needs is derived from them on demand by
//! [`AppState::compute_viewmodel`].

use std::time::{Duration, Instant};

use fuzzy_matcher::skim::SkimMatcherV2;

use super::actions::Action;
use super::detail::DetailLoader;
use super::modes::{InputMode, Screen, Tab};
use crate::api::{ApiEndpoints, DetailPart, ListKind};
use crate::domain::{
    FetchError, ListItem, Patient, PatientDetail, RecordId, Stats, Transaction,
};
use crate::listing::{FetchCoordinator, ListSnapshot, ListViewController, RequestToken};
use crate::ui::helpers::{
    display_or_missing, fit, format_date, format_timestamp, highlight_ranges, shorten_address,
};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    Body, Column, DetailView, DisplayRow, EmptyState, FooterInfo, HeaderInfo, PagerInfo,
    SearchBarInfo, StatsView, StatusLine, TabLabel, TableView, UIViewModel,
};
use crate::Config;

/// Lines used by everything except table rows in browse layout.
const CHROME_ROWS: usize = 8;
const SEARCH_BAR_ROWS: usize = 3;

const PATIENT_COLUMNS: [Column; 5] = [
    Column { title: "NAME", width: 24 },
    Column { title: "PATIENT ID", width: 12 },
    Column { title: "EMAIL", width: 28 },
    Column { title: "PHONE", width: 16 },
    Column { title: "WALLET", width: 17 },
];

const TRANSACTION_COLUMNS: [Column; 6] = [
    Column { title: "TYPE", width: 18 },
    Column { title: "STATUS", width: 10 },
    Column { title: "FROM", width: 17 },
    Column { title: "TO", width: 17 },
    Column { title: "AMOUNT", width: 14 },
    Column { title: "TIME", width: 16 },
];

const RECORD_COLUMNS: [Column; 5] = [
    Column { title: "DATE", width: 10 },
    Column { title: "TITLE", width: 28 },
    Column { title: "TYPE", width: 14 },
    Column { title: "DOCTOR", width: 20 },
    Column { title: "HOSPITAL", width: 20 },
];

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub patients: ListViewController<Patient>,
    pub transactions: ListViewController<Transaction>,
    pub detail: DetailLoader,
    pub stats: FetchCoordinator<Stats>,

    /// Where fetch actions are sent.
    pub api: ApiEndpoints,

    pub tab: Tab,
    pub screen: Screen,
    pub input_mode: InputMode,

    /// Zero-based row within the active list's current page.
    ///
    /// Reset to 0 whenever a new page is applied or the tab changes.
    pub selected_index: usize,

    pub theme: Theme,

    mounted: bool,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config, api: ApiEndpoints, theme: Theme) -> Self {
        Self {
            patients: ListViewController::new(config.patients_page_size, config.debounce, None),
            transactions: ListViewController::new(
                config.transactions_page_size,
                config.debounce,
                config.wallet.clone(),
            ),
            detail: DetailLoader::new(),
            stats: FetchCoordinator::new(),
            api,
            tab: Tab::default(),
            screen: Screen::default(),
            input_mode: InputMode::default(),
            selected_index: 0,
            theme,
            mounted: false,
        }
    }

    /// Issues the initial queries of every view, once.
    pub fn mount(&mut self) -> Vec<Action> {
        if self.mounted {
            return vec![];
        }
        self.mounted = true;

        let mut actions = Vec::with_capacity(3);
        if let Some(request) = self.patients.mount() {
            actions.push(Action::FetchList {
                kind: ListKind::Patients,
                request,
            });
        }
        if let Some(request) = self.transactions.mount() {
            actions.push(Action::FetchList {
                kind: ListKind::Transactions,
                request,
            });
        }
        actions.push(self.refresh_stats());
        actions
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn refresh_stats(&mut self) -> Action {
        Action::FetchStats {
            token: self.stats.issue(),
        }
    }

    /// Opens the detail screen for `id` and returns the two part fetches.
    pub fn open_detail(&mut self, id: RecordId) -> Vec<Action> {
        let token = self.detail.open(id.clone());
        self.screen = Screen::PatientDetail;
        self.input_mode = InputMode::Normal;
        detail_fetches(&id, token)
    }

    /// Reloads the open detail under a fresh token.
    pub fn reload_detail(&mut self) -> Vec<Action> {
        self.detail
            .reload()
            .map(|(id, token)| detail_fetches(&id, token))
            .unwrap_or_default()
    }

    /// The list receiving paging and search keys, if any.
    #[must_use]
    pub const fn active_list(&self) -> Option<ListKind> {
        match self.screen {
            Screen::Browse => self.tab.list(),
            Screen::PatientDetail => None,
        }
    }

    fn active_len(&self) -> usize {
        match self.active_list() {
            Some(ListKind::Patients) => self.patients.items().len(),
            Some(ListKind::Transactions) => self.transactions.items().len(),
            None => 0,
        }
    }

    /// Raw search input of `kind`.
    #[must_use]
    pub fn filter_input(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::Patients => self.patients.filter_input(),
            ListKind::Transactions => self.transactions.filter_input(),
        }
    }

    /// Replaces the search input of `kind`; returns the timer to arm.
    pub fn search_input(&mut self, kind: ListKind, raw: String, now: Instant) -> Duration {
        match kind {
            ListKind::Patients => self.patients.on_search_input(raw, now),
            ListKind::Transactions => self.transactions.on_search_input(raw, now),
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab || self.screen != Screen::Browse {
            if self.screen == Screen::PatientDetail {
                self.detail.close();
            }
            self.tab = tab;
            self.screen = Screen::Browse;
            self.selected_index = 0;
        }
    }

    /// Moves the selection down one row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Moves the selection up one row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index = self.selected_index.min(len) - 1;
        }
    }

    #[must_use]
    pub fn selected_patient(&self) -> Option<&Patient> {
        if self.active_list() != Some(ListKind::Patients) {
            return None;
        }
        self.patients.items().get(self.selected_index)
    }

    /// Computes a renderable view model for a pane of `rows` x `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let search_bar = self.compute_search_bar();
        let chrome = CHROME_ROWS + if search_bar.is_some() { SEARCH_BAR_ROWS } else { 0 };
        let available_rows = rows.saturating_sub(chrome).max(1);

        let (body, status) = match (self.screen, self.tab) {
            (Screen::PatientDetail, _) => self.compute_detail(available_rows),
            (Screen::Browse, Tab::Patients) => {
                let snapshot = self.patients.snapshot();
                let table = self.compute_table(
                    &snapshot,
                    &PATIENT_COLUMNS,
                    available_rows,
                    patient_cells,
                    "patients",
                );
                (Body::Table(table), list_status(&snapshot, "patients"))
            }
            (Screen::Browse, Tab::Transactions) => {
                let snapshot = self.transactions.snapshot();
                let table = self.compute_table(
                    &snapshot,
                    &TRANSACTION_COLUMNS,
                    available_rows,
                    transaction_cells,
                    "transactions",
                );
                (Body::Table(table), list_status(&snapshot, "transactions"))
            }
            (Screen::Browse, Tab::Stats) => self.compute_stats(),
        };

        UIViewModel {
            header: self.compute_header(cols),
            search_bar,
            body,
            status,
            footer: self.compute_footer(),
        }
    }

    fn compute_table<T: ListItem>(
        &self,
        snapshot: &ListSnapshot<'_, T>,
        columns: &[Column],
        available_rows: usize,
        cells: fn(&T) -> Vec<String>,
        noun: &str,
    ) -> TableView {
        let (start, end) = window(snapshot.items.len(), self.selected_index, available_rows);
        let matcher = (!snapshot.committed_filter.is_empty()).then(SkimMatcherV2::default);

        let rows = snapshot.items[start..end]
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                let texts = cells(item);
                let fitted: Vec<String> = texts
                    .iter()
                    .zip(columns)
                    .map(|(text, column)| fit(text, column.width))
                    .collect();
                let highlight_ranges = match (&matcher, texts.first()) {
                    (Some(m), Some(first)) => {
                        highlight_ranges(m, first, snapshot.committed_filter)
                    }
                    _ => vec![],
                };
                DisplayRow {
                    cells: fitted,
                    is_selected: start + offset == self.selected_index,
                    highlight_ranges,
                }
            })
            .collect();

        let pager = Some(PagerInfo {
            text: snapshot.pagination.map_or_else(
                || format!("Page {}", snapshot.page),
                |p| {
                    format!(
                        "Page {} of {} (total {})",
                        snapshot.page,
                        p.total_pages.max(1),
                        p.total
                    )
                },
            ),
            can_previous: snapshot.can_go_previous(),
            can_next: snapshot.can_go_next(),
        });

        let empty_state = snapshot.is_empty_result().then(|| EmptyState {
            message: format!("No {noun} found"),
            subtitle: if snapshot.committed_filter.is_empty() {
                "Nothing has been recorded yet".to_string()
            } else {
                format!("No matches for \"{}\"", snapshot.committed_filter)
            },
        });

        TableView {
            columns: columns.to_vec(),
            rows,
            selected_index: self.selected_index.saturating_sub(start),
            pager,
            empty_state,
        }
    }

    fn compute_detail(&self, available_rows: usize) -> (Body, Option<StatusLine>) {
        let status = if self.detail.loading() {
            Some(StatusLine::loading("Loading patient..."))
        } else {
            self.detail.error().map(|error| match error {
                FetchError::NotFound(_) => StatusLine::error("Patient not found"),
                other => StatusLine::error(other.to_string()),
            })
        };

        let title = self.detail.detail().map_or_else(
            || {
                self.detail
                    .target()
                    .map_or_else(|| "Patient".to_string(), |id| format!("Patient {id}"))
            },
            |d| display_or_missing(d.patient.name.as_deref()),
        );

        let view = DetailView {
            title,
            fields: self.detail.detail().map(patient_fields).unwrap_or_default(),
            records: records_table(self.detail.detail(), available_rows.saturating_sub(9)),
        };
        (Body::Detail(view), status)
    }

    fn compute_stats(&self) -> (Body, Option<StatusLine>) {
        let status = if self.stats.loading() {
            Some(StatusLine::loading("Loading statistics..."))
        } else {
            self.stats.error().map(|e| StatusLine::error(e.to_string()))
        };

        let value = |pick: fn(&Stats) -> u64| {
            self.stats
                .data()
                .map_or_else(|| "-".to_string(), |s| pick(s).to_string())
        };
        let counters = vec![
            ("Total Patients".to_string(), value(|s| s.total_patients)),
            ("Medical Records".to_string(), value(|s| s.total_records)),
            ("Total Consents".to_string(), value(|s| s.total_consents)),
            ("Active Consents".to_string(), value(|s| s.active_consents)),
            ("Pending Consents".to_string(), value(|s| s.pending_consents)),
            ("Transactions".to_string(), value(|s| s.total_transactions)),
        ];
        (Body::Stats(StatsView { counters }), status)
    }

    fn compute_header(&self, cols: usize) -> HeaderInfo {
        let count = |total: Option<u64>| total.map_or_else(String::new, |t| format!(" ({t})"));
        let tabs = Tab::ALL
            .iter()
            .map(|&tab| {
                let suffix = match tab {
                    Tab::Patients => count(self.patients.snapshot().pagination.map(|p| p.total)),
                    Tab::Transactions => {
                        count(self.transactions.snapshot().pagination.map(|p| p.total))
                    }
                    Tab::Stats => String::new(),
                };
                TabLabel {
                    label: format!("{}{suffix}", tab.title()),
                    active: tab == self.tab,
                }
            })
            .collect();

        let title = match self.transactions.query().scope() {
            Some(wallet) if cols >= 60 => format!(" Medboard  wallet {} ", shorten_address(wallet)),
            _ => " Medboard ".to_string(),
        };

        HeaderInfo { title, tabs }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.screen, self.input_mode, self.tab) {
            (Screen::PatientDetail, _, _) => "ESC: back  r: refresh  q: quit",
            (Screen::Browse, InputMode::Search, _) => {
                "Type to search  Backspace: delete  Enter/ESC: done"
            }
            (Screen::Browse, InputMode::Normal, Tab::Patients) => {
                "j/k: select  h/l: page  /: search  Enter: open  Tab: next  r: refresh  q: quit"
            }
            (Screen::Browse, InputMode::Normal, Tab::Transactions) => {
                "j/k: select  h/l: page  /: search  Tab: next  r: refresh  q: quit"
            }
            (Screen::Browse, InputMode::Normal, Tab::Stats) => {
                "Tab: next  1-3: jump  r: refresh  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        let kind = self.active_list()?;
        let (query, committed) = match kind {
            ListKind::Patients => (self.patients.filter_input(), self.patients.query().filter()),
            ListKind::Transactions => (
                self.transactions.filter_input(),
                self.transactions.query().filter(),
            ),
        };
        let focused = self.input_mode == InputMode::Search;
        if !focused && query.is_empty() {
            return None;
        }
        Some(SearchBarInfo {
            query: query.to_string(),
            focused,
            pending: query.trim() != committed,
        })
    }
}

fn detail_fetches(id: &RecordId, token: RequestToken) -> Vec<Action> {
    [DetailPart::Patient, DetailPart::Records]
        .into_iter()
        .map(|part| Action::FetchDetail {
            id: id.clone(),
            part,
            token,
        })
        .collect()
}

/// Window of at most `available` rows keeping `selected` near the middle.
fn window(len: usize, selected: usize, available: usize) -> (usize, usize) {
    if len <= available {
        return (0, len);
    }
    let start = selected.saturating_sub(available / 2).min(len - available);
    (start, start + available)
}

fn list_status<T>(snapshot: &ListSnapshot<'_, T>, noun: &str) -> Option<StatusLine> {
    if snapshot.loading {
        return Some(StatusLine::loading(format!("Loading {noun}...")));
    }
    snapshot.error.map(|error| {
        if snapshot.items.is_empty() {
            StatusLine::error(error.to_string())
        } else {
            StatusLine::error(format!("{error} (showing previous results)"))
        }
    })
}

fn patient_cells(patient: &Patient) -> Vec<String> {
    vec![
        display_or_missing(patient.name.as_deref()),
        display_or_missing(patient.patient_id.as_deref().or(Some(patient.id.as_str()))),
        display_or_missing(patient.email.as_deref()),
        display_or_missing(patient.phone.as_deref()),
        patient
            .wallet_address
            .as_deref()
            .map_or_else(|| "-".to_string(), shorten_address),
    ]
}

fn transaction_cells(tx: &Transaction) -> Vec<String> {
    let amount = match (tx.amount.as_deref(), tx.currency.as_deref()) {
        (Some(amount), Some(currency)) => format!("{amount} {currency}"),
        (Some(amount), None) => amount.to_string(),
        _ => "-".to_string(),
    };
    let address = |value: Option<&str>| value.map_or_else(|| "-".to_string(), shorten_address);
    vec![
        display_or_missing(tx.kind.as_deref()),
        display_or_missing(tx.status.as_deref()),
        address(tx.from.as_deref()),
        address(tx.to.as_deref()),
        amount,
        tx.timestamp
            .as_deref()
            .map_or_else(|| "-".to_string(), format_timestamp),
    ]
}

fn patient_fields(detail: &PatientDetail) -> Vec<(String, String)> {
    let p = &detail.patient;
    [
        ("Patient ID", display_or_missing(p.patient_id.as_deref().or(Some(p.id.as_str())))),
        ("Email", display_or_missing(p.email.as_deref())),
        ("Phone", display_or_missing(p.phone.as_deref())),
        (
            "Date of Birth",
            p.date_of_birth.as_deref().map_or_else(|| "-".to_string(), format_date),
        ),
        ("Gender", display_or_missing(p.gender.as_deref())),
        ("Address", display_or_missing(p.address.as_deref())),
        (
            "Wallet",
            p.wallet_address
                .as_deref()
                .map_or_else(|| "-".to_string(), shorten_address),
        ),
    ]
    .into_iter()
    .map(|(label, value)| (label.to_string(), value))
    .collect()
}

fn records_table(detail: Option<&PatientDetail>, available_rows: usize) -> TableView {
    let records = detail.map_or(&[][..], |d| d.records.as_slice());
    let rows = records
        .iter()
        .take(available_rows.max(1))
        .map(|r| {
            let texts = [
                r.date.as_deref().map_or_else(|| "-".to_string(), format_date),
                display_or_missing(r.title.as_deref()),
                display_or_missing(r.kind.as_deref()),
                display_or_missing(r.doctor.as_deref()),
                display_or_missing(r.hospital.as_deref()),
            ];
            DisplayRow {
                cells: texts
                    .iter()
                    .zip(&RECORD_COLUMNS)
                    .map(|(text, column)| fit(text, column.width))
                    .collect(),
                is_selected: false,
                highlight_ranges: vec![],
            }
        })
        .collect();

    TableView {
        columns: RECORD_COLUMNS.to_vec(),
        rows,
        selected_index: 0,
        pager: None,
        empty_state: (detail.is_some() && records.is_empty()).then(|| EmptyState {
            message: "No medical records".to_string(),
            subtitle: "Records uploaded for this patient appear here".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_API_URL;
    use crate::domain::Pagination;
    use crate::listing::ListPage;
    use crate::ui::viewmodel::StatusKind;

    fn state() -> AppState {
        AppState::new(
            &Config::default(),
            ApiEndpoints::parse(DEFAULT_API_URL).unwrap(),
            Theme::default(),
        )
    }

    fn patient(id: &str, name: &str) -> Patient {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    fn patients_page(names: &[&str], page: u32, total_pages: u32) -> ListPage<Patient> {
        ListPage {
            items: names
                .iter()
                .enumerate()
                .map(|(i, n)| patient(&i.to_string(), n))
                .collect(),
            pagination: Pagination {
                page,
                total_pages,
                total: 42,
            },
        }
    }

    fn load_patients(state: &mut AppState, names: &[&str]) {
        let token = state.patients.refresh().token;
        state.patients.apply(token, Ok(patients_page(names, 1, 5)));
    }

    #[test]
    fn mount_issues_every_view_once() {
        let mut state = state();
        let actions = state.mount();
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], Action::FetchList { kind: ListKind::Patients, .. }));
        assert!(matches!(actions[1], Action::FetchList { kind: ListKind::Transactions, .. }));
        assert!(matches!(actions[2], Action::FetchStats { .. }));
        assert!(state.mount().is_empty());
    }

    #[test]
    fn selection_wraps_within_page() {
        let mut state = state();
        load_patients(&mut state, &["a", "b", "c"]);
        state.move_selection_up();
        assert_eq!(state.selected_index, 2);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn pager_text_and_flags() {
        let mut state = state();
        load_patients(&mut state, &["Ann", "Bob"]);
        let vm = state.compute_viewmodel(30, 120);
        let Body::Table(table) = vm.body else {
            panic!("expected table");
        };
        let pager = table.pager.unwrap();
        assert_eq!(pager.text, "Page 1 of 5 (total 42)");
        assert!(!pager.can_previous);
        assert!(pager.can_next);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].is_selected);
    }

    #[test]
    fn loading_error_and_empty_are_distinct() {
        let mut state = state();
        state.mount();
        let vm = state.compute_viewmodel(30, 120);
        assert_eq!(vm.status.unwrap().kind, StatusKind::Loading);

        let token = state.patients.refresh().token;
        state.patients.apply(token, Err(FetchError::Network("offline".into())));
        let vm = state.compute_viewmodel(30, 120);
        assert_eq!(vm.status.as_ref().unwrap().kind, StatusKind::Error);
        let Body::Table(table) = vm.body else {
            panic!("expected table");
        };
        assert!(table.empty_state.is_none());

        let token = state.patients.refresh().token;
        state.patients.apply(token, Ok(patients_page(&[], 1, 0)));
        let vm = state.compute_viewmodel(30, 120);
        assert!(vm.status.is_none());
        let Body::Table(table) = vm.body else {
            panic!("expected table");
        };
        assert_eq!(table.empty_state.unwrap().message, "No patients found");
    }

    #[test]
    fn error_keeps_previous_rows_visible() {
        let mut state = state();
        load_patients(&mut state, &["Ann"]);
        let token = state.patients.refresh().token;
        state.patients.apply(token, Err(FetchError::server(500, "boom")));
        let vm = state.compute_viewmodel(30, 120);
        let Body::Table(table) = vm.body else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 1);
        assert!(vm.status.unwrap().message.contains("showing previous results"));
    }

    #[test]
    fn committed_filter_is_highlighted() {
        let mut state = state();
        let t0 = Instant::now();
        state.patients.mount();
        state.patients.on_search_input("ann", t0);
        let crate::listing::TimerOutcome::Fetch(req) =
            state.patients.on_timer(t0 + Duration::from_millis(300))
        else {
            panic!("expected fetch");
        };
        state
            .patients
            .apply(req.token, Ok(patients_page(&["Anna Lee"], 1, 1)));
        let vm = state.compute_viewmodel(30, 120);
        let Body::Table(table) = vm.body else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0].highlight_ranges, vec![(0, 3)]);
        assert!(vm.search_bar.is_some());
    }

    #[test]
    fn detail_not_found_message() {
        let mut state = state();
        let actions = state.open_detail(RecordId::new("9"));
        let Action::FetchDetail { token, .. } = actions[0] else {
            panic!("expected detail fetch");
        };
        state.detail.on_part(
            token,
            DetailPart::Patient,
            Err(FetchError::NotFound("missing".into())),
        );
        let vm = state.compute_viewmodel(30, 120);
        assert_eq!(vm.status.unwrap().message, "Patient not found");
        assert!(matches!(vm.body, Body::Detail(_)));
    }

    #[test]
    fn stats_render_dash_until_loaded() {
        let mut state = state();
        state.switch_tab(Tab::Stats);
        let Body::Stats(view) = state.compute_viewmodel(30, 120).body else {
            panic!("expected stats");
        };
        assert!(view.counters.iter().all(|(_, v)| v == "-"));
    }

    #[test]
    fn window_keeps_selection_visible() {
        assert_eq!(window(5, 4, 10), (0, 5));
        assert_eq!(window(20, 0, 5), (0, 5));
        assert_eq!(window(20, 10, 5), (8, 13));
        assert_eq!(window(20, 19, 5), (15, 20));
    }
}
