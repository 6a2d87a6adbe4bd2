//! Medboard: a Zellij plugin for browsing a medical records dashboard API.
//!
//! Medboard shows two paginated, searchable lists (patients and blockchain
//! transactions), a patient detail screen with medical records, and a stats
//! page, all fetched from an HTTP API.
//!
//! Each list is driven by a controller that:
//! - debounces search input and resets to page 1 on every committed filter
//! - tags every request with a monotonic token and drops stale responses
//! - keeps the previous rows visible while a request is in flight or failed
//! - derives previous/next availability from server pagination

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! │  keys, timers, web requests, pipes                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, tabs, detail screen              │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Listing Core  │   │ API Layer     │
//! │ (ui/)         │   │ (listing/)    │   │ (api/)        │
//! │ - Rendering   │   │ - Debounce    │   │ - URLs        │
//! │ - Theming     │   │ - Query state │   │ - Contexts    │
//! │ - Components  │   │ - Tokens      │   │ - JSON codec  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types, records, pagination (domain/)       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/medboard.wasm" {
//!         api_url "http://localhost:3001"
//!         patients_page_size "10"
//!         transactions_page_size "20"
//!         debounce_ms "300"
//!         wallet "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
//!         theme "catppuccin-latte"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! A wallet can also be connected at runtime by piping its address to the
//! plugin: `zellij pipe --name wallet -- 0x5aAe...`. An empty payload
//! disconnects it.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//! use medboard::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//!
//! let (_render, actions) = handle_event(&mut state, &Event::Mount, Instant::now())?;
//! for action in &actions {
//!     if let Some(request) = action.web_request(&state.api) {
//!         println!("GET {}", request.url);
//!     }
//! }
//! # Ok::<(), medboard::DashboardError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Native**: the library and its tests build on any host

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod listing;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, Screen, Tab};
pub use domain::{DashboardError, FetchError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use api::{ApiEndpoints, DEFAULT_API_URL};
use listing::DEFAULT_DEBOUNCE;

const DEFAULT_PATIENTS_PAGE_SIZE: u32 = 10;
const DEFAULT_TRANSACTIONS_PAGE_SIZE: u32 = 20;
#[allow(clippy::cast_possible_truncation)]
const DEFAULT_DEBOUNCE_MS: u64 = DEFAULT_DEBOUNCE.as_millis() as u64;

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the dashboard API. Default: `http://localhost:3001`
    pub api_url: String,

    /// Rows per patients page. Always greater than zero. Default: 10
    pub patients_page_size: u32,

    /// Rows per transactions page. Always greater than zero. Default: 20
    pub transactions_page_size: u32,

    /// Quiet period after the last keystroke before a search is committed.
    pub debounce: Duration,

    /// Wallet account restricting the transactions list.
    pub wallet: Option<String>,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`. Ignored if
    /// `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            patients_page_size: DEFAULT_PATIENTS_PAGE_SIZE,
            transactions_page_size: DEFAULT_TRANSACTIONS_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            wallet: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Every key falls back to its default when absent or unparsable; a
    /// rejected value is logged. Blank strings count as absent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use medboard::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("patients_page_size".to_string(), "25".to_string());
    /// map.insert("debounce_ms".to_string(), "150".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.patients_page_size, 25);
    /// assert_eq!(config.debounce, Duration::from_millis(150));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            api_url: text("api_url").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            patients_page_size: parse_or(
                config,
                "patients_page_size",
                DEFAULT_PATIENTS_PAGE_SIZE,
                |n| *n > 0,
            ),
            transactions_page_size: parse_or(
                config,
                "transactions_page_size",
                DEFAULT_TRANSACTIONS_PAGE_SIZE,
                |n| *n > 0,
            ),
            debounce: Duration::from_millis(parse_or(
                config,
                "debounce_ms",
                DEFAULT_DEBOUNCE_MS,
                |_| true,
            )),
            wallet: text("wallet"),
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
        }
    }
}

/// Parses `key` as `T`, keeping `default` when absent, malformed or rejected
/// by `valid`.
fn parse_or<T>(config: &BTreeMap<String, String>, key: &str, default: T, valid: fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = config.get(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!(key, value = %raw, default = %default, "invalid config value, using default");
            default
        }
    }
}

/// Initializes the plugin with configuration.
///
/// Loads the theme (from file, name, or default) and validates the API base
/// URL, falling back to the defaults with a log line when either is
/// unusable. The returned state has not mounted yet: nothing is fetched
/// until [`Event::Mount`].
///
/// # Example
///
/// ```rust
/// use medboard::{Config, initialize};
///
/// let config = Config {
///     api_url: "https://ehr.example.org".to_string(),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.api.base().as_str(), "https://ehr.example.org/");
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api_url = %config.api_url, "initializing medboard plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(
                Theme::default,
                |theme_name| {
                    Theme::from_name(theme_name).unwrap_or_else(|| {
                        tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                        Theme::default()
                    })
                },
            )
        },
        |theme_file| {
            let path = infrastructure::paths::expand_tilde(theme_file);
            Theme::from_file(&path).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(config, ApiEndpoints::or_default(&config.api_url), theme)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_yields_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn parses_every_key() {
        let config = Config::from_zellij(&map(&[
            ("api_url", " https://ehr.example.org "),
            ("patients_page_size", "5"),
            ("transactions_page_size", "50"),
            ("debounce_ms", "0"),
            ("wallet", "0xabc"),
            ("theme", "catppuccin-latte"),
            ("theme_file", "~/themes/mine.toml"),
            ("trace_level", "debug"),
        ]));

        assert_eq!(config.api_url, "https://ehr.example.org");
        assert_eq!(config.patients_page_size, 5);
        assert_eq!(config.transactions_page_size, 50);
        assert_eq!(config.debounce, Duration::ZERO);
        assert_eq!(config.wallet.as_deref(), Some("0xabc"));
        assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
        assert_eq!(config.theme_file.as_deref(), Some("~/themes/mine.toml"));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("patients_page_size", "0"),
            ("transactions_page_size", "lots"),
            ("debounce_ms", "-5"),
            ("wallet", "   "),
        ]));

        assert_eq!(config.patients_page_size, 10);
        assert_eq!(config.transactions_page_size, 20);
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.wallet, None);
    }

    #[test]
    fn initialize_applies_config() {
        let config = Config {
            api_url: "::not a url::".to_string(),
            wallet: Some("0xabc".to_string()),
            theme_name: Some("catppuccin-latte".to_string()),
            ..Config::default()
        };
        let state = initialize(&config);

        assert_eq!(state.api.base().as_str(), "http://localhost:3001/");
        assert_eq!(state.theme.name, "catppuccin-latte");
        assert_eq!(state.transactions.query().scope(), Some("0xabc"));
        assert!(!state.is_mounted());
    }

    #[test]
    fn missing_theme_file_uses_default() {
        let config = Config {
            theme_file: Some("/no/such/theme.toml".to_string()),
            ..Config::default()
        };
        assert_eq!(initialize(&config).theme, Theme::default());
    }
}
