//! Path manipulation utilities for Zellij sandbox environment.
//!
//! In the Zellij plugin sandbox the host filesystem is mounted under `/host`.
//! These helpers map user-facing paths (`~/...`) onto it and name the
//! plugin's own files.

use std::path::PathBuf;

const TRACE_FILE: &str = "medboard-otlp.json";

/// Returns the data directory for Medboard files.
///
/// The directory is located at `/host/.local/share/zellij/medboard` in the
/// Zellij sandbox. `/host` points to the cwd of the last focused terminal, or
/// the folder where Zellij was started, so this typically resolves to
/// `~/.local/share/zellij/medboard`.
///
/// # Examples
///
/// ```
/// use medboard::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/medboard");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("medboard")
}

/// OTLP trace output inside [`get_data_dir`].
#[must_use]
pub fn trace_file() -> PathBuf {
    get_data_dir().join(TRACE_FILE)
}

/// Expands tilde paths to use the `/host` prefix for Zellij sandbox.
///
/// Used for user-supplied file locations such as `theme_file`.
///
/// # Examples
///
/// ```
/// use medboard::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
