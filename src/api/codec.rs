//! Decoding of host web responses into domain values.
//!
//! Classification happens before decoding: only 2xx bodies are parsed as
//! data. Everything else becomes a [`FetchError`] the views can display.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::endpoints::ListKind;
use crate::domain::{FetchError, MedicalRecord, Pagination, Patient, Stats};
use crate::listing::ListPage;

/// Maps a status code and body to JSON or a classified error.
///
/// # Errors
///
/// - 404 yields [`FetchError::NotFound`]
/// - any other non-2xx status with a body yields [`FetchError::Server`]
/// - a non-2xx status without a body yields [`FetchError::Network`]
/// - an undecodable 2xx body yields [`FetchError::Server`]
pub fn classify(status: u16, body: &[u8]) -> Result<Value, FetchError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(|e| invalid(status, &e));
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();

    if status == 404 {
        let message = error_message(text).unwrap_or_else(|| "resource not found".to_string());
        return Err(FetchError::NotFound(message));
    }

    if text.is_empty() {
        return Err(FetchError::Network(format!(
            "no response from server (status {status})"
        )));
    }

    let message = error_message(text).unwrap_or_else(|| text.to_string());
    Err(FetchError::server(status, message))
}

/// Prefers the `error` or `message` field of a JSON error body.
fn error_message(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(text).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(String::from)
}

fn invalid(status: u16, error: &serde_json::Error) -> FetchError {
    FetchError::server(status, format!("invalid response: {error}"))
}

/// Decodes one page of a list endpoint.
///
/// The envelope is `{<collection>: [...], pagination: {...}}`. A missing
/// collection is an empty page; a missing pagination block is a single page
/// reporting the requested page number.
///
/// # Errors
///
/// See [`classify`]; a collection that is present but malformed is a
/// [`FetchError::Server`].
pub fn decode_list<T: DeserializeOwned>(
    kind: ListKind,
    requested_page: u32,
    status: u16,
    body: &[u8],
) -> Result<ListPage<T>, FetchError> {
    let mut value = classify(status, body)?;

    let items: Vec<T> = match value.get_mut(kind.collection_key()).map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value(raw).map_err(|e| invalid(status, &e))?,
    };

    let pagination = match value.get_mut("pagination").map(Value::take) {
        None | Some(Value::Null) => {
            Pagination::single_page(requested_page, items.len() as u64)
        }
        Some(raw) => serde_json::from_value(raw).map_err(|e| invalid(status, &e))?,
    };

    Ok(ListPage { items, pagination })
}

/// Decodes `GET /api/patients/{id}`, bare or wrapped in `{patient: ...}`.
///
/// # Errors
///
/// See [`classify`].
pub fn decode_patient(status: u16, body: &[u8]) -> Result<Patient, FetchError> {
    let mut value = classify(status, body)?;
    let raw = match value.get_mut("patient") {
        Some(inner) if inner.is_object() => inner.take(),
        _ => value,
    };
    serde_json::from_value(raw).map_err(|e| invalid(status, &e))
}

/// Decodes `GET /api/patients/{id}/records`; a missing list is empty.
///
/// # Errors
///
/// See [`classify`].
pub fn decode_records(status: u16, body: &[u8]) -> Result<Vec<MedicalRecord>, FetchError> {
    let mut value = classify(status, body)?;
    match value.get_mut("records").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(raw) => serde_json::from_value(raw).map_err(|e| invalid(status, &e)),
    }
}

/// Decodes `GET /api/stats`; absent or `null` counters are zero.
///
/// # Errors
///
/// See [`classify`].
pub fn decode_stats(status: u16, body: &[u8]) -> Result<Stats, FetchError> {
    let value = classify(status, body)?;
    serde_json::from_value(value).map_err(|e| invalid(status, &e))
}
