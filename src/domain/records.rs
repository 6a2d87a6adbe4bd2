//! Records returned by the remote API.
//!
//! The list controller treats items as opaque apart from their identifier (see
//! [`ListItem`]). The concrete record types below exist for the presentation
//! layer, which renders a handful of their fields. Every field except the id is
//! optional: the API is not under our control and a missing column should not
//! make a whole page undecodable.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable identifier of a record.
///
/// The API sends ids as JSON strings or integers depending on the resource;
/// both are normalised to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(i) => Self(i.to_string()),
            Raw::Uint(u) => Self(u.to_string()),
        })
    }
}

/// Accepts a string, number or boolean and keeps its textual form.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts a count as an integer, a numeric string or `null` (zero).
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid count {n}"))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(0),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid count {s:?}"))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid count {other}"))),
    }
}

/// An item that can be shown by a list view.
///
/// The list controller only ever needs the identifier; everything else is an
/// opaque payload passed through to the display layer.
pub trait ListItem: Clone + fmt::Debug {
    fn id(&self) -> &RecordId;
}

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wallet_address: Option<String>,
}

impl ListItem for Patient {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A ledger transaction (consent grant, record upload, payment, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub blockchain_tx_hash: Option<String>,
}

impl ListItem for Transaction {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A medical record attached to a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub doctor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hospital: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub blockchain_hash: Option<String>,
}

/// A patient together with their medical records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDetail {
    pub patient: Patient,
    pub records: Vec<MedicalRecord>,
}

/// Platform-wide aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    #[serde(deserialize_with = "lenient_count")]
    pub total_patients: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_records: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_consents: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub active_consents: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub pending_consents: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_transactions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_accept_strings_and_integers() {
        let from_text: RecordId = serde_json::from_str("\"p-17\"").unwrap();
        let from_int: RecordId = serde_json::from_str("17").unwrap();
        assert_eq!(from_text.as_str(), "p-17");
        assert_eq!(from_int.as_str(), "17");
    }

    #[test]
    fn patient_tolerates_missing_and_numeric_fields() {
        let patient: Patient = serde_json::from_str(
            r#"{"id": 3, "name": "Jane Roe", "phone": 5550100, "walletAddress": null}"#,
        )
        .unwrap();
        assert_eq!(patient.id.as_str(), "3");
        assert_eq!(patient.name.as_deref(), Some("Jane Roe"));
        assert_eq!(patient.phone.as_deref(), Some("5550100"));
        assert!(patient.wallet_address.is_none());
        assert!(patient.email.is_none());
    }

    #[test]
    fn transaction_maps_type_keyword() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id": "t1", "type": "consent_grant", "amount": 1.5, "currency": "ETH"}"#,
        )
        .unwrap();
        assert_eq!(tx.kind.as_deref(), Some("consent_grant"));
        assert_eq!(tx.amount.as_deref(), Some("1.5"));
    }

    #[test]
    fn stats_default_missing_counters_to_zero() {
        let stats: Stats = serde_json::from_str(r#"{"totalPatients": 12}"#).unwrap();
        assert_eq!(stats.total_patients, 12);
        assert_eq!(stats.pending_consents, 0);
    }

    #[test]
    fn stats_accept_null_and_text_counters() {
        let stats: Stats = serde_json::from_str(
            r#"{"totalPatients": "12", "pendingConsents": null, "totalRecords": " 40 ", "activeConsents": 3}"#,
        )
        .unwrap();
        assert_eq!(stats.total_patients, 12);
        assert_eq!(stats.pending_consents, 0);
        assert_eq!(stats.total_records, 40);
        assert_eq!(stats.active_consents, 3);
        assert_eq!(stats.total_transactions, 0);

        assert!(serde_json::from_str::<Stats>(r#"{"totalPatients": "many"}"#).is_err());
        assert!(serde_json::from_str::<Stats>(r#"{"totalPatients": -1}"#).is_err());
    }
}
