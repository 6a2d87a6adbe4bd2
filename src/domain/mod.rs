//! Domain layer for the Medboard plugin.
//!
//! Core types shared by every other layer, independent of Zellij APIs.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`pagination`]: Server-reported pagination block
//! - [`records`]: Records returned by the API (patients, transactions, ...)

pub mod error;
pub mod pagination;
pub mod records;

pub use error::{DashboardError, FetchError, Result};
pub use pagination::Pagination;
pub use records::{
    ListItem, MedicalRecord, Patient, PatientDetail, RecordId, Stats, Transaction,
};
