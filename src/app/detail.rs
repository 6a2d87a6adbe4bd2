//! Patient detail loading.
//!
//! A detail is the join of two requests (the patient and their medical
//! records) issued together under one token. The joined value is applied
//! only once both halves arrived for the current token. The first failing
//! half wins: its error is shown and the other half is dropped on arrival.

use crate::api::DetailPart;
use crate::domain::{FetchError, MedicalRecord, Patient, PatientDetail, RecordId};
use crate::listing::{FetchCoordinator, RequestToken, Resolution};

/// One decoded half of a detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPayload {
    Patient(Patient),
    Records(Vec<MedicalRecord>),
}

impl DetailPayload {
    #[must_use]
    pub const fn part(&self) -> DetailPart {
        match self {
            Self::Patient(_) => DetailPart::Patient,
            Self::Records(_) => DetailPart::Records,
        }
    }
}

/// Progress of the join after one half arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStep {
    /// Buffered; the other half is still in flight.
    Waiting,
    Resolved(Resolution),
}

impl JoinStep {
    /// Whether visible state changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        match self {
            Self::Waiting => false,
            Self::Resolved(resolution) => resolution.changed(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailLoader {
    fetch: FetchCoordinator<PatientDetail>,
    target: Option<RecordId>,
    patient: Option<Patient>,
    records: Option<Vec<MedicalRecord>>,
}

impl DetailLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts loading `id`, superseding any detail in flight.
    ///
    /// The caller issues both halves under the returned token.
    pub fn open(&mut self, id: RecordId) -> RequestToken {
        self.fetch.clear();
        self.patient = None;
        self.records = None;
        let token = self.fetch.issue();
        tracing::debug!(token = %token, patient_id = %id, "loading patient detail");
        self.target = Some(id);
        token
    }

    /// Re-issues the current target under a fresh token.
    pub fn reload(&mut self) -> Option<(RecordId, RequestToken)> {
        let id = self.target.clone()?;
        let token = self.open(id.clone());
        Some((id, token))
    }

    /// Leaves the detail; anything still in flight is dropped.
    pub fn close(&mut self) {
        self.fetch.invalidate();
        self.fetch.clear();
        self.target = None;
        self.patient = None;
        self.records = None;
    }

    /// Feeds one half of the join.
    pub fn on_part(
        &mut self,
        token: RequestToken,
        part: DetailPart,
        outcome: Result<DetailPayload, FetchError>,
    ) -> JoinStep {
        if !self.fetch.is_current(token) {
            tracing::debug!(token = %token, part = part.as_str(), "discarding superseded detail part");
            return JoinStep::Resolved(Resolution::Superseded);
        }

        match outcome {
            Err(error) => {
                let resolution = self.fetch.resolve(token, Err(error));
                // the sibling half is now stale
                self.fetch.invalidate();
                JoinStep::Resolved(resolution)
            }
            Ok(DetailPayload::Patient(patient)) => {
                self.patient = Some(patient);
                self.try_join(token)
            }
            Ok(DetailPayload::Records(records)) => {
                self.records = Some(records);
                self.try_join(token)
            }
        }
    }

    fn try_join(&mut self, token: RequestToken) -> JoinStep {
        match (self.patient.take(), self.records.take()) {
            (Some(patient), Some(records)) => JoinStep::Resolved(
                self.fetch
                    .resolve(token, Ok(PatientDetail { patient, records })),
            ),
            (patient, records) => {
                self.patient = patient;
                self.records = records;
                JoinStep::Waiting
            }
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<&RecordId> {
        self.target.as_ref()
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.fetch.loading()
    }

    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        self.fetch.error()
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&PatientDetail> {
        self.fetch.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: &str) -> Patient {
        serde_json::from_value(serde_json::json!({ "id": id, "name": "Jane" })).unwrap()
    }

    fn record(id: &str) -> MedicalRecord {
        serde_json::from_value(serde_json::json!({ "id": id, "title": "Blood panel" })).unwrap()
    }

    #[test]
    fn detail_applies_after_both_parts() {
        let mut loader = DetailLoader::new();
        let token = loader.open(RecordId::new("1"));

        let step = loader.on_part(
            token,
            DetailPart::Records,
            Ok(DetailPayload::Records(vec![record("r1")])),
        );
        assert_eq!(step, JoinStep::Waiting);
        assert!(loader.loading());
        assert!(loader.detail().is_none());

        let step = loader.on_part(
            token,
            DetailPart::Patient,
            Ok(DetailPayload::Patient(patient("1"))),
        );
        assert_eq!(step, JoinStep::Resolved(Resolution::Applied));
        let detail = loader.detail().unwrap();
        assert_eq!(detail.patient.id.as_str(), "1");
        assert_eq!(detail.records.len(), 1);
        assert!(!loader.loading());
    }

    #[test]
    fn first_failure_wins_and_sibling_is_dropped() {
        let mut loader = DetailLoader::new();
        let token = loader.open(RecordId::new("404"));

        let step = loader.on_part(
            token,
            DetailPart::Patient,
            Err(FetchError::NotFound("no such patient".into())),
        );
        assert_eq!(step, JoinStep::Resolved(Resolution::Failed));

        let late = loader.on_part(token, DetailPart::Records, Ok(DetailPayload::Records(vec![])));
        assert_eq!(late, JoinStep::Resolved(Resolution::Superseded));
        assert!(matches!(loader.error(), Some(FetchError::NotFound(_))));
        assert!(loader.detail().is_none());
    }

    #[test]
    fn opening_another_patient_supersedes_previous() {
        let mut loader = DetailLoader::new();
        let first = loader.open(RecordId::new("1"));
        let second = loader.open(RecordId::new("2"));

        let step = loader.on_part(first, DetailPart::Patient, Ok(DetailPayload::Patient(patient("1"))));
        assert_eq!(step, JoinStep::Resolved(Resolution::Superseded));

        loader.on_part(second, DetailPart::Patient, Ok(DetailPayload::Patient(patient("2"))));
        loader.on_part(second, DetailPart::Records, Ok(DetailPayload::Records(vec![])));
        assert_eq!(loader.detail().unwrap().patient.id.as_str(), "2");
        assert_eq!(loader.target(), Some(&RecordId::new("2")));
    }

    #[test]
    fn reopening_clears_previous_detail() {
        let mut loader = DetailLoader::new();
        let token = loader.open(RecordId::new("1"));
        loader.on_part(token, DetailPart::Patient, Ok(DetailPayload::Patient(patient("1"))));
        loader.on_part(token, DetailPart::Records, Ok(DetailPayload::Records(vec![])));

        loader.open(RecordId::new("2"));
        assert!(loader.detail().is_none());
        assert!(loader.loading());
    }

    #[test]
    fn close_drops_in_flight_parts() {
        let mut loader = DetailLoader::new();
        let token = loader.open(RecordId::new("1"));
        loader.close();
        let step = loader.on_part(token, DetailPart::Patient, Ok(DetailPayload::Patient(patient("1"))));
        assert!(!step.changed());
        assert!(loader.target().is_none());
    }
}
