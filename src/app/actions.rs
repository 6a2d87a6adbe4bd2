//! Side effects requested by the event handler.
//!
//! The handler never talks to the host. It returns a `Vec<Action>` and the
//! plugin shim executes them in order: fetches become web requests, timers
//! become `set_timeout` calls.
//!
//! # Example
//!
//! ```rust
//! use medboard::api::{ApiEndpoints, DEFAULT_API_URL};
//! use medboard::app::Action;
//! use medboard::listing::RequestToken;
//!
//! let api = ApiEndpoints::parse(DEFAULT_API_URL)?;
//! let action = Action::FetchStats { token: RequestToken::new(1) };
//! let request = action.web_request(&api).expect("stats is a web request");
//! assert_eq!(request.url.path(), "/api/stats");
//! # Ok::<(), medboard::DashboardError>(())
//! ```

use std::time::Duration;

use crate::api::{ApiEndpoints, DetailPart, ListKind, RequestContext, WebRequest};
use crate::domain::RecordId;
use crate::listing::{FetchRequest, RequestToken};

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Fetches one page of a list view.
    FetchList {
        kind: ListKind,
        request: FetchRequest,
    },

    /// Fetches one half of a patient detail.
    FetchDetail {
        id: RecordId,
        part: DetailPart,
        token: RequestToken,
    },

    /// Fetches the aggregate counters.
    FetchStats { token: RequestToken },

    /// Arms a host timer; its expiry arrives as a tick.
    ArmTimer(Duration),
}

impl Action {
    /// Translates fetch actions into a URL plus the context the host echoes
    /// back. Other actions yield `None`.
    #[must_use]
    pub fn web_request(&self, api: &ApiEndpoints) -> Option<WebRequest> {
        let (url, context) = match self {
            Self::FetchList { kind, request } => (
                api.list(*kind, &request.key),
                RequestContext::List {
                    kind: *kind,
                    token: request.token,
                    page: request.key.page,
                },
            ),
            Self::FetchDetail { id, part, token } => (
                match part {
                    DetailPart::Patient => api.patient(id),
                    DetailPart::Records => api.patient_records(id),
                },
                RequestContext::Detail {
                    part: *part,
                    token: *token,
                },
            ),
            Self::FetchStats { token } => (api.stats(), RequestContext::Stats { token: *token }),
            Self::CloseFocus | Self::ArmTimer(_) => return None,
        };
        Some(WebRequest { url, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_API_URL;
    use crate::listing::QueryKey;

    #[test]
    fn list_action_carries_page_in_context() {
        let api = ApiEndpoints::parse(DEFAULT_API_URL).unwrap();
        let action = Action::FetchList {
            kind: ListKind::Patients,
            request: FetchRequest {
                token: RequestToken::new(7),
                key: QueryKey {
                    filter: "ann".into(),
                    page: 2,
                    page_size: 10,
                    scope: None,
                },
            },
        };
        let request = action.web_request(&api).unwrap();
        assert_eq!(request.url.query(), Some("page=2&limit=10&search=ann"));
        assert_eq!(
            request.context,
            RequestContext::List {
                kind: ListKind::Patients,
                token: RequestToken::new(7),
                page: 2
            }
        );
    }

    #[test]
    fn detail_parts_hit_different_urls() {
        let api = ApiEndpoints::parse(DEFAULT_API_URL).unwrap();
        let id = RecordId::new("12");
        let urls: Vec<String> = [DetailPart::Patient, DetailPart::Records]
            .into_iter()
            .map(|part| {
                Action::FetchDetail {
                    id: id.clone(),
                    part,
                    token: RequestToken::new(1),
                }
                .web_request(&api)
                .unwrap()
                .url
                .path()
                .to_string()
            })
            .collect();
        assert_eq!(urls, ["/api/patients/12", "/api/patients/12/records"]);
    }

    #[test]
    fn timers_are_not_web_requests() {
        let api = ApiEndpoints::parse(DEFAULT_API_URL).unwrap();
        assert!(Action::ArmTimer(Duration::from_millis(300)).web_request(&api).is_none());
        assert!(Action::CloseFocus.web_request(&api).is_none());
    }
}
