//! Request context echoed back by the host with each web response.
//!
//! The host hands back the exact string map attached to a request, so
//! everything needed to route a response (which view, which token, which
//! page was asked for) is encoded here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::endpoints::ListKind;
use crate::domain::{DashboardError, Result};
use crate::listing::RequestToken;

const RESOURCE: &str = "resource";
const TOKEN: &str = "token";
const PAGE: &str = "page";
const PART: &str = "part";

/// One half of the patient detail join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailPart {
    Patient,
    Records,
}

impl DetailPart {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Records => "records",
        }
    }
}

/// Routing information for an in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestContext {
    List {
        kind: ListKind,
        token: RequestToken,
        page: u32,
    },
    Detail {
        part: DetailPart,
        token: RequestToken,
    },
    Stats {
        token: RequestToken,
    },
}

impl RequestContext {
    #[must_use]
    pub const fn token(&self) -> RequestToken {
        match self {
            Self::List { token, .. } | Self::Detail { token, .. } | Self::Stats { token } => {
                *token
            }
        }
    }

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(TOKEN.to_string(), self.token().get().to_string());
        match self {
            Self::List { kind, page, .. } => {
                map.insert(RESOURCE.to_string(), kind.path().to_string());
                map.insert(PAGE.to_string(), page.to_string());
            }
            Self::Detail { part, .. } => {
                map.insert(RESOURCE.to_string(), "detail".to_string());
                map.insert(PART.to_string(), part.as_str().to_string());
            }
            Self::Stats { .. } => {
                map.insert(RESOURCE.to_string(), "stats".to_string());
            }
        }
        map
    }

    /// Parses a context map produced by [`RequestContext::to_map`].
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Decode`] for missing or malformed entries.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let token = required(map, TOKEN)?
            .parse::<u64>()
            .map(RequestToken::new)
            .map_err(|e| DashboardError::Decode(format!("bad request token: {e}")))?;

        match required(map, RESOURCE)? {
            "patients" => Self::list(map, ListKind::Patients, token),
            "transactions" => Self::list(map, ListKind::Transactions, token),
            "detail" => {
                let part = match required(map, PART)? {
                    "patient" => DetailPart::Patient,
                    "records" => DetailPart::Records,
                    other => {
                        return Err(DashboardError::Decode(format!("unknown detail part {other:?}")))
                    }
                };
                Ok(Self::Detail { part, token })
            }
            "stats" => Ok(Self::Stats { token }),
            other => Err(DashboardError::Decode(format!("unknown resource {other:?}"))),
        }
    }

    fn list(map: &BTreeMap<String, String>, kind: ListKind, token: RequestToken) -> Result<Self> {
        let page = required(map, PAGE)?
            .parse::<u32>()
            .map_err(|e| DashboardError::Decode(format!("bad page: {e}")))?;
        Ok(Self::List { kind, token, page })
    }
}

fn required<'a>(map: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    map.get(key)
        .map(String::as_str)
        .ok_or_else(|| DashboardError::Decode(format!("request context is missing {key:?}")))
}
