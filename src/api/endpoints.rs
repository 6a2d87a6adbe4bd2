//! URL construction for the dashboard API.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{DashboardError, RecordId, Result};
use crate::listing::QueryKey;

/// Base URL used when none (or an unusable one) is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// The two paginated collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Patients,
    Transactions,
}

impl ListKind {
    /// Path segment under `/api`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Transactions => "transactions",
        }
    }

    /// Key of the item array in the response envelope.
    #[must_use]
    pub const fn collection_key(self) -> &'static str {
        self.path()
    }
}

/// Builds request URLs against a validated base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: Url,
}

impl ApiEndpoints {
    /// Validates `base` as an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the URL does not parse or uses a
    /// scheme other than http/https.
    pub fn parse(base: &str) -> Result<Self> {
        let url = Url::parse(base.trim())
            .map_err(|e| DashboardError::Config(format!("invalid api_url {base:?}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "api_url must be an http(s) URL, got {base:?}"
            )));
        }

        Ok(Self { base: url })
    }

    /// Endpoints for `api_url`, or for [`DEFAULT_API_URL`] if it is unusable.
    #[must_use]
    pub fn or_default(api_url: &str) -> Self {
        Self::parse(api_url).unwrap_or_else(|e| {
            tracing::warn!(error = %e, fallback = DEFAULT_API_URL, "unusable api_url");
            Self::default()
        })
    }

    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// `GET /api/{patients|transactions}?page&limit[&search][&walletAddress]`
    #[must_use]
    pub fn list(&self, kind: ListKind, key: &QueryKey) -> Url {
        let mut url = self.join(&["api", kind.path()]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &key.page.to_string())
                .append_pair("limit", &key.page_size.to_string());
            if !key.filter.is_empty() {
                query.append_pair("search", &key.filter);
            }
            if let Some(scope) = &key.scope {
                query.append_pair("walletAddress", scope);
            }
        }
        url
    }

    /// `GET /api/patients/{id}`
    #[must_use]
    pub fn patient(&self, id: &RecordId) -> Url {
        self.join(&["api", "patients", id.as_str()])
    }

    /// `GET /api/patients/{id}/records`
    #[must_use]
    pub fn patient_records(&self, id: &RecordId) -> Url {
        self.join(&["api", "patients", id.as_str(), "records"])
    }

    /// `GET /api/stats`
    #[must_use]
    pub fn stats(&self) -> Url {
        self.join(&["api", "stats"])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for ApiEndpoints {
    /// Endpoints for [`DEFAULT_API_URL`].
    ///
    /// # Panics
    ///
    /// Panics if the built-in default URL fails to parse, which the tests rule out.
    fn default() -> Self {
        Self::parse(DEFAULT_API_URL).expect("built-in default api_url should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> ApiEndpoints {
        ApiEndpoints::default()
    }

    fn key(filter: &str, page: u32, scope: Option<&str>) -> QueryKey {
        QueryKey {
            filter: filter.to_string(),
            page,
            page_size: 10,
            scope: scope.map(String::from),
        }
    }

    #[test]
    fn list_url_omits_empty_filter() {
        let api = local();
        let url = api.list(ListKind::Patients, &key("", 1, None));
        assert_eq!(url.as_str(), "http://localhost:3001/api/patients?page=1&limit=10");
    }

    #[test]
    fn list_url_encodes_filter_and_scope() {
        let api = ApiEndpoints::parse("https://api.example.org/v2/").unwrap();
        let url = api.list(ListKind::Transactions, &key("jane doe&co", 3, Some("0xAbC")));
        assert_eq!(
            url.as_str(),
            "https://api.example.org/v2/api/transactions?page=3&limit=10&search=jane+doe%26co&walletAddress=0xAbC"
        );
    }

    #[test]
    fn detail_urls_escape_ids() {
        let api = local();
        let id = RecordId::new("a/b");
        assert_eq!(api.patient(&id).as_str(), "http://localhost:3001/api/patients/a%2Fb");
        assert_eq!(
            api.patient_records(&RecordId::new("42")).as_str(),
            "http://localhost:3001/api/patients/42/records"
        );
        assert_eq!(api.stats().as_str(), "http://localhost:3001/api/stats");
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(ApiEndpoints::parse("ftp://example.org").is_err());
        assert!(ApiEndpoints::parse("not a url").is_err());
        assert!(ApiEndpoints::parse("mailto:ops@example.org").is_err());
    }

    #[test]
    fn unusable_url_falls_back_to_default() {
        assert_eq!(ApiEndpoints::or_default("nope"), local());
        assert_eq!(
            ApiEndpoints::or_default("https://ehr.example.org").base().as_str(),
            "https://ehr.example.org/"
        );
    }
}
