//! Access to the dashboard's HTTP API.
//!
//! The plugin never performs I/O itself; it describes requests (URL plus a
//! [`RequestContext`]) and the host executes them. This module owns both ends
//! of that exchange: building URLs and decoding what comes back.
//!
//! # Modules
//!
//! - [`endpoints`]: Base URL validation and per-resource URLs
//! - [`context`]: Routing data echoed back with each response
//! - [`codec`]: Status classification and JSON decoding

pub mod codec;
pub mod context;
pub mod endpoints;

pub use context::{DetailPart, RequestContext};
pub use endpoints::{ApiEndpoints, ListKind, DEFAULT_API_URL};

/// A GET request ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRequest {
    pub url: url::Url,
    pub context: RequestContext,
}
