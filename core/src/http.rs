//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `RestRequest` values and interprets `WireResponse` values
//! without ever touching the network — the caller (host) supplies a
//! [`Transport`] that performs the actual I/O. This separation keeps the core
//! deterministic and easy to test: every CRUD operation is also available as
//! a pure `*_request` builder that stops before dispatch.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved into
//! error variants and logged without lifetime concerns.

use serde_json::Value;

use crate::error::RestError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by [`RestClient`](crate::client::RestClient) and the model CRUD
/// `*_request` methods. The `url` field is the fully resolved request URL,
/// which makes the builder methods double as a URL-preview mode: callers can
/// inspect the request without dispatching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the [`Transport`] after executing a [`RestRequest`], then
/// interpreted by the CRUD operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    pub fn json(&self) -> Result<Value, RestError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| RestError::Deserialization(e.to_string()))
    }
}

/// Executes a [`RestRequest`] and returns the raw [`WireResponse`].
///
/// The core never performs I/O itself; integration tests drive the mock
/// server through a ureq-backed implementation, and applications plug in
/// whatever HTTP stack they already use. Status interpretation stays in the
/// core: implementations should return non-2xx responses as `Ok` data and
/// reserve `Err` for transport-level failures (connection refused, timeout).
pub trait Transport {
    fn execute(&self, request: &RestRequest) -> Result<WireResponse, RestError>;
}
