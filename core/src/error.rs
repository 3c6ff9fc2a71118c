//! Error types for the rest-model core.
//!
//! # Design
//! One enum covers the whole taxonomy: configuration mistakes (invalid
//! registry entries, duplicate defaults, unknown names, missing ids) are
//! detected before any request is issued, while `Http` carries the raw
//! response and the originating request verbatim — no retry, no wrapping.
//! Absent wire fields are not errors; they resolve through the field default
//! chain instead.

use thiserror::Error;

use crate::http::{RestRequest, WireResponse};

/// Errors returned by the settings registry, the request builders, and the
/// CRUD operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// An endpoint entry was missing its name or value.
    #[error("endpoint entry is not valid, expected {{ name: \"...\", value: \"...\" }}")]
    InvalidEndpointEntry,

    /// An API path entry was missing its name or value.
    #[error("api path entry is not valid, expected {{ name: \"...\", value: \"...\" }}")]
    InvalidApiPathEntry,

    #[error("There can be only one default endpoint")]
    DuplicateDefaultEndpoint,

    #[error("There can be only one default api path")]
    DuplicateDefaultApiPath,

    /// The referenced endpoint name was never registered.
    #[error("endpoint {0:?} has not been added to settings")]
    UnknownEndpoint(String),

    /// The referenced API path name was never registered.
    #[error("api path {0:?} has not been added to settings")]
    UnknownApiPath(String),

    /// No endpoint name was given and the registry has no default endpoint.
    #[error("no endpoint name given and no default endpoint is set")]
    NoEndpoint,

    /// The named path template is not declared on the model type.
    #[error("path {path:?} is not declared on model {model:?}")]
    UnknownPath { path: String, model: String },

    /// A subset list (`data_keys` / `patch`) referenced an undeclared field.
    #[error("field {field:?} is not declared on model {model:?}")]
    UnknownField { field: String, model: String },

    #[error("id must be provided in options or set on the model before calling this method")]
    MissingId,

    /// The model handed to a type-level operation belongs to another type.
    #[error("model belongs to type {actual:?}, expected {expected:?}")]
    ModelMismatch { expected: String, actual: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Transport-level failure (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status. Carries the raw response
    /// and the request that produced it.
    #[error("HTTP {}: {}", .response.status, .response.body)]
    Http {
        response: WireResponse,
        request: RestRequest,
    },
}
