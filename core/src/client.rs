//! REST consumer: resolves an endpoint + API path pair against the settings
//! registry and builds requests relative to the resulting base URL.
//!
//! # Design
//! `RestClient` holds only the resolved `base_url` and carries no mutable
//! state between calls. The `get`/`post`/`put`/`patch`/`delete` methods
//! produce [`RestRequest`] values without touching the network; JSON bodies
//! are serialized at build time so a built request is fully self-contained.

use serde_json::Value;

use crate::error::RestError;
use crate::http::{HttpMethod, RestRequest};
use crate::settings::Settings;
use crate::url::path_join;

/// Endpoint and API path selection for a consumer, both falling back to the
/// registry defaults when omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerOptions {
    pub endpoint_name: Option<String>,
    pub api_path_name: Option<String>,
}

/// Consumer bound to a resolved endpoint + API path pair.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
}

impl RestClient {
    /// Resolve `options` against `settings`. The endpoint name (given or
    /// default) is required and must be registered; the API path is optional
    /// and, when present, is joined onto the endpoint value.
    pub fn new(settings: &Settings, options: &ConsumerOptions) -> Result<Self, RestError> {
        let endpoint_name = options
            .endpoint_name
            .as_deref()
            .or_else(|| settings.default_endpoint())
            .ok_or(RestError::NoEndpoint)?;
        let endpoint = settings
            .endpoint(endpoint_name)
            .ok_or_else(|| RestError::UnknownEndpoint(endpoint_name.to_string()))?;

        let api_path = match options
            .api_path_name
            .as_deref()
            .or_else(|| settings.default_api_path())
        {
            Some(name) => Some(
                settings
                    .api_path(name)
                    .ok_or_else(|| RestError::UnknownApiPath(name.to_string()))?,
            ),
            None => None,
        };

        let base_url = match api_path {
            Some(api_path) => path_join(endpoint, api_path),
            None => endpoint.trim_end_matches('/').to_string(),
        };
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str, headers: &[(String, String)]) -> RestRequest {
        self.bodyless(HttpMethod::Get, path, headers)
    }

    pub fn delete(&self, path: &str, headers: &[(String, String)]) -> RestRequest {
        self.bodyless(HttpMethod::Delete, path, headers)
    }

    pub fn post(
        &self,
        path: &str,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<RestRequest, RestError> {
        self.bodied(HttpMethod::Post, path, body, headers)
    }

    pub fn put(
        &self,
        path: &str,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<RestRequest, RestError> {
        self.bodied(HttpMethod::Put, path, body, headers)
    }

    pub fn patch(
        &self,
        path: &str,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<RestRequest, RestError> {
        self.bodied(HttpMethod::Patch, path, body, headers)
    }

    fn bodyless(&self, method: HttpMethod, path: &str, headers: &[(String, String)]) -> RestRequest {
        RestRequest {
            method,
            url: path_join(&self.base_url, path),
            headers: headers.to_vec(),
            body: None,
        }
    }

    fn bodied(
        &self,
        method: HttpMethod,
        path: &str,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<RestRequest, RestError> {
        let body =
            serde_json::to_string(body).map_err(|e| RestError::Serialization(e.to_string()))?;
        let mut all_headers =
            vec![("content-type".to_string(), "application/json".to_string())];
        all_headers.extend(headers.iter().cloned());
        Ok(RestRequest {
            method,
            url: path_join(&self.base_url, path),
            headers: all_headers,
            body: Some(body),
        })
    }
}
