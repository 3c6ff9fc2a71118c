//! Settings registry: named endpoints, named API path templates, default
//! selections and per-model headers.
//!
//! # Design
//! `Settings` is an explicit value constructed once at startup and passed by
//! reference into [`RestClient`](crate::client::RestClient) and every CRUD
//! call — there is no process-wide state, so tests configure their own
//! registry in isolation. At most one default endpoint and one default API
//! path may ever be set; a second `default` registration is a configuration
//! error. List registration applies entries one by one, and a failing entry
//! aborts the remainder while earlier entries stay applied.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::RestError;

/// A named endpoint or API path registration.
///
/// `name` and `value` are both required to be non-empty. `default` marks the
/// entry as the registry-wide default for its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub default: bool,
}

impl RegistryEntry {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            default: false,
        }
    }

    /// Mark this entry as the default for its kind.
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }
}

/// Registry of endpoints, API paths and per-model headers.
#[derive(Debug, Default)]
pub struct Settings {
    endpoints: HashMap<String, String>,
    api_paths: HashMap<String, String>,
    default_endpoint: Option<String>,
    default_api_path: Option<String>,
    model_headers: HashMap<String, BTreeMap<String, String>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint. Fails on an empty name or value, and when the
    /// entry is marked default while another default endpoint exists. The
    /// endpoint itself is registered before the default check, so a duplicate
    /// default still leaves the endpoint addressable by name.
    pub fn add_endpoint(&mut self, entry: RegistryEntry) -> Result<(), RestError> {
        if entry.name.is_empty() || entry.value.is_empty() {
            return Err(RestError::InvalidEndpointEntry);
        }
        self.endpoints.insert(entry.name.clone(), entry.value);
        if entry.default {
            if self.default_endpoint.is_some() {
                return Err(RestError::DuplicateDefaultEndpoint);
            }
            self.default_endpoint = Some(entry.name);
        }
        Ok(())
    }

    /// Register several endpoints. Entries are applied in order; the first
    /// failing entry aborts the rest but earlier entries remain applied.
    pub fn add_endpoints<I>(&mut self, entries: I) -> Result<(), RestError>
    where
        I: IntoIterator<Item = RegistryEntry>,
    {
        for entry in entries {
            self.add_endpoint(entry)?;
        }
        Ok(())
    }

    /// Register an API path template. Same rules as [`Self::add_endpoint`].
    pub fn add_api_path(&mut self, entry: RegistryEntry) -> Result<(), RestError> {
        if entry.name.is_empty() || entry.value.is_empty() {
            return Err(RestError::InvalidApiPathEntry);
        }
        self.api_paths.insert(entry.name.clone(), entry.value);
        if entry.default {
            if self.default_api_path.is_some() {
                return Err(RestError::DuplicateDefaultApiPath);
            }
            self.default_api_path = Some(entry.name);
        }
        Ok(())
    }

    /// Register several API paths, with the same partial-application
    /// semantics as [`Self::add_endpoints`].
    pub fn add_api_paths<I>(&mut self, entries: I) -> Result<(), RestError>
    where
        I: IntoIterator<Item = RegistryEntry>,
    {
        for entry in entries {
            self.add_api_path(entry)?;
        }
        Ok(())
    }

    /// Select a previously registered endpoint as the default.
    pub fn set_default_endpoint(&mut self, name: &str) -> Result<(), RestError> {
        if !self.endpoints.contains_key(name) {
            return Err(RestError::UnknownEndpoint(name.to_string()));
        }
        self.default_endpoint = Some(name.to_string());
        Ok(())
    }

    /// Select a previously registered API path as the default.
    pub fn set_default_api_path(&mut self, name: &str) -> Result<(), RestError> {
        if !self.api_paths.contains_key(name) {
            return Err(RestError::UnknownApiPath(name.to_string()));
        }
        self.default_api_path = Some(name.to_string());
        Ok(())
    }

    /// Record a header sent with every request the named model issues.
    pub fn set_header(&mut self, model: &str, key: &str, value: &str) {
        self.model_headers
            .entry(model.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn endpoint(&self, name: &str) -> Option<&str> {
        self.endpoints.get(name).map(String::as_str)
    }

    pub fn api_path(&self, name: &str) -> Option<&str> {
        self.api_paths.get(name).map(String::as_str)
    }

    pub fn default_endpoint(&self) -> Option<&str> {
        self.default_endpoint.as_deref()
    }

    pub fn default_api_path(&self) -> Option<&str> {
        self.default_api_path.as_deref()
    }

    /// Headers registered for the named model, in stable key order.
    pub fn headers_for(&self, model: &str) -> Vec<(String, String)> {
        self.model_headers
            .get(model)
            .map(|headers| {
                headers
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_endpoint_registers_value() {
        let mut settings = Settings::new();
        settings
            .add_endpoint(RegistryEntry::new("api", "https://x.test"))
            .unwrap();
        assert_eq!(settings.endpoint("api"), Some("https://x.test"));
        assert_eq!(settings.default_endpoint(), None);
    }

    #[test]
    fn add_endpoint_rejects_empty_name_or_value() {
        let mut settings = Settings::new();
        let err = settings.add_endpoint(RegistryEntry::new("", "https://x.test")).unwrap_err();
        assert!(matches!(err, RestError::InvalidEndpointEntry));
        let err = settings.add_endpoint(RegistryEntry::new("api", "")).unwrap_err();
        assert!(matches!(err, RestError::InvalidEndpointEntry));
    }

    #[test]
    fn second_default_endpoint_fails() {
        let mut settings = Settings::new();
        settings
            .add_endpoint(RegistryEntry::new("api", "https://x.test").as_default())
            .unwrap();
        let err = settings
            .add_endpoint(RegistryEntry::new("api2", "https://y.test").as_default())
            .unwrap_err();
        assert_eq!(err.to_string(), "There can be only one default endpoint");
        // first default is untouched, second endpoint is still addressable
        assert_eq!(settings.default_endpoint(), Some("api"));
        assert_eq!(settings.endpoint("api2"), Some("https://y.test"));
    }

    #[test]
    fn second_default_endpoint_fails_in_list_form() {
        let mut settings = Settings::new();
        let err = settings
            .add_endpoints([
                RegistryEntry::new("api", "https://x.test").as_default(),
                RegistryEntry::new("api2", "https://y.test").as_default(),
            ])
            .unwrap_err();
        assert!(matches!(err, RestError::DuplicateDefaultEndpoint));
        assert_eq!(settings.default_endpoint(), Some("api"));
    }

    #[test]
    fn list_registration_is_applied_partially_on_error() {
        let mut settings = Settings::new();
        let err = settings
            .add_endpoints([
                RegistryEntry::new("api", "https://x.test"),
                RegistryEntry::new("", "broken"),
                RegistryEntry::new("api2", "https://y.test"),
            ])
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidEndpointEntry));
        assert_eq!(settings.endpoint("api"), Some("https://x.test"));
        assert_eq!(settings.endpoint("api2"), None);
    }

    #[test]
    fn second_default_api_path_fails() {
        let mut settings = Settings::new();
        settings
            .add_api_path(RegistryEntry::new("v1", "api/v1").as_default())
            .unwrap();
        let err = settings
            .add_api_path(RegistryEntry::new("v2", "api/v2").as_default())
            .unwrap_err();
        assert_eq!(err.to_string(), "There can be only one default api path");
    }

    #[test]
    fn set_default_endpoint_requires_registration() {
        let mut settings = Settings::new();
        let err = settings.set_default_endpoint("nope").unwrap_err();
        assert!(matches!(err, RestError::UnknownEndpoint(name) if name == "nope"));

        settings
            .add_endpoint(RegistryEntry::new("api", "https://x.test"))
            .unwrap();
        settings.set_default_endpoint("api").unwrap();
        assert_eq!(settings.default_endpoint(), Some("api"));
    }

    #[test]
    fn set_default_api_path_requires_registration() {
        let mut settings = Settings::new();
        let err = settings.set_default_api_path("nope").unwrap_err();
        assert!(matches!(err, RestError::UnknownApiPath(name) if name == "nope"));

        settings.add_api_path(RegistryEntry::new("v1", "api/v1")).unwrap();
        settings.set_default_api_path("v1").unwrap();
        assert_eq!(settings.default_api_path(), Some("v1"));
    }

    #[test]
    fn headers_are_scoped_per_model() {
        let mut settings = Settings::new();
        settings.set_header("Contact", "authorization", "Bearer t");
        settings.set_header("Contact", "x-tenant", "acme");
        settings.set_header("Order", "authorization", "Bearer u");

        assert_eq!(
            settings.headers_for("Contact"),
            vec![
                ("authorization".to_string(), "Bearer t".to_string()),
                ("x-tenant".to_string(), "acme".to_string()),
            ]
        );
        assert!(settings.headers_for("Unknown").is_empty());
    }

    #[test]
    fn registry_entry_deserializes_without_default_flag() {
        let entry: RegistryEntry =
            serde_json::from_str(r#"{"name":"api","value":"https://x.test"}"#).unwrap();
        assert!(!entry.default);
    }
}
