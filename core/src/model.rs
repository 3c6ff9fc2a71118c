//! Model descriptors, instances and the wire-format field converter.
//!
//! # Design
//! A model type is described once, at definition time, by a [`ModelType`]
//! value: the declared fields (with optional wire-name mapping and default),
//! the id field, the named path templates and the consumer selection. The
//! descriptor is immutable behind an `Arc`, so instances hold it as a cheap
//! handle and two instances of the same type share identity.
//!
//! A [`ModelInstance`] is a dynamic record whose keys are exactly the
//! declared field names. Conversion to and from the wire representation is
//! key renaming only — no type coercion, no nested mapping. Fields absent on
//! the wire resolve through the default chain: declared default (arrays and
//! objects yield a fresh empty container), else null.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RestError;

/// Declared shape of a single model field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Wire-format key, when it differs from the internal field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    /// Value supplied when the field is absent on construction. An array
    /// default yields a fresh `[]`, an object default a fresh `{}`, any other
    /// value is used as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wire-format key for this field.
    pub fn mapped_to(mut self, wire_key: &str) -> Self {
        self.map = Some(wire_key.to_string());
        self
    }

    /// Set the construction default for this field.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// The wire key this field reads from and writes to.
    pub fn wire_key<'a>(&'a self, field_name: &'a str) -> &'a str {
        self.map.as_deref().unwrap_or(field_name)
    }
}

/// Resolve a field's value through the declared chain: the value found on
/// the seed/wire object wins, else the declared default (fresh container for
/// array and object defaults), else null.
fn resolve_field_value(found: Option<Value>, def: &FieldDef) -> Value {
    if let Some(value) = found {
        return value;
    }
    match &def.default {
        Some(Value::Array(_)) => Value::Array(Vec::new()),
        Some(Value::Object(_)) => Value::Object(Map::new()),
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

/// How `all()` locates the result list inside a response.
#[derive(Clone)]
pub enum ResultListField {
    /// Read the named response field when it holds an array, else treat the
    /// whole response as the list.
    Name(String),
    /// Extract the list from the response with a caller-supplied function.
    Extract(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
}

impl ResultListField {
    pub fn name(name: &str) -> Self {
        ResultListField::Name(name.to_string())
    }

    pub fn extract<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        ResultListField::Extract(Arc::new(f))
    }
}

impl fmt::Debug for ResultListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultListField::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ResultListField::Extract(_) => f.write_str("Extract(..)"),
        }
    }
}

#[derive(Debug)]
struct TypeConfig {
    name: String,
    fields: BTreeMap<String, FieldDef>,
    id_field: String,
    paths: BTreeMap<String, String>,
    endpoint_name: Option<String>,
    api_path_name: Option<String>,
    result_list_field: Option<ResultListField>,
}

/// Immutable per-type configuration, cloned as a cheap handle.
#[derive(Debug, Clone)]
pub struct ModelType {
    inner: Arc<TypeConfig>,
}

/// Builder for [`ModelType`], used once at model-definition time.
#[derive(Debug)]
pub struct ModelTypeBuilder {
    config: TypeConfig,
}

impl ModelTypeBuilder {
    /// Declare a field. Declaring the id field is allowed and usual.
    pub fn field(mut self, name: &str, def: FieldDef) -> Self {
        self.config.fields.insert(name.to_string(), def);
        self
    }

    /// Name the id field. Defaults to `"id"`.
    pub fn id_field(mut self, name: &str) -> Self {
        self.config.id_field = name.to_string();
        self
    }

    /// Declare a named path template.
    pub fn path(mut self, name: &str, template: &str) -> Self {
        self.config.paths.insert(name.to_string(), template.to_string());
        self
    }

    /// Declare the `"default"` path template.
    pub fn default_path(self, template: &str) -> Self {
        self.path("default", template)
    }

    pub fn endpoint_name(mut self, name: &str) -> Self {
        self.config.endpoint_name = Some(name.to_string());
        self
    }

    pub fn api_path_name(mut self, name: &str) -> Self {
        self.config.api_path_name = Some(name.to_string());
        self
    }

    pub fn result_list_field(mut self, field: ResultListField) -> Self {
        self.config.result_list_field = Some(field);
        self
    }

    pub fn build(self) -> ModelType {
        ModelType {
            inner: Arc::new(self.config),
        }
    }
}

impl ModelType {
    pub fn builder(name: &str) -> ModelTypeBuilder {
        ModelTypeBuilder {
            config: TypeConfig {
                name: name.to_string(),
                fields: BTreeMap::new(),
                id_field: "id".to_string(),
                paths: BTreeMap::new(),
                endpoint_name: None,
                api_path_name: None,
                result_list_field: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn id_field(&self) -> &str {
        &self.inner.id_field
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.inner.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldDef)> {
        self.inner.fields.iter()
    }

    /// Look up a named path template.
    pub fn path(&self, name: &str) -> Result<&str, RestError> {
        self.inner
            .paths
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RestError::UnknownPath {
                path: name.to_string(),
                model: self.inner.name.clone(),
            })
    }

    pub fn endpoint_name(&self) -> Option<&str> {
        self.inner.endpoint_name.as_deref()
    }

    pub fn api_path_name(&self) -> Option<&str> {
        self.inner.api_path_name.as_deref()
    }

    pub fn result_list_field(&self) -> Option<&ResultListField> {
        self.inner.result_list_field.as_ref()
    }

    /// The wire key of the id field.
    pub(crate) fn id_wire_key(&self) -> &str {
        match self.inner.fields.get(&self.inner.id_field) {
            Some(def) => def.wire_key(&self.inner.id_field),
            None => &self.inner.id_field,
        }
    }

    /// Descriptor identity: two handles to the same built descriptor.
    pub fn same_type(&self, other: &ModelType) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Construct an instance with every field resolved through the default
    /// chain.
    pub fn instance(&self) -> ModelInstance {
        ModelInstance::new(self, Map::new())
    }

    /// Convert a wire-format value into an instance. Only declared wire keys
    /// are read; unknown wire keys are dropped, JSON null counts as present.
    pub fn from_wire(&self, wire: &Value) -> ModelInstance {
        let empty = Map::new();
        let obj = wire.as_object().unwrap_or(&empty);
        let mut values = BTreeMap::new();
        for (field, def) in self.fields() {
            let found = obj.get(def.wire_key(field)).cloned();
            values.insert(field.clone(), resolve_field_value(found, def));
        }
        ModelInstance {
            ty: self.clone(),
            values,
        }
    }
}

/// A dynamic record of a model type: exactly the declared fields, each
/// holding a JSON value.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    ty: ModelType,
    values: BTreeMap<String, Value>,
}

impl ModelInstance {
    /// Construct from a seed map. For each declared field the seed is probed
    /// at the wire key first, then at the internal name, then the default
    /// chain applies.
    pub fn new(ty: &ModelType, seed: Map<String, Value>) -> Self {
        let mut values = BTreeMap::new();
        for (field, def) in ty.fields() {
            let found = def
                .map
                .as_deref()
                .and_then(|wire_key| seed.get(wire_key))
                .or_else(|| seed.get(field))
                .cloned();
            values.insert(field.clone(), resolve_field_value(found, def));
        }
        Self {
            ty: ty.clone(),
            values,
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.ty
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Set a declared field. Undeclared fields are rejected.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), RestError> {
        if !self.values.contains_key(field) {
            return Err(RestError::UnknownField {
                field: field.to_string(),
                model: self.ty.name().to_string(),
            });
        }
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    pub(crate) fn set_raw(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    /// The instance id, when set. Missing, null and empty-string values all
    /// count as "no id" (the instance is new/unsaved).
    pub fn id(&self) -> Option<&Value> {
        match self.values.get(self.ty.id_field()) {
            Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
            None => None,
        }
    }

    /// Convert to the wire representation: every declared field under its
    /// wire key, nulls included. Only declared fields are emitted.
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut wire = Map::new();
        for (field, def) in self.ty.fields() {
            wire.insert(
                def.wire_key(field).to_string(),
                self.values.get(field).cloned().unwrap_or(Value::Null),
            );
        }
        wire
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.ty.same_type(&other.ty) && self.values == other.values
    }
}

/// Render an id value as a URL segment. Strings pass through unquoted,
/// everything else uses its JSON rendering.
pub(crate) fn id_segment(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
