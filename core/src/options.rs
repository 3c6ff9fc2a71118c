//! Per-operation option structs.
//!
//! Every CRUD call takes one of these by reference. `endpoint_name` and
//! `api_path_name` override the model type's consumer selection (which in
//! turn falls back to the registry defaults), and `path` selects a named path
//! template, defaulting to `"default"`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{ModelType, ResultListField};

/// How an instance save with an id updates the resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMethod {
    /// Replace with the full wire payload (id stripped).
    #[default]
    Put,
    /// Send a partial update; combine with `data_keys` to restrict the
    /// payload.
    Patch,
}

/// Options for [`ModelInstance::save`](crate::model::ModelInstance).
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    pub endpoint_name: Option<String>,
    pub api_path_name: Option<String>,
    pub path: Option<String>,
    /// Restrict the outgoing payload to these declared fields (wire-mapped).
    pub data_keys: Option<Vec<String>>,
    pub update_method: UpdateMethod,
}

/// Options for the type-level [`ModelType::save`](crate::model::ModelType)
/// operating on an explicitly supplied model.
#[derive(Debug, Clone, Default)]
pub struct SaveModelOptions {
    pub endpoint_name: Option<String>,
    pub api_path_name: Option<String>,
    pub path: Option<String>,
    /// When the model has an id, send a PATCH restricted to exactly these
    /// declared fields instead of a full PUT.
    pub patch: Option<Vec<String>>,
}

/// Options for [`ModelType::get`](crate::model::ModelType).
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub endpoint_name: Option<String>,
    pub api_path_name: Option<String>,
    pub path: Option<String>,
    pub id: Option<Value>,
    /// Values for `{key}` placeholders in the path template. `id` is filled
    /// in from the `id` option when not given.
    pub path_data: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    /// Read the model from this response field instead of the response root.
    pub result_field: Option<String>,
}

/// Options for [`ModelType::all`](crate::model::ModelType).
#[derive(Debug, Clone, Default)]
pub struct AllOptions {
    pub endpoint_name: Option<String>,
    pub api_path_name: Option<String>,
    pub path: Option<String>,
    pub path_data: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    /// Where the result list lives in the response; falls back to the model
    /// type's declaration.
    pub result_list_field: Option<ResultListField>,
    /// Convert list elements with this type instead of the calling type.
    pub result_list_item_type: Option<ModelType>,
}

/// Options for instance and type-level delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub endpoint_name: Option<String>,
    pub api_path_name: Option<String>,
    pub path: Option<String>,
    /// Instance delete falls back to the instance's own id; type-level
    /// delete requires this option.
    pub id: Option<Value>,
}
