//! CRUD operations over model instances and model types.
//!
//! # Design
//! Each operation is split into a pure `*_request` builder that produces a
//! [`RestRequest`] without I/O — useful to preview the constructed URL — and
//! an executing form that drives a caller-supplied [`Transport`] and
//! interprets the response. Configuration problems (unknown names, missing
//! ids) surface before any request is issued; a non-2xx response surfaces as
//! [`RestError::Http`] carrying the raw response and the originating request.

use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{ConsumerOptions, RestClient};
use crate::error::RestError;
use crate::http::{RestRequest, Transport};
use crate::model::{id_segment, ModelInstance, ModelType, ResultListField};
use crate::options::{
    AllOptions, DeleteOptions, GetOptions, SaveModelOptions, SaveOptions, UpdateMethod,
};
use crate::settings::Settings;
use crate::url::{append_query_params, path_join, replace_url_params};

/// Result of a save or delete: the parsed response body and the request that
/// produced it.
#[derive(Debug, Clone)]
pub struct Completed {
    pub response: Value,
    pub request: RestRequest,
}

/// Result of a get: the converted model (when the response carried an
/// object), the parsed response body and the request.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub model: Option<ModelInstance>,
    pub response: Value,
    pub request: RestRequest,
}

/// Result of a list: the converted models, the parsed response body and the
/// request.
#[derive(Debug, Clone)]
pub struct Listed {
    pub result_list: Vec<ModelInstance>,
    pub response: Value,
    pub request: RestRequest,
}

/// Merge per-call consumer overrides with the model type's declaration.
fn consumer_options(
    endpoint_name: &Option<String>,
    api_path_name: &Option<String>,
    ty: &ModelType,
) -> ConsumerOptions {
    ConsumerOptions {
        endpoint_name: endpoint_name
            .clone()
            .or_else(|| ty.endpoint_name().map(str::to_string)),
        api_path_name: api_path_name
            .clone()
            .or_else(|| ty.api_path_name().map(str::to_string)),
    }
}

/// Execute a request and parse the body, mapping non-2xx statuses to
/// [`RestError::Http`].
fn dispatch(
    transport: &dyn Transport,
    request: RestRequest,
) -> Result<(Value, RestRequest), RestError> {
    debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
    let response = transport.execute(&request)?;
    if !response.is_success() {
        return Err(RestError::Http { response, request });
    }
    let body = response.json()?;
    Ok((body, request))
}

/// Restrict a wire payload to the wire-mapped keys of `keys`.
fn subset_payload(
    ty: &ModelType,
    wire: &Map<String, Value>,
    keys: &[String],
) -> Result<Map<String, Value>, RestError> {
    let mut data = Map::new();
    for key in keys {
        let def = ty.field(key).ok_or_else(|| RestError::UnknownField {
            field: key.clone(),
            model: ty.name().to_string(),
        })?;
        let wire_key = def.wire_key(key);
        data.insert(
            wire_key.to_string(),
            wire.get(wire_key).cloned().unwrap_or(Value::Null),
        );
    }
    Ok(data)
}

impl ModelInstance {
    /// Build the save request without dispatching it.
    pub fn save_request(
        &self,
        settings: &Settings,
        options: &SaveOptions,
    ) -> Result<RestRequest, RestError> {
        Ok(self.save_plan(settings, options)?.0)
    }

    /// Save the instance: `POST` when it has no id (the server-assigned id is
    /// written back into the instance on success), `PATCH` when
    /// `update_method` asks for it, `PUT` otherwise.
    pub fn save(
        &mut self,
        settings: &Settings,
        transport: &dyn Transport,
        options: &SaveOptions,
    ) -> Result<Completed, RestError> {
        let (request, is_create) = self.save_plan(settings, options)?;
        let (response, request) = dispatch(transport, request)?;
        if is_create {
            if let Some(id) = response.get(self.model_type().id_wire_key()) {
                let id = id.clone();
                let id_field = self.model_type().id_field().to_string();
                self.set_raw(&id_field, id);
            }
        }
        Ok(Completed { response, request })
    }

    fn save_plan(
        &self,
        settings: &Settings,
        options: &SaveOptions,
    ) -> Result<(RestRequest, bool), RestError> {
        let ty = self.model_type();
        let client = RestClient::new(
            settings,
            &consumer_options(&options.endpoint_name, &options.api_path_name, ty),
        )?;
        let template = ty.path(options.path.as_deref().unwrap_or("default"))?;
        let headers = settings.headers_for(ty.name());
        let wire = self.to_wire();

        let payload = |strip_id: bool| -> Result<Value, RestError> {
            let mut data = match &options.data_keys {
                Some(keys) => subset_payload(ty, &wire, keys)?,
                None => wire.clone(),
            };
            if strip_id {
                data.remove(ty.id_wire_key());
            }
            Ok(Value::Object(data))
        };

        match self.id().cloned() {
            None => {
                let request = client.post(template, &payload(true)?, &headers)?;
                Ok((request, true))
            }
            Some(id) if options.update_method == UpdateMethod::Patch => {
                let url = path_join(template, &id_segment(&id));
                let request = client.patch(&url, &payload(false)?, &headers)?;
                Ok((request, false))
            }
            Some(id) => {
                let url = path_join(template, &id_segment(&id));
                let request = client.put(&url, &payload(true)?, &headers)?;
                Ok((request, false))
            }
        }
    }

    /// Build the delete request without dispatching it.
    pub fn delete_request(
        &self,
        settings: &Settings,
        options: &DeleteOptions,
    ) -> Result<RestRequest, RestError> {
        let ty = self.model_type();
        let client = RestClient::new(
            settings,
            &consumer_options(&options.endpoint_name, &options.api_path_name, ty),
        )?;
        let id = options
            .id
            .as_ref()
            .or_else(|| self.id())
            .ok_or(RestError::MissingId)?;
        let template = ty.path(options.path.as_deref().unwrap_or("default"))?;
        let url = path_join(template, &id_segment(id));
        Ok(client.delete(&url, &settings.headers_for(ty.name())))
    }

    /// Delete the resource identified by `options.id` or the instance's own
    /// id. With neither present, fails before any request is issued.
    pub fn delete(
        &self,
        settings: &Settings,
        transport: &dyn Transport,
        options: &DeleteOptions,
    ) -> Result<Completed, RestError> {
        let request = self.delete_request(settings, options)?;
        let (response, request) = dispatch(transport, request)?;
        Ok(Completed { response, request })
    }
}

impl ModelType {
    fn check_model(&self, model: &ModelInstance) -> Result<(), RestError> {
        if !self.same_type(model.model_type()) {
            return Err(RestError::ModelMismatch {
                expected: self.name().to_string(),
                actual: model.model_type().name().to_string(),
            });
        }
        Ok(())
    }

    /// Build the type-level save request without dispatching it.
    pub fn save_request(
        &self,
        settings: &Settings,
        model: &ModelInstance,
        options: &SaveModelOptions,
    ) -> Result<RestRequest, RestError> {
        self.check_model(model)?;
        model.save_request(settings, &map_save_options(model, options))
    }

    /// Save an explicitly supplied model of this type. With an id and a
    /// `patch` field list, sends a PATCH restricted to those fields; with an
    /// id and no list, a full PUT; without an id, a POST that back-fills the
    /// server-assigned id into `model`.
    pub fn save(
        &self,
        settings: &Settings,
        transport: &dyn Transport,
        model: &mut ModelInstance,
        options: &SaveModelOptions,
    ) -> Result<Completed, RestError> {
        self.check_model(model)?;
        let mapped = map_save_options(model, options);
        model.save(settings, transport, &mapped)
    }

    /// Build the get request without dispatching it.
    pub fn get_request(
        &self,
        settings: &Settings,
        options: &GetOptions,
    ) -> Result<RestRequest, RestError> {
        let client = RestClient::new(
            settings,
            &consumer_options(&options.endpoint_name, &options.api_path_name, self),
        )?;
        let id = options.id.as_ref().ok_or(RestError::MissingId)?;
        let path_name = options.path.as_deref().unwrap_or("default");
        let mut result_path = self.path(path_name)?.to_string();
        // the default template gets its id placeholder appended; named
        // templates carry their own placeholders
        if path_name == "default" {
            result_path = path_join(&result_path, "{id}");
        }
        let mut path_data = options.path_data.clone();
        path_data
            .entry("id".to_string())
            .or_insert_with(|| id_segment(id));
        let result_path = append_query_params(
            &replace_url_params(&result_path, &path_data),
            &options.query_params,
        );
        Ok(client.get(&result_path, &settings.headers_for(self.name())))
    }

    /// Fetch one resource by id and convert it through the wire mapping.
    /// `options.result_field` reads the model from a response envelope field
    /// instead of the root.
    pub fn get(
        &self,
        settings: &Settings,
        transport: &dyn Transport,
        options: &GetOptions,
    ) -> Result<Fetched, RestError> {
        let request = self.get_request(settings, options)?;
        let (response, request) = dispatch(transport, request)?;
        let model = if response.is_object() {
            let source = match options.result_field.as_deref().and_then(|f| response.get(f)) {
                Some(value) if !value.is_null() => value,
                _ => &response,
            };
            Some(self.from_wire(source))
        } else {
            None
        };
        Ok(Fetched {
            model,
            response,
            request,
        })
    }

    /// Build the list request without dispatching it.
    pub fn all_request(
        &self,
        settings: &Settings,
        options: &AllOptions,
    ) -> Result<RestRequest, RestError> {
        let client = RestClient::new(
            settings,
            &consumer_options(&options.endpoint_name, &options.api_path_name, self),
        )?;
        let template = self.path(options.path.as_deref().unwrap_or("default"))?;
        let result_path = append_query_params(
            &replace_url_params(template, &options.path_data),
            &options.query_params,
        );
        Ok(client.get(&result_path, &settings.headers_for(self.name())))
    }

    /// List resources into a fresh vector.
    pub fn all(
        &self,
        settings: &Settings,
        transport: &dyn Transport,
        options: &AllOptions,
    ) -> Result<Listed, RestError> {
        let mut result_list = Vec::new();
        let Completed { response, request } =
            self.all_into(settings, transport, &mut result_list, options)?;
        Ok(Listed {
            result_list,
            response,
            request,
        })
    }

    /// List resources into a caller-supplied buffer, clearing it first. The
    /// same buffer can be reused across pages.
    ///
    /// The result list is located by `options.result_list_field` (falling
    /// back to the type's declaration): a named field is read when it holds
    /// an array, otherwise the whole response is treated as the list; an
    /// extractor function is applied as-is. Elements that are not objects are
    /// skipped. Each object element converts through the wire mapping of
    /// `options.result_list_item_type`, else this type.
    pub fn all_into(
        &self,
        settings: &Settings,
        transport: &dyn Transport,
        buffer: &mut Vec<ModelInstance>,
        options: &AllOptions,
    ) -> Result<Completed, RestError> {
        let request = self.all_request(settings, options)?;
        let (response, request) = dispatch(transport, request)?;
        buffer.clear();

        let field = options
            .result_list_field
            .as_ref()
            .or_else(|| self.result_list_field());
        let extracted;
        let list = match field {
            Some(ResultListField::Extract(f)) => {
                extracted = f(&response);
                &extracted
            }
            Some(ResultListField::Name(name)) => match response.get(name) {
                Some(value) if value.is_array() => value,
                _ => &response,
            },
            None => &response,
        };

        if let Value::Array(items) = list {
            let item_type = options.result_list_item_type.as_ref().unwrap_or(self);
            for item in items {
                if item.is_object() {
                    buffer.push(item_type.from_wire(item));
                }
            }
        }
        Ok(Completed { response, request })
    }

    /// Build the type-level delete request without dispatching it.
    pub fn delete_request(
        &self,
        settings: &Settings,
        options: &DeleteOptions,
    ) -> Result<RestRequest, RestError> {
        let client = RestClient::new(
            settings,
            &consumer_options(&options.endpoint_name, &options.api_path_name, self),
        )?;
        let id = options.id.as_ref().ok_or(RestError::MissingId)?;
        let template = self.path(options.path.as_deref().unwrap_or("default"))?;
        let url = path_join(template, &id_segment(id));
        Ok(client.delete(&url, &settings.headers_for(self.name())))
    }

    /// Delete by explicit id. Unlike the instance method there is no
    /// instance to fall back to, so `options.id` is required.
    pub fn delete(
        &self,
        settings: &Settings,
        transport: &dyn Transport,
        options: &DeleteOptions,
    ) -> Result<Completed, RestError> {
        let request = self.delete_request(settings, options)?;
        let (response, request) = dispatch(transport, request)?;
        Ok(Completed { response, request })
    }
}

/// Translate the type-level option shape into the instance shape: a `patch`
/// field list on a saved (id-bearing) model becomes a PATCH with those keys.
fn map_save_options(model: &ModelInstance, options: &SaveModelOptions) -> SaveOptions {
    let patching = model.id().is_some() && options.patch.is_some();
    SaveOptions {
        endpoint_name: options.endpoint_name.clone(),
        api_path_name: options.api_path_name.clone(),
        path: options.path.clone(),
        data_keys: if patching { options.patch.clone() } else { None },
        update_method: if patching {
            UpdateMethod::Patch
        } else {
            UpdateMethod::Put
        },
    }
}
