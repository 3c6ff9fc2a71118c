//! Client-side REST model layer: a configurable consumer plus a dynamic
//! model type that maps JSON records to REST resources.
//!
//! # Overview
//! A [`ModelType`] declares a model once — fields with optional wire-name
//! mapping and defaults, the id field, named path templates and consumer
//! selection. [`ModelInstance`] records of that type then save, fetch, list
//! and delete themselves over HTTP, converting between the internal field
//! names and the server's wire names on every call.
//!
//! # Design
//! - All configuration lives in explicit values ([`Settings`], [`ModelType`])
//!   passed by reference into every call; there is no process-wide state.
//! - The core is sans-IO: each CRUD operation has a pure `*_request` builder
//!   producing a [`RestRequest`], and an executing form that drives a
//!   caller-supplied [`Transport`] (host-does-IO pattern). Integration tests
//!   plug in a ureq-backed transport against the mock server.
//! - One [`RestError`] enum covers configuration mistakes and runtime
//!   failures; non-2xx responses carry the raw response and request verbatim.

pub mod client;
pub mod error;
pub mod http;
pub mod model;
pub mod options;
pub mod ops;
pub mod settings;
pub mod url;

pub use client::{ConsumerOptions, RestClient};
pub use error::RestError;
pub use http::{HttpMethod, RestRequest, Transport, WireResponse};
pub use model::{FieldDef, ModelInstance, ModelType, ModelTypeBuilder, ResultListField};
pub use options::{
    AllOptions, DeleteOptions, GetOptions, SaveModelOptions, SaveOptions, UpdateMethod,
};
pub use ops::{Completed, Fetched, Listed};
pub use settings::{RegistryEntry, Settings};
