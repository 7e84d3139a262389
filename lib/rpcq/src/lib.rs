//! Typed remote-procedure client for `OpenAPI`-described HTTP routes.
//!
//! Every route of a schema is a procedure addressed by its key, `"METHOD /path"`.
//! `GET` routes are queries, cached by key and input; every other method is a
//! mutation. A procedure input is an object with optional `path`, `query` and `body`
//! fields.
//!
//! # Example
//!
//! ```ignore
//! use rpcq::prelude::*;
//!
//! #[derive(Debug, Serialize)]
//! pub struct ItemPath {
//!     id: u64,
//! }
//!
//! #[derive(Debug, Serialize)]
//! pub struct GetItemInput {
//!     path: ItemPath,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Item {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[derive(Procedure)]
//! #[procedure(key = "GET /items/{id}", input = GetItemInput, output = Item)]
//! pub struct GetItem;
//!
//! let client = OpenApiClient::new(HyperClient::new(), ClientOptions::new("https://api.example.com"));
//! let item = client
//!     .query::<GetItem>(GetItemInput { path: ItemPath { id: 42 } }.into())
//!     .await?;
//! ```

// Generated code refers to `::rpcq`, including inside this crate
extern crate self as rpcq;

mod api_client;
mod client;
mod config;
mod connector;
mod executor;
mod memory_cache;
pub mod middleware;
pub mod prelude;
mod producer;

pub use api_client::OpenApiClient;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{
    ClientOptions, ClientOptionsBuilder, HeadersFn, TransportConfig, TransportConfigBuilder,
};
pub use executor::execute;
pub use memory_cache::{MemoryCache, QueryState};
pub use producer::{MutationProducer, QueryProducer};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use rpcq_core::{
    APPLICATION_JSON, BODY_FIELD, CacheKey, CollectionFormat, Error, Headers, HttpClient,
    InputParts, Method, MutationProcedure, PATH_FIELD, ParamLocation, ParamMeta, Payload,
    Procedure, ProcedureKey, ProcedureKind, Producer, QUERY_FIELD, QueryCache, QueryInput,
    QueryProcedure, Request, RequestBuilder, Response, Result, Route, RouteCatalog, UrlBuilder,
    build_url, classify, decode, encode, extract, find_header, from_json, from_value,
    is_json_content_type, path_placeholders, query_string, to_json,
};

// Re-export http types for status codes and headers
pub use rpcq_core::{StatusCode, header};

// Re-export serde_json for macro-generated code
pub use serde_json;

// Re-export url, taken by `Request::builder`
pub use url;

// Re-export macros
pub use rpcq_macro::Procedure;
