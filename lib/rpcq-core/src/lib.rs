//! Core types and traits for the rpcq typed procedure client.
//!
//! This crate holds the transport-agnostic half of rpcq:
//! - [`ProcedureKey`], [`encode`], [`decode`] and [`classify`] - the procedure key codec
//! - [`extract`] - splitting a procedure input into path, query and body parts
//! - [`build_url`] and [`UrlBuilder`] - URL construction from a path template
//! - [`Request`], [`Response`] and [`Payload`] - HTTP exchange types
//! - [`HttpClient`] - the transport trait
//! - [`Procedure`] - typed binding of a key to its input and output
//! - [`CacheKey`], [`Producer`] and [`QueryCache`] - the caching-layer boundary
//! - [`RouteCatalog`] - the schema-derived table of routes
//! - [`Error`] and [`Result`] - error handling
//! - [`StatusCode`] and [`header`] - re-exported from the `http` crate

mod cache;
mod catalog;
mod client;
mod error;
mod input;
mod key;
mod method;
mod payload;
pub mod prelude;
mod procedure;
mod request;
mod response;
mod url_builder;

pub use cache::{CacheKey, Producer, QueryCache, QueryInput};
pub use catalog::{ParamLocation, ParamMeta, Route, RouteCatalog};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use input::{BODY_FIELD, InputParts, PATH_FIELD, QUERY_FIELD, extract};
pub use key::{ProcedureKey, ProcedureKind, classify, decode, encode, path_placeholders};
pub use method::Method;
pub use payload::{APPLICATION_JSON, Payload, from_json, from_value, is_json_content_type, to_json};
pub use procedure::{MutationProcedure, Procedure, QueryProcedure};
pub use request::{Headers, Request, RequestBuilder, find_header};
pub use response::Response;
pub use url_builder::{CollectionFormat, UrlBuilder, build_url, query_string};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
