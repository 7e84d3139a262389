//! Prelude module for convenient imports.
//!
//! ```ignore
//! use rpcq::prelude::*;
//! ```

pub use crate::{
    CacheKey, ClientOptions, Error, HttpClient, HyperClient, MemoryCache, Method,
    MutationProcedure, OpenApiClient, Payload, Procedure, ProcedureKey, QueryCache, QueryInput,
    QueryProcedure, Result, RouteCatalog, StatusCode,
};
pub use serde::{Deserialize, Serialize};
