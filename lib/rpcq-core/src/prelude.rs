//! Prelude module for convenient imports.
//!
//! ```ignore
//! use rpcq_core::prelude::*;
//! ```

pub use crate::{
    CacheKey, Error, HttpClient, Method, MutationProcedure, Payload, Procedure, ProcedureKey,
    ProcedureKind, QueryCache, QueryInput, QueryProcedure, Request, RequestBuilder, Response,
    Result,
};
