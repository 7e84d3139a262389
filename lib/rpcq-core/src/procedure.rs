//! Typed procedures.
//!
//! A [`Procedure`] binds a procedure key to the input and output types of its route.
//! Implementations are usually generated with `#[derive(Procedure)]`:
//!
//! ```ignore
//! use rpcq::prelude::*;
//!
//! #[derive(Procedure)]
//! #[procedure(key = "GET /items/{id}", input = GetItemInput, output = Item)]
//! pub struct GetItem;
//! ```
//!
//! Routes without parameters nor body use `()` as input, which serializes to `null`
//! and is sent as "no input".

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Method, ProcedureKey, ProcedureKind, Result};

/// A route with statically known key, input and output.
pub trait Procedure: Send + Sync + 'static {
    /// Canonical procedure key, e.g. `"GET /items/{id}"`.
    const KEY: &'static str;

    /// HTTP method of [`Self::KEY`].
    const METHOD: Method;

    /// Path template of [`Self::KEY`].
    const PATH: &'static str;

    /// Placeholders of [`Self::PATH`], in template order.
    const PATH_PARAMS: &'static [&'static str];

    /// Input shape: an object with optional `path`, `query` and `body` fields, or
    /// `()` for routes that take no input.
    type Input: Serialize + Send + Sync;

    /// Decoded success payload.
    type Output: DeserializeOwned + Send;

    /// Query or mutation, from [`Self::METHOD`].
    #[must_use]
    fn kind() -> ProcedureKind {
        crate::classify(Self::METHOD)
    }

    /// The parsed procedure key.
    #[must_use]
    fn key() -> ProcedureKey {
        ProcedureKey::new(Self::METHOD, Self::PATH)
    }

    /// Serialize an input; `null` means "no input".
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be serialized to JSON.
    fn input_value(input: &Self::Input) -> Result<Option<Value>> {
        let value = serde_json::to_value(input)?;
        Ok((!value.is_null()).then_some(value))
    }
}

/// A `GET` procedure: cached by key and input.
pub trait QueryProcedure: Procedure {}

/// A non-`GET` procedure: invoked per call with its input.
pub trait MutationProcedure: Procedure {}
