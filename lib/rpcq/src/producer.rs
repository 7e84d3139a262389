//! Procedure function factory.
//!
//! A [`QueryProducer`] captures a procedure key *and* its input when it is created,
//! as the caching layer addresses queries by both. A [`MutationProducer`] only captures
//! the key: the input is supplied on each call.
//!
//! The key is decoded on every invocation, so a malformed key surfaces as
//! [`crate::Error::MalformedKey`] when the producer runs, not when it is built.

use std::sync::Arc;

use serde_json::Value;

use crate::{ClientOptions, HttpClient, Payload, Producer, Result, decode, executor, extract};

/// Decode, extract, build the URL, execute.
async fn run<C: HttpClient>(
    client: &C,
    options: &ClientOptions,
    key: &str,
    input: Option<&Value>,
) -> Result<Payload> {
    let (method, path) = decode(key)?;
    let parts = extract(input);
    let url = options
        .url_builder()
        .build(path, parts.params.as_ref(), parts.query.as_ref());

    executor::execute(
        client,
        method,
        &url,
        parts.body.as_ref(),
        options.header_provider(),
    )
    .await
}

/// Zero-argument producer of a query, bound to one key and one input.
#[derive(Debug, Clone)]
pub struct QueryProducer<C> {
    client: C,
    options: Arc<ClientOptions>,
    key: String,
    input: Option<Value>,
}

impl<C> QueryProducer<C> {
    /// Capture a client, options, a key and an input.
    #[must_use]
    pub fn new(
        client: C,
        options: Arc<ClientOptions>,
        key: impl Into<String>,
        input: Option<Value>,
    ) -> Self {
        Self {
            client,
            options,
            key: key.into(),
            input,
        }
    }

    /// The captured procedure key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The captured input.
    #[must_use]
    pub const fn input(&self) -> Option<&Value> {
        self.input.as_ref()
    }
}

impl<C: HttpClient> QueryProducer<C> {
    /// Run the query against the captured input.
    ///
    /// # Errors
    ///
    /// Any pipeline error, unchanged.
    pub async fn call(&self) -> Result<Payload> {
        run(&self.client, &self.options, &self.key, self.input.as_ref()).await
    }
}

impl<C: HttpClient> Producer for QueryProducer<C> {
    async fn produce(&self) -> Result<Payload> {
        self.call().await
    }
}

/// Producer of a mutation, bound to one key.
#[derive(Debug, Clone)]
pub struct MutationProducer<C> {
    client: C,
    options: Arc<ClientOptions>,
    key: String,
}

impl<C> MutationProducer<C> {
    /// Capture a client, options and a key.
    #[must_use]
    pub fn new(client: C, options: Arc<ClientOptions>, key: impl Into<String>) -> Self {
        Self {
            client,
            options,
            key: key.into(),
        }
    }

    /// The captured procedure key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<C: HttpClient> MutationProducer<C> {
    /// Run the mutation with this call's input.
    ///
    /// # Errors
    ///
    /// Any pipeline error, unchanged.
    pub async fn mutate(&self, input: Option<&Value>) -> Result<Payload> {
        run(&self.client, &self.options, &self.key, input).await
    }
}
