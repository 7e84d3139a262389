//! Typed procedure client.
//!
//! [`OpenApiClient`] combines a transport, the [`ClientOptions`] and a
//! [`QueryCache`]. Queries go through the cache under `[key]` or `[key, input]`;
//! mutations always hit the transport.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    CacheKey, ClientOptions, HttpClient, MemoryCache, MutationProcedure, MutationProducer,
    Payload, Procedure, ProcedureKey, QueryCache, QueryInput, QueryProcedure, QueryProducer,
    Result,
};

/// Procedure client over an HTTP transport and a query cache.
///
/// # Example
///
/// ```ignore
/// use rpcq::prelude::*;
///
/// #[derive(Procedure)]
/// #[procedure(key = "GET /items/{id}", input = ItemPath, output = Item)]
/// struct GetItem;
///
/// let client = OpenApiClient::new(HyperClient::new(), ClientOptions::new("https://api.example.com"));
///
/// let item = client.query::<GetItem>(input.into()).await?;
/// let nothing = client.query::<GetItem>(QueryInput::Disabled).await?;
/// assert!(nothing.is_none());
/// ```
#[derive(Debug)]
pub struct OpenApiClient<C, Q = MemoryCache> {
    client: C,
    options: Arc<ClientOptions>,
    cache: Q,
}

impl<C> OpenApiClient<C, MemoryCache> {
    /// Create a client with an empty [`MemoryCache`].
    #[must_use]
    pub fn new(client: C, options: ClientOptions) -> Self {
        Self::with_cache(client, options, MemoryCache::new())
    }
}

impl<C, Q> OpenApiClient<C, Q> {
    /// Create a client with a custom cache.
    #[must_use]
    pub fn with_cache(client: C, options: ClientOptions, cache: Q) -> Self {
        Self {
            client,
            options: Arc::new(options),
            cache,
        }
    }

    /// The transport.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The shared options.
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The query cache.
    #[must_use]
    pub const fn cache(&self) -> &Q {
        &self.cache
    }

    /// A producer bound to `key` and `input`, for use with any cache.
    #[must_use]
    pub fn query_producer(&self, key: impl Into<String>, input: Option<Value>) -> QueryProducer<&C> {
        QueryProducer::new(&self.client, Arc::clone(&self.options), key, input)
    }

    /// A producer bound to `key`, invoked with an input per call.
    #[must_use]
    pub fn mutation_producer(&self, key: impl Into<String>) -> MutationProducer<&C> {
        MutationProducer::new(&self.client, Arc::clone(&self.options), key)
    }
}

impl<C, Q> OpenApiClient<C, Q>
where
    C: HttpClient,
    Q: QueryCache,
{
    /// Run a query through the cache.
    ///
    /// Returns `Ok(None)` for [`QueryInput::Disabled`], without touching the
    /// transport or the cache.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decoding error if the payload does not match
    /// `P::Output`.
    pub async fn query<P: QueryProcedure>(
        &self,
        input: QueryInput<P::Input>,
    ) -> Result<Option<P::Output>> {
        let QueryInput::Enabled(input) = input else {
            return Ok(None);
        };
        let input = P::input_value(&input)?;
        let payload = self.fetch(&P::key(), input).await?;
        payload.decode().map(Some)
    }

    /// Run a query by raw key and JSON input.
    ///
    /// # Errors
    ///
    /// [`crate::Error::MalformedKey`] or [`crate::Error::UnsupportedMethod`] for an
    /// invalid key, then any pipeline error.
    pub async fn query_raw(
        &self,
        key: &str,
        input: QueryInput<Option<Value>>,
    ) -> Result<Option<Payload>> {
        let QueryInput::Enabled(input) = input else {
            return Ok(None);
        };
        let key = ProcedureKey::parse(key)?;
        self.fetch(&key, input).await.map(Some)
    }

    async fn fetch(&self, key: &ProcedureKey, input: Option<Value>) -> Result<Payload> {
        let cache_key = CacheKey::with_input(key, input.clone());
        let producer = self.query_producer(key.to_string(), input);
        self.cache.fetch(cache_key, &producer).await
    }

    /// Run a mutation.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decoding error if the payload does not match
    /// `P::Output`.
    pub async fn mutate<P: MutationProcedure>(&self, input: &P::Input) -> Result<P::Output> {
        let input = P::input_value(input)?;
        let payload = self.mutate_raw(P::KEY, input.as_ref()).await?;
        payload.decode()
    }

    /// Run a mutation by raw key and JSON input.
    ///
    /// # Errors
    ///
    /// Any pipeline error.
    pub async fn mutate_raw(&self, key: &str, input: Option<&Value>) -> Result<Payload> {
        self.mutation_producer(key).mutate(input).await
    }

    /// Invalidate every cached query matching `filter`.
    pub fn invalidate(&self, filter: &CacheKey) {
        self.cache.invalidate(filter);
    }

    /// Invalidate the queries of one procedure, optionally narrowed by a partial input.
    pub fn invalidate_procedure<P: QueryProcedure>(&self, partial_input: Option<Value>) {
        self.cache
            .invalidate(&CacheKey::with_input(&P::key(), partial_input));
    }

    /// Read the cached output of a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be serialized or the cached payload does
    /// not match `P::Output`.
    pub fn get_data<P: QueryProcedure>(&self, input: &P::Input) -> Result<Option<P::Output>> {
        let key = CacheKey::with_input(&P::key(), P::input_value(input)?);
        self.cache
            .get_data(&key)
            .map(|payload| payload.decode())
            .transpose()
    }

    /// Replace the cached output of a query with `updater(previous)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or the new output cannot be serialized, or the
    /// previous payload does not match `P::Output`.
    pub fn set_data<P, F>(&self, input: &P::Input, updater: F) -> Result<()>
    where
        P: QueryProcedure,
        P::Output: Serialize,
        F: FnOnce(Option<P::Output>) -> P::Output,
    {
        let key = CacheKey::with_input(&P::key(), P::input_value(input)?);
        let previous = self
            .cache
            .get_data(&key)
            .map(|payload| payload.decode::<P::Output>())
            .transpose()?;
        let data = serde_json::to_value(updater(previous))?;
        self.cache.set_data(key, Payload::Json(data));
        Ok(())
    }
}
