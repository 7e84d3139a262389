//! Client configuration types.
//!
//! - [`ClientOptions`]: what every procedure call needs (base URL, per-request headers,
//!   query array format)
//! - [`TransportConfig`]: how the [`crate::HyperClient`] talks to the network

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rpcq_core::{CollectionFormat, Headers, UrlBuilder};

/// Per-request header provider.
pub type HeadersFn = Arc<dyn Fn() -> Option<Headers> + Send + Sync>;

/// Options shared by every procedure of a client.
///
/// # Example
///
/// ```
/// use rpcq::{ClientOptions, Headers};
///
/// let options = ClientOptions::builder("https://api.example.com")
///     .headers(|| Some(Headers::from([("X-Api-Key".to_string(), "secret".to_string())])))
///     .build();
///
/// assert_eq!(options.base_url(), "https://api.example.com");
/// ```
#[derive(Clone)]
pub struct ClientOptions {
    base_url: String,
    headers: Option<HeadersFn>,
    collection_format: CollectionFormat,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.is_some())
            .field("collection_format", &self.collection_format)
            .finish()
    }
}

impl ClientOptions {
    /// Options with a base URL and nothing else.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder(base_url).build()
    }

    /// Create a new options builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientOptionsBuilder {
        ClientOptionsBuilder {
            base_url: base_url.into(),
            headers: None,
            collection_format: None,
        }
    }

    /// Prefix of every request URL, concatenated as-is with the path template.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query array serialization.
    #[must_use]
    pub const fn collection_format(&self) -> CollectionFormat {
        self.collection_format
    }

    /// Invoke the header provider; `None` when there is no provider or it has nothing.
    #[must_use]
    pub fn headers(&self) -> Option<Headers> {
        self.headers.as_ref().and_then(|provider| provider())
    }

    /// The header provider itself.
    #[must_use]
    pub fn header_provider(&self) -> Option<&HeadersFn> {
        self.headers.as_ref()
    }

    /// URL builder for these options.
    #[must_use]
    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(self.base_url.clone()).collection_format(self.collection_format)
    }
}

/// Builder for [`ClientOptions`].
pub struct ClientOptionsBuilder {
    base_url: String,
    headers: Option<HeadersFn>,
    collection_format: Option<CollectionFormat>,
}

impl fmt::Debug for ClientOptionsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptionsBuilder")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.is_some())
            .field("collection_format", &self.collection_format)
            .finish()
    }
}

impl ClientOptionsBuilder {
    /// Set the header provider, invoked once per request.
    #[must_use]
    pub fn headers<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Option<Headers> + Send + Sync + 'static,
    {
        self.headers = Some(Arc::new(provider));
        self
    }

    /// Use fixed headers for every request.
    #[must_use]
    pub fn static_headers(self, headers: Headers) -> Self {
        self.headers(move || Some(headers.clone()))
    }

    /// Set the query array serialization.
    #[must_use]
    pub const fn collection_format(mut self, format: CollectionFormat) -> Self {
        self.collection_format = Some(format);
        self
    }

    /// Build the options.
    #[must_use]
    pub fn build(self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url,
            headers: self.headers,
            collection_format: self.collection_format.unwrap_or_default(),
        }
    }
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout, none by default.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for [`TransportConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl TransportConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}
