//! Request/response logging middleware.
//!
//! Logs each HTTP exchange of a procedure call with `tracing`. The exchange runs
//! inside a `rpcq_request` span named after the procedure it serves
//! (`procedure = "GET /pets/5"`), with the host and, once known, the status.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::field::Empty;
use tracing::{Instrument, Level, Span, debug, info, span, warn};

use crate::{Error, Request, Response, Result};

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```ignore
/// use rpcq::HyperClient;
/// use rpcq::middleware::LoggingLayer;
///
/// let client = HyperClient::builder()
///     .layer(LoggingLayer::new())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level, with headers and body sizes.
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Create a new logging service wrapping the given service.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

/// `"<METHOD> <path>"` of the request, the concrete form of its procedure key.
fn procedure_label(request: &Request<Bytes>) -> String {
    format!("{} {}", request.method(), request.url().path())
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let level = self.level;
        let span = span!(
            Level::INFO,
            "rpcq_request",
            procedure = %procedure_label(&request),
            host = request.url().host_str().unwrap_or_default(),
            status = Empty,
        );

        if level == LogLevel::Debug {
            span.in_scope(|| {
                debug!(
                    query = request.url().query().unwrap_or_default(),
                    headers = ?request.headers(),
                    body_len = request.body().map_or(0, Bytes::len),
                    "sending request"
                );
            });
        }

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        Span::current().record("status", response.status());
                        info!(elapsed_ms, "procedure call completed");
                    }
                    Ok(response) => {
                        Span::current().record("status", response.status());
                        warn!(
                            elapsed_ms,
                            body_len = response.body().len(),
                            "procedure call rejected"
                        );
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "procedure call failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use tower::ServiceExt;
    use tower::service_fn;

    use super::*;
    use crate::{Headers, Method};

    fn request() -> Request<Bytes> {
        let url = "http://localhost/items".parse().expect("url");
        Request::builder(Method::Get, url).build()
    }

    #[test]
    fn span_is_labelled_with_procedure() {
        let url = "https://api.test/pets/5?fields=name".parse().expect("url");
        let request = Request::builder(Method::Delete, url).build();
        assert_eq!(procedure_label(&request), "DELETE /pets/5");
        assert_eq!(procedure_label(&self::request()), "GET /items");
    }

    #[test]
    fn logging_layer_default() {
        let layer = LoggingLayer::new();
        assert_eq!(layer.level, LogLevel::Info);
    }

    #[test]
    fn logging_layer_debug() {
        let layer = LoggingLayer::debug();
        assert_eq!(layer.level, LogLevel::Debug);
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let inner = service_fn(|_request: Request<Bytes>| async {
            Ok::<_, Error>(Response::new(404, Headers::new(), Bytes::from("missing")))
        });
        let service = LoggingLayer::debug().layer(inner);

        let response = service.oneshot(request()).await.expect("response");
        assert_eq!(response.status(), 404);
        assert_eq!(response.body(), &Bytes::from("missing"));
    }

    #[tokio::test]
    async fn passes_errors_through() {
        let inner = service_fn(|_request: Request<Bytes>| async {
            Err::<Response<Bytes>, _>(Error::Timeout)
        });
        let service = LoggingLayer::new().layer(inner);

        let err = service.oneshot(request()).await.expect_err("timeout");
        assert!(err.is_timeout());
    }
}
