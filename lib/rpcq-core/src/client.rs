//! HTTP transport trait.
//!
//! [`HttpClient`] is the only I/O boundary of the procedure pipeline: everything
//! before it (key decoding, input extraction, URL building) is pure, everything after
//! it (payload parsing, status mapping) is pure too.
//!
//! Implement it directly to plug in a custom transport or a test double.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations report network-level failures as [`crate::Error::Connection`],
/// [`crate::Error::Tls`] or [`crate::Error::Timeout`] and return every HTTP
/// response, whatever its status, as `Ok`.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be performed:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<T: HttpClient> HttpClient for &T {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}
