//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers and bodies.
//! Header names are matched ignoring ASCII case: setting `Accept` replaces an
//! existing `accept`.
//!
//! # Example
//!
//! ```
//! use rpcq_core::{Request, Method};
//! use bytes::Bytes;
//!
//! let request = Request::<Bytes>::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("accept", "text/plain")
//!     .header("Accept", "application/json")
//!     .build();
//! assert_eq!(request.header("ACCEPT"), Some("application/json"));
//! assert_eq!(request.headers().len(), 1);
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// Header map used by requests, responses and header providers.
pub type Headers = HashMap<String, String>;

/// Look up a header ignoring ASCII case.
#[must_use]
pub fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, Headers, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<B>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any header with the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Sets multiple headers, later names overriding earlier ones.
    #[must_use]
    pub fn headers(self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl RequestBuilder<Bytes> {
    /// Set a JSON body and the matching `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("Content-Type", crate::APPLICATION_JSON)
            .body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("https://api.example.com/items").expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/items");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn header_replaces_ignoring_case() {
        let request = Request::<Bytes>::builder(Method::Post, url())
            .header("content-type", "text/plain")
            .header("X-Trace", "1")
            .header("Content-Type", "application/json")
            .build();

        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(request.header("x-trace"), Some("1"));
    }

    #[test]
    fn headers_extend() {
        let request = Request::<Bytes>::builder(Method::Get, url())
            .headers([
                ("Authorization".to_string(), "Bearer t".to_string()),
                ("authorization".to_string(), "Bearer u".to_string()),
            ])
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Authorization"), Some("Bearer u"));
    }

    #[test]
    fn request_builder_json() {
        #[derive(serde::Serialize)]
        struct Item {
            name: String,
        }

        let request = Request::builder(Method::Post, url())
            .json(&Item {
                name: "lamp".to_string(),
            })
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body().map(|body| body.to_vec()),
            Some(br#"{"name":"lamp"}"#.to_vec())
        );
    }
}
