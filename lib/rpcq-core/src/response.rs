//! HTTP response handling.
//!
//! [`Response`] gives access to status, headers and body, and converts into a
//! [`Payload`] with [`Response::into_payload`]:
//!
//! ```ignore
//! let payload = response.into_payload()?;
//! ```

use bytes::Bytes;

use crate::request::{Headers, find_header};
use crate::{Error, Payload, Result};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: Headers,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, Headers, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

impl Response<Bytes> {
    /// Parse the body by content type, failing on a non-2xx status.
    ///
    /// The body is parsed before the status is checked, so a failed response
    /// carries its parsed body in [`Error::RequestFailed`].
    ///
    /// # Errors
    ///
    /// - [`Error::JsonDeserialization`] if a JSON content type carries invalid JSON
    /// - [`Error::RequestFailed`] if the status is not 2xx
    pub fn into_payload(self) -> Result<Payload> {
        let payload = Payload::parse(self.content_type(), &self.body)?;

        if self.is_success() {
            Ok(payload)
        } else {
            Err(Error::RequestFailed {
                status: self.status,
                payload,
            })
        }
    }

    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        crate::from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn json_headers() -> Headers {
        Headers::from([(
            "content-type".to_string(),
            "application/json; charset=utf-8".to_string(),
        )])
    }

    #[test]
    fn response_basic() {
        let response = Response::new(200, json_headers(), Bytes::from(r#"{"id":1}"#));

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        assert!(Response::new(404, Headers::new(), Bytes::new()).is_client_error());
        assert!(Response::new(500, Headers::new(), Bytes::new()).is_server_error());
        assert!(!Response::new(304, Headers::new(), Bytes::new()).is_success());
    }

    #[test]
    fn into_payload_json() {
        let response = Response::new(200, json_headers(), Bytes::from(r#"{"id":1}"#));
        assert_eq!(
            response.into_payload().expect("payload"),
            Payload::Json(json!({"id": 1}))
        );
    }

    #[test]
    fn into_payload_text_without_content_type() {
        let response = Response::new(201, Headers::new(), Bytes::from("created"));
        assert_eq!(
            response.into_payload().expect("payload"),
            Payload::Text("created".to_string())
        );
    }

    #[test]
    fn into_payload_failure_keeps_parsed_body() {
        let response = Response::new(
            404,
            json_headers(),
            Bytes::from(r#"{"message":"not found"}"#),
        );
        let err = response.into_payload().expect_err("404");

        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.payload(),
            Some(&Payload::Json(json!({"message": "not found"})))
        );
    }

    #[test]
    fn into_payload_failure_with_text_body() {
        let response = Response::new(500, Headers::new(), Bytes::from("Internal Server Error"));
        let err = response.into_payload().expect_err("500");

        assert!(err.is_server_error());
        assert_eq!(
            err.payload(),
            Some(&Payload::Text("Internal Server Error".to_string()))
        );
    }

    #[test]
    fn response_json_and_text() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Item {
            id: u64,
        }

        let response = Response::new(200, Headers::new(), Bytes::from(r#"{"id":3}"#));
        assert_eq!(response.clone().json::<Item>().expect("json"), Item { id: 3 });
        assert_eq!(response.text().expect("text"), r#"{"id":3}"#);
    }
}
