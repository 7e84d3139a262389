//! Error types for rpcq.

use derive_more::{Display, Error, From};

use crate::Payload;

/// Main error type for rpcq operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A procedure key without the `"METHOD /path"` separator.
    #[display("malformed procedure key: {_0:?}")]
    #[from(skip)]
    MalformedKey(#[error(not(source))] String),

    /// A method token that is not one of GET, POST, PUT, PATCH, DELETE.
    #[display("unsupported HTTP method: {_0}")]
    #[from(skip)]
    UnsupportedMethod(#[error(not(source))] String),

    /// Non-2xx response, with the parsed response body as payload.
    #[display("request failed with status {status}: {payload}")]
    #[from(skip)]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Parsed response body, verbatim.
        #[error(not(source))]
        payload: Payload,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Transport-level timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// A route catalog that breaks one of its invariants.
    #[display("invalid route catalog: {_0}")]
    #[from(skip)]
    InvalidCatalog(#[error(not(source))] String),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a failed-request error from a status code and its parsed body.
    #[must_use]
    pub fn request_failed(status: u16, payload: impl Into<Payload>) -> Self {
        Self::RequestFailed {
            status,
            payload: payload.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid catalog error.
    #[must_use]
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` for network-level failures (connection, TLS, timeout).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Timeout)
    }

    /// Returns `true` if the server answered with a non-2xx status.
    #[must_use]
    pub const fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Returns the HTTP status code if the request failed.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the parsed response body if the request failed.
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::RequestFailed { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Try to decode the failed response body into a typed error.
    ///
    /// Returns `None` if this is not a failed request.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     message: String,
    /// }
    ///
    /// match client.query::<GetItem>(input).await {
    ///     Ok(item) => println!("{item:?}"),
    ///     Err(e) => {
    ///         if let Some(Ok(api_error)) = e.decode_payload::<ApiError>() {
    ///             println!("API error: {}", api_error.message);
    ///         }
    ///     }
    /// }
    /// ```
    pub fn decode_payload<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.payload().map(Payload::decode)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_display() {
        let err = Error::request_failed(404, json!({"message": "not found"}));
        assert_eq!(
            err.to_string(),
            r#"request failed with status 404: {"message":"not found"}"#
        );

        let err = Error::request_failed(500, "boom");
        assert_eq!(err.to_string(), "request failed with status 500: boom");

        let err = Error::MalformedKey("GET/items".to_string());
        assert_eq!(err.to_string(), r#"malformed procedure key: "GET/items""#);

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::request_failed(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_request_failed());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(err.is_not_found());

        let err = Error::request_failed(503, "Unavailable");
        assert!(err.is_server_error());
        assert!(!err.is_not_found());

        let err = Error::Timeout;
        assert_eq!(err.status(), None);
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn error_is_transport() {
        assert!(Error::Timeout.is_transport());
        assert!(Error::connection("refused").is_transport());
        assert!(Error::tls("bad certificate").is_transport());
        assert!(!Error::request_failed(500, "").is_transport());
        assert!(!Error::MalformedKey(String::new()).is_transport());
    }

    #[test]
    fn error_payload_is_verbatim() {
        let err = Error::request_failed(404, json!({"message": "not found"}));
        assert_eq!(
            err.payload(),
            Some(&Payload::Json(json!({"message": "not found"})))
        );
        assert!(Error::Timeout.payload().is_none());
    }

    #[test]
    fn error_decode_payload() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            message: String,
        }

        let err = Error::request_failed(404, json!({"message": "not found"}));
        let decoded = err
            .decode_payload::<ApiError>()
            .expect("failed request")
            .expect("decodes");
        assert_eq!(
            decoded,
            ApiError {
                message: "not found".to_string()
            }
        );

        let err = Error::request_failed(502, "Bad Gateway");
        assert!(matches!(
            err.decode_payload::<ApiError>(),
            Some(Err(Error::JsonDeserialization { .. }))
        ));

        assert!(Error::Timeout.decode_payload::<ApiError>().is_none());
    }
}
