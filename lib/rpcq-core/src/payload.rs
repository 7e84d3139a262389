//! Response payloads and JSON (de)serialization helpers.

use std::fmt;

use bytes::Bytes;
use serde_json::Value;

use crate::Result;

/// The `application/json` MIME type.
pub const APPLICATION_JSON: &str = "application/json";

/// Returns `true` when a `Content-Type` value denotes a JSON body.
///
/// Any value starting with `application/json` qualifies, parameters included
/// (`application/json; charset=utf-8`). Leading whitespace and letter case are
/// ignored.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with(APPLICATION_JSON)
}

/// A response body parsed according to its content type.
///
/// JSON responses are decoded into a [`Value`]; every other content type is kept
/// as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured JSON body.
    Json(Value),
    /// Raw text body.
    Text(String),
}

impl Payload {
    /// Parse a response body by its declared content type.
    ///
    /// A missing or unknown content type yields [`Payload::Text`]; invalid UTF-8 is
    /// replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if a JSON content type carries an invalid JSON body.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self> {
        if content_type.is_some_and(is_json_content_type) {
            from_json(body).map(Self::Json)
        } else {
            Ok(Self::Text(String::from_utf8_lossy(body).into_owned()))
        }
    }

    /// The JSON value, if this is a JSON payload.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is a text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Convert into a JSON value; text becomes a JSON string.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Decode the payload into a typed value.
    ///
    /// Text payloads decode as a JSON string, so `String` outputs work for
    /// `text/plain` routes. An empty text payload that cannot be a string falls back
    /// to `null`, which lets `()` and `Option<T>` outputs accept empty bodies.
    ///
    /// # Errors
    ///
    /// Returns a path-aware [`crate::Error::JsonDeserialization`] on mismatch.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Json(value) => from_value(value.clone()),
            Self::Text(text) => from_value(Value::String(text.clone())).or_else(|err| {
                if text.is_empty() {
                    from_value(Value::Null)
                } else {
                    Err(err)
                }
            }),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use rpcq_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Item { name: String }
///
/// let item = Item { name: "lamp".to_string() };
/// let bytes = to_json(&item).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"lamp"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Deserialize a JSON value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if the value does not match `T`.
pub fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
