//! Procedure keys.
//!
//! A procedure key is the single identifier of a route: the upper-case method,
//! one space, then the literal path template (`"GET /items/{id}"`).
//!
//! # Example
//!
//! ```
//! use rpcq_core::{Method, ProcedureKey, ProcedureKind};
//!
//! let key = ProcedureKey::new(Method::Get, "/items/{id}");
//! assert_eq!(key.to_string(), "GET /items/{id}");
//!
//! let parsed: ProcedureKey = "DELETE /items/{id}".parse().unwrap();
//! assert_eq!(parsed.kind(), ProcedureKind::Mutation);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Method, Result};

/// Whether a procedure is a cached read or a parameterized action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    /// `GET` routes, cache-addressed by key and input.
    Query,
    /// Every other method, addressed by key alone.
    Mutation,
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// Canonical `"METHOD /path"` identifier of a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcedureKey {
    method: Method,
    path: String,
}

impl ProcedureKey {
    /// Create a key from a method and a path template.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Parse a key, splitting on the first space.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedKey`] if the key contains no space
    /// - [`Error::UnsupportedMethod`] if the method token is not a procedure method
    pub fn parse(key: &str) -> Result<Self> {
        let (method, path) = decode(key)?;
        Ok(Self::new(method, path))
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path template, placeholders included.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query or mutation.
    #[must_use]
    pub const fn kind(&self) -> ProcedureKind {
        classify(self.method)
    }

    /// Names of the `{name}` placeholders, in template order.
    #[must_use]
    pub fn path_params(&self) -> Vec<&str> {
        path_placeholders(&self.path)
    }

    /// Consume into (method, path).
    #[must_use]
    pub fn into_parts(self) -> (Method, String) {
        (self.method, self.path)
    }
}

impl fmt::Display for ProcedureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

impl FromStr for ProcedureKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ProcedureKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProcedureKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Encode a method and a path template into a key string.
#[must_use]
pub fn encode(method: Method, path: &str) -> String {
    format!("{method} {path}")
}

/// Split a key string into its method and path template.
///
/// # Errors
///
/// - [`Error::MalformedKey`] if the key contains no space
/// - [`Error::UnsupportedMethod`] if the method token is not a procedure method
pub fn decode(key: &str) -> Result<(Method, &str)> {
    let (method, path) = key
        .split_once(' ')
        .ok_or_else(|| Error::MalformedKey(key.to_string()))?;
    Ok((method.parse()?, path))
}

/// Classify a method as query or mutation.
#[must_use]
pub const fn classify(method: Method) -> ProcedureKind {
    if method.is_query() {
        ProcedureKind::Query
    } else {
        ProcedureKind::Mutation
    }
}

/// Extract `{name}` placeholders from a path template.
///
/// Empty (`{}`) and unterminated placeholders are ignored.
#[must_use]
pub fn path_placeholders(path: &str) -> Vec<&str> {
    let mut placeholders = Vec::new();
    let mut rest = path;

    while let Some((_, after)) = rest.split_once('{') {
        let Some((name, tail)) = after.split_once('}') else {
            break;
        };
        if !name.is_empty() {
            placeholders.push(name);
        }
        rest = tail;
    }

    placeholders
}
