//! HTTP method types.

use std::str::FromStr;

use derive_more::Display;

/// HTTP method of a procedure.
///
/// Only the methods that can appear in a procedure key are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Method {
    /// GET method - the only query method.
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
}

impl Method {
    /// All supported methods, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
    ];

    /// The canonical upper-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` for the query method (`GET`).
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Get)
    }

    /// Returns `true` if a request with this method may carry a body.
    #[must_use]
    pub const fn carries_body(&self) -> bool {
        !self.is_query()
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    /// Parse a method name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::UnsupportedMethod(s.to_string()))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn method_parse_ignores_case() {
        assert_eq!("get".parse::<Method>().expect("get"), Method::Get);
        assert_eq!("Patch".parse::<Method>().expect("patch"), Method::Patch);
        assert_eq!("DELETE".parse::<Method>().expect("delete"), Method::Delete);
    }

    #[test]
    fn method_parse_rejects_unknown() {
        let err = "HEAD".parse::<Method>().expect_err("HEAD is not a procedure method");
        assert_eq!(err.to_string(), "unsupported HTTP method: HEAD");
    }

    #[test]
    fn only_get_is_query() {
        assert!(Method::Get.is_query());
        for method in [Method::Post, Method::Put, Method::Patch, Method::Delete] {
            assert!(!method.is_query(), "{method} should be a mutation");
            assert!(method.carries_body());
        }
    }

    #[test]
    fn method_http_conversions() {
        assert_eq!(http::Method::from(Method::Patch), http::Method::PATCH);
        assert_eq!(
            Method::try_from(http::Method::PUT).expect("PUT"),
            Method::Put
        );
        assert!(Method::try_from(http::Method::OPTIONS).is_err());
    }
}
