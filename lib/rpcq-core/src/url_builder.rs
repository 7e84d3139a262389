//! Request URL construction.
//!
//! The URL is `base_url + path_template`, with path placeholders substituted and
//! query parameters appended.
//!
//! Substitution is literal and order-dependent: for each path parameter, in input
//! order, the first `{name}` of the *current* string is replaced. A value that itself
//! contains `{other}` text can therefore be substituted again by a later parameter.
//! Parameters without a matching placeholder are dropped, and placeholders without a
//! parameter stay in the URL.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Serialization format for array query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionFormat {
    /// Comma-separated in one pair: `?tags=a%2Cb` (default).
    #[default]
    Csv,
    /// Repeated parameters: `?tags=a&tags=b`.
    Multi,
    /// Space-separated: `?tags=a+b`.
    Ssv,
    /// Pipe-separated: `?tags=a%7Cb`.
    Pipes,
}

impl CollectionFormat {
    /// Separator for joined formats, `None` for [`CollectionFormat::Multi`].
    #[must_use]
    pub const fn separator(self) -> Option<&'static str> {
        match self {
            Self::Multi => None,
            Self::Csv => Some(","),
            Self::Ssv => Some(" "),
            Self::Pipes => Some("|"),
        }
    }
}

/// URL builder bound to a base URL.
///
/// # Example
///
/// ```
/// use rpcq_core::{CollectionFormat, UrlBuilder};
/// use serde_json::json;
///
/// let builder = UrlBuilder::new("https://api.example.com")
///     .collection_format(CollectionFormat::Multi);
/// let query = json!({ "tag": ["a", "b"] });
/// let url = builder.build("/items", None, query.as_object());
/// assert_eq!(url, "https://api.example.com/items?tag=a&tag=b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base_url: String,
    collection_format: CollectionFormat,
}

impl UrlBuilder {
    /// Create a builder for a base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collection_format: CollectionFormat::default(),
        }
    }

    /// Set the format used for array query values.
    #[must_use]
    pub const fn collection_format(mut self, format: CollectionFormat) -> Self {
        self.collection_format = format;
        self
    }

    /// The base URL prefix.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for a path template.
    #[must_use]
    pub fn build(
        &self,
        path_template: &str,
        params: Option<&Map<String, Value>>,
        query: Option<&Map<String, Value>>,
    ) -> String {
        let mut url = format!("{}{path_template}", self.base_url);

        if let Some(params) = params {
            for (name, value) in params {
                substitute_first(&mut url, name, &param_string(value));
            }
        }

        if let Some(query) = query {
            let search = query_string(query, self.collection_format);
            if !search.is_empty() {
                url.push('?');
                url.push_str(&search);
            }
        }

        url
    }
}

/// Build a URL with the default [`CollectionFormat`].
///
/// # Example
///
/// ```
/// use rpcq_core::build_url;
/// use serde_json::json;
///
/// let params = json!({ "id": 5 });
/// let url = build_url("https://api.example.com", "/items/{id}", params.as_object(), None);
/// assert_eq!(url, "https://api.example.com/items/5");
/// ```
#[must_use]
pub fn build_url(
    base_url: &str,
    path_template: &str,
    params: Option<&Map<String, Value>>,
    query: Option<&Map<String, Value>>,
) -> String {
    UrlBuilder::new(base_url).build(path_template, params, query)
}

/// Serialize query parameters as `application/x-www-form-urlencoded`.
///
/// Entries keep their map order. `null` entries are skipped, where a browser
/// `URLSearchParams` would send the literal `null`.
#[must_use]
pub fn query_string(query: &Map<String, Value>, format: CollectionFormat) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (name, value) in query {
        match (value, format.separator()) {
            (Value::Null, _) => {}
            (Value::Array(items), None) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    serializer.append_pair(name, &param_string(item));
                }
            }
            (Value::Array(items), Some(separator)) => {
                let joined = items
                    .iter()
                    .map(|item| {
                        if item.is_null() {
                            String::new()
                        } else {
                            param_string(item)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(separator);
                serializer.append_pair(name, &joined);
            }
            (value, _) => {
                serializer.append_pair(name, &param_string(value));
            }
        }
    }

    serializer.finish()
}

/// Replace the first `{name}` in `url`, if any.
fn substitute_first(url: &mut String, name: &str, value: &str) {
    let placeholder = format!("{{{name}}}");
    if let Some(index) = url.find(&placeholder) {
        url.replace_range(index..index + placeholder.len(), value);
    }
}

/// String form of a parameter value.
///
/// Strings are verbatim, arrays are comma-joined with `null` elements left empty,
/// objects are compact JSON. Floats use their shortest display, so `2.0` renders
/// as `2`.
fn param_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(number) if number.is_f64() => {
            number.as_f64().map_or_else(|| number.to_string(), |float| format!("{float}"))
        }
        Value::Array(items) => {
            let mut out = String::new();
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                if !item.is_null() {
                    out.push_str(&param_string(item));
                }
            }
            out
        }
        other => other.to_string(),
    }
}
