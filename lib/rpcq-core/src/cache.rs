//! Boundary with the caching layer.
//!
//! The caching layer owns memoization, deduplication, retries and loading state. The
//! procedure pipeline only hands it keyed [`Producer`]s:
//!
//! - a query is cached under `[key]` or `[key, input]` ([`CacheKey`]);
//! - [`QueryInput::Disabled`] suppresses the query entirely;
//! - invalidation, reads and writes forward keys untouched.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Payload, ProcedureKey, Result};

/// Input position of a query: a value, or the sentinel that disables execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryInput<T> {
    /// Run the query with this input.
    Enabled(T),
    /// Do not run the query and leave the cache untouched.
    Disabled,
}

impl<T> QueryInput<T> {
    /// Returns `true` for the disabled sentinel.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// The enabled input, if any.
    #[must_use]
    pub fn into_enabled(self) -> Option<T> {
        match self {
            Self::Enabled(input) => Some(input),
            Self::Disabled => None,
        }
    }
}

impl<T> From<T> for QueryInput<T> {
    fn from(input: T) -> Self {
        Self::Enabled(input)
    }
}

/// Cache address of a query: `[procedureKey]` or `[procedureKey, input]`.
///
/// Input absence is significant: `[key]` and `[key, {}]` are different entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(Vec<Value>);

impl CacheKey {
    /// Key of a query without input, also usable as a filter for every input.
    #[must_use]
    pub fn new(key: &ProcedureKey) -> Self {
        Self(vec![Value::String(key.to_string())])
    }

    /// Key of a query with an optional input.
    #[must_use]
    pub fn with_input(key: &ProcedureKey, input: Option<Value>) -> Self {
        let mut parts = vec![Value::String(key.to_string())];
        parts.extend(input);
        Self(parts)
    }

    /// Key elements.
    #[must_use]
    pub fn parts(&self) -> &[Value] {
        &self.0
    }

    /// The procedure key string, first element of the key.
    #[must_use]
    pub fn procedure(&self) -> Option<&str> {
        self.0.first().and_then(Value::as_str)
    }

    /// The input element, if any.
    #[must_use]
    pub fn input(&self) -> Option<&Value> {
        self.0.get(1)
    }

    /// Stable hash: compact JSON with object keys sorted.
    ///
    /// Two keys whose inputs only differ by field order hash identically.
    #[must_use]
    pub fn hash_key(&self) -> String {
        sorted(&Value::Array(self.0.clone())).to_string()
    }

    /// Returns `true` if `filter` is a partial match of this key.
    ///
    /// Every element of the filter must match the element at the same position;
    /// objects match when every field of the filter matches, recursively.
    #[must_use]
    pub fn matches(&self, filter: &Self) -> bool {
        filter.0.len() <= self.0.len()
            && filter
                .0
                .iter()
                .zip(&self.0)
                .all(|(expected, actual)| partial_match(actual, expected))
    }
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let ordered: BTreeMap<&String, Value> =
                fields.iter().map(|(k, v)| (k, sorted(v))).collect();
            Value::Object(
                ordered
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn partial_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => expected.iter().all(|(k, v)| {
            actual
                .get(k)
                .is_some_and(|actual| partial_match(actual, v))
        }),
        (Value::Array(actual), Value::Array(expected)) => {
            expected.len() <= actual.len()
                && expected
                    .iter()
                    .zip(actual)
                    .all(|(expected, actual)| partial_match(actual, expected))
        }
        (actual, expected) => actual == expected,
    }
}

/// A keyed asynchronous producer the caching layer invokes when it needs a value.
pub trait Producer: Send + Sync {
    /// Produce a fresh value.
    ///
    /// # Errors
    ///
    /// Any pipeline error, returned unchanged.
    fn produce(&self) -> impl Future<Output = Result<Payload>> + Send;
}

/// The caching layer driving producers.
pub trait QueryCache: Send + Sync {
    /// Return the value cached under `key`, invoking `producer` when there is none
    /// or it is no longer valid.
    ///
    /// # Errors
    ///
    /// Propagates the producer's error after recording it.
    fn fetch<P: Producer>(
        &self,
        key: CacheKey,
        producer: &P,
    ) -> impl Future<Output = Result<Payload>> + Send;

    /// Mark every entry matching `filter` (see [`CacheKey::matches`]) as invalid.
    fn invalidate(&self, filter: &CacheKey);

    /// Read the cached value.
    fn get_data(&self, key: &CacheKey) -> Option<Payload>;

    /// Write a value.
    fn set_data(&self, key: CacheKey, data: Payload);
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;
    use crate::Method;

    fn items_key() -> ProcedureKey {
        ProcedureKey::new(Method::Get, "/items")
    }

    #[test]
    fn absent_input_differs_from_empty_object() {
        let bare = CacheKey::with_input(&items_key(), None);
        let empty = CacheKey::with_input(&items_key(), Some(json!({})));

        check!(bare == CacheKey::new(&items_key()));
        check!(bare.parts().len() == 1);
        check!(empty.parts().len() == 2);
        check!(bare.hash_key() != empty.hash_key());
    }

    #[test]
    fn hash_key_sorts_object_fields() {
        let a = CacheKey::with_input(
            &items_key(),
            Some(json!({"query": {"page": 1, "tag": "x"}})),
        );
        let b = CacheKey::with_input(
            &items_key(),
            Some(json!({"query": {"tag": "x", "page": 1}})),
        );

        check!(a.hash_key() == b.hash_key());
        insta::assert_snapshot!(a.hash_key(), @r#"["GET /items",{"query":{"page":1,"tag":"x"}}]"#);
    }

    #[test]
    fn prefix_filter_matches_every_input() {
        let filter = CacheKey::new(&items_key());
        let entry = CacheKey::with_input(&items_key(), Some(json!({"query": {"tag": "x"}})));

        check!(entry.matches(&filter));
        check!(filter.matches(&filter));
        check!(!filter.matches(&entry));
    }

    #[test]
    fn partial_input_filter() {
        let entry = CacheKey::with_input(
            &items_key(),
            Some(json!({"query": {"tag": "x", "page": 2}})),
        );
        let same_tag = CacheKey::with_input(&items_key(), Some(json!({"query": {"tag": "x"}})));
        let other_tag = CacheKey::with_input(&items_key(), Some(json!({"query": {"tag": "y"}})));

        check!(entry.matches(&same_tag));
        check!(!entry.matches(&other_tag));
    }

    #[test]
    fn other_procedure_does_not_match() {
        let entry = CacheKey::new(&items_key());
        let filter = CacheKey::new(&ProcedureKey::new(Method::Get, "/users"));
        check!(!entry.matches(&filter));
    }

    #[test]
    fn query_input_sentinel() {
        let enabled: QueryInput<u32> = 3.into();
        check!(!enabled.is_disabled());
        check!(enabled.into_enabled() == Some(3));

        let disabled = QueryInput::<u32>::Disabled;
        check!(disabled.is_disabled());
        check!(disabled.into_enabled() == None);
    }

    #[test]
    fn cache_key_accessors() {
        let key = CacheKey::with_input(&items_key(), Some(json!({"query": {}})));
        check!(key.procedure() == Some("GET /items"));
        check!(key.input() == Some(&json!({"query": {}})));
    }
}
