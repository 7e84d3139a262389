//! Splitting a procedure input into path, query and body parts.
//!
//! A procedure input is a JSON object with up to three optional fields:
//!
//! ```json
//! { "path": { "id": 5 }, "query": { "tag": "x" }, "body": { "name": "lamp" } }
//! ```
//!
//! Extraction is purely structural: nothing is validated against the route.

use serde_json::{Map, Value};

/// Field holding path parameters.
pub const PATH_FIELD: &str = "path";
/// Field holding query parameters.
pub const QUERY_FIELD: &str = "query";
/// Field holding the request body.
pub const BODY_FIELD: &str = "body";

/// The three independent parts of a procedure input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputParts {
    /// Path parameters, in declaration order.
    pub params: Option<Map<String, Value>>,
    /// Query parameters, in declaration order.
    pub query: Option<Map<String, Value>>,
    /// Request body.
    pub body: Option<Value>,
}

impl InputParts {
    /// Returns `true` when no part is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.params.is_none() && self.query.is_none() && self.body.is_none()
    }
}

/// Split an input value into its parts.
///
/// Absent, `null` and non-object inputs yield no parts. Within an object, a missing
/// field, a `null` field, or a `path`/`query` field that is not an object yields an
/// absent part.
///
/// # Example
///
/// ```
/// use rpcq_core::extract;
/// use serde_json::json;
///
/// let input = json!({ "query": { "q": "a" } });
/// let parts = extract(Some(&input));
/// assert!(parts.params.is_none());
/// assert_eq!(parts.query.unwrap()["q"], "a");
/// assert!(parts.body.is_none());
/// ```
#[must_use]
pub fn extract(input: Option<&Value>) -> InputParts {
    let Some(Value::Object(fields)) = input else {
        return InputParts::default();
    };

    InputParts {
        params: object_field(fields, PATH_FIELD),
        query: object_field(fields, QUERY_FIELD),
        body: fields.get(BODY_FIELD).filter(|body| !body.is_null()).cloned(),
    }
}

fn object_field(fields: &Map<String, Value>, name: &str) -> Option<Map<String, Value>> {
    fields.get(name).and_then(Value::as_object).cloned()
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_input_has_no_parts() {
        check!(extract(None).is_empty());
        check!(extract(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn non_object_input_has_no_parts() {
        check!(extract(Some(&json!(42))).is_empty());
        check!(extract(Some(&json!("path"))).is_empty());
        check!(extract(Some(&json!([{"path": {}}]))).is_empty());
    }

    #[test]
    fn query_only_input() {
        let input = json!({"query": {"q": "a"}});
        let parts = extract(Some(&input));

        check!(parts.params == None);
        check!(parts.query == json!({"q": "a"}).as_object().cloned());
        check!(parts.body == None);
    }

    #[test]
    fn all_parts() {
        let input = json!({
            "path": {"id": 5},
            "query": {"tag": ["a", "b"]},
            "body": {"name": "lamp"},
            "header": {"x-trace": "ignored"},
        });
        let parts = extract(Some(&input));

        check!(parts.params == json!({"id": 5}).as_object().cloned());
        check!(parts.query == json!({"tag": ["a", "b"]}).as_object().cloned());
        check!(parts.body == Some(json!({"name": "lamp"})));
    }

    #[test]
    fn null_and_non_object_fields_are_absent() {
        let input = json!({"path": null, "query": "q=a", "body": null});
        check!(extract(Some(&input)).is_empty());
    }

    #[test]
    fn falsy_bodies_are_kept() {
        for body in [json!(0), json!(false), json!(""), json!([])] {
            let input = json!({ "body": body });
            check!(extract(Some(&input)).body == Some(body));
        }
    }

    #[test]
    fn params_keep_declaration_order() {
        let input = json!({"path": {"z": 1, "a": 2, "m": 3}});
        let params = extract(Some(&input)).params.expect("path params");
        let names: Vec<_> = params.keys().map(String::as_str).collect();
        check!(names == ["z", "a", "m"]);
    }
}
