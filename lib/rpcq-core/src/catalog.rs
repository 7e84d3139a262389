//! Route catalog.
//!
//! The catalog is the schema-derived table of routes: `path → method → definition`,
//! where a definition is
//!
//! ```text
//! {
//!   parameters?: { path?: {..}, query?: {..}, header?: {..}, cookie?: {..} }
//!              | [ { name, in, required? }, .. ],
//!   requestBody?: { content: { <contentType>: <schema> } },
//!   responses: { <status>: { content: { <contentType>: <schema> } } }
//! }
//! ```
//!
//! Both the grouped parameter form (as emitted by type generators) and the plain
//! `OpenAPI` array form are accepted. Header and cookie parameters are parsed but never
//! surfaced to callers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::{Map, Value};

use crate::{Error, Method, ProcedureKey, ProcedureKind, Result};

/// Parameter location in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamLocation {
    /// Path parameter (e.g., `/users/{id}`)
    Path,
    /// Query parameter (e.g., `?limit=10`)
    Query,
    /// Header parameter, never surfaced
    Header,
    /// Cookie parameter, never surfaced
    Cookie,
}

impl ParamLocation {
    const GROUPS: [Self; 4] = [Self::Path, Self::Query, Self::Header, Self::Cookie];

    /// Group name in a catalog (`path`, `query`, `header`, `cookie`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }

    /// Returns `true` for locations callers supply in a procedure input.
    #[must_use]
    pub const fn is_surfaced(&self) -> bool {
        matches!(self, Self::Path | Self::Query)
    }

    fn parse(s: &str) -> Option<Self> {
        Self::GROUPS.into_iter().find(|location| location.as_str() == s)
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about a single parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMeta {
    /// The parameter name.
    pub name: String,
    /// Where the parameter is sent in the HTTP request.
    pub location: ParamLocation,
    /// Whether the parameter is required.
    pub required: bool,
}

/// One route of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    key: ProcedureKey,
    params: Vec<ParamMeta>,
    groups: BTreeSet<ParamLocation>,
    body_content_types: Option<Vec<String>>,
    responses: BTreeMap<String, Vec<String>>,
}

impl Route {
    /// The route's procedure key.
    #[must_use]
    pub const fn key(&self) -> &ProcedureKey {
        &self.key
    }

    /// Path and query parameters, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = &ParamMeta> {
        self.params
            .iter()
            .filter(|param| param.location.is_surfaced())
    }

    /// Parameters at one surfaced location.
    pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &ParamMeta> {
        self.params()
            .filter(move |param| param.location == location)
    }

    /// Returns `true` when the route declares a request body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.body_content_types.is_some()
    }

    /// Content types of the request body.
    #[must_use]
    pub fn body_content_types(&self) -> &[String] {
        self.body_content_types.as_deref().unwrap_or_default()
    }

    /// Content types declared for a response status (e.g. `"200"`).
    #[must_use]
    pub fn response_content_types(&self, status: &str) -> &[String] {
        self.responses.get(status).map_or(&[], Vec::as_slice)
    }

    /// Declared response statuses.
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.responses.keys().map(String::as_str)
    }

    /// Returns `true` when the route takes no input at all.
    ///
    /// That is the case when no path group, no query group and no request body are
    /// declared. Header and cookie groups do not count.
    #[must_use]
    pub fn requires_no_input(&self) -> bool {
        !self.groups.contains(&ParamLocation::Path)
            && !self.groups.contains(&ParamLocation::Query)
            && !self.has_body()
    }

    /// Check that every `{name}` placeholder is a declared path parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] naming the first undeclared placeholder.
    pub fn validate(&self) -> Result<()> {
        for placeholder in self.key.path_params() {
            let declared = self
                .params_in(ParamLocation::Path)
                .any(|param| param.name == placeholder);
            if !declared {
                return Err(Error::invalid_catalog(format!(
                    "{}: placeholder {{{placeholder}}} is not a declared path parameter",
                    self.key
                )));
            }
        }
        Ok(())
    }
}

/// The full table of routes.
///
/// # Example
///
/// ```
/// use rpcq_core::RouteCatalog;
///
/// let catalog = RouteCatalog::from_json(r#"{
///     "/items/{id}": {
///         "get": { "parameters": { "path": { "id": "number" } }, "responses": {} },
///         "delete": { "parameters": { "path": { "id": "number" } }, "responses": {} }
///     }
/// }"#).unwrap();
///
/// let keys: Vec<String> = catalog.keys().map(ToString::to_string).collect();
/// assert_eq!(keys, ["GET /items/{id}", "DELETE /items/{id}"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Parse a `paths` object from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON or a malformed catalog shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = crate::from_json(json.as_bytes())?;
        Self::from_value(&value)
    }

    /// Parse the `paths` object of a full `OpenAPI` document.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON or a document without `paths`.
    pub fn from_openapi_document(json: &str) -> Result<Self> {
        let document: Value = crate::from_json(json.as_bytes())?;
        let paths = document
            .get("paths")
            .ok_or_else(|| Error::invalid_catalog("document has no `paths` object"))?;
        Self::from_value(paths)
    }

    /// Build a catalog from a `paths` value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] if the value or a path item is not an object.
    pub fn from_value(paths: &Value) -> Result<Self> {
        let paths = paths
            .as_object()
            .ok_or_else(|| Error::invalid_catalog("`paths` must be an object"))?;

        let mut routes = Vec::new();
        for (path, item) in paths {
            let item = item.as_object().ok_or_else(|| {
                Error::invalid_catalog(format!("path item {path} must be an object"))
            })?;
            let shared = item.get("parameters");

            for method in Method::ALL {
                let key = method.as_str().to_ascii_lowercase();
                match item.get(&key) {
                    None | Some(Value::Null) => {}
                    Some(Value::Object(operation)) => {
                        let key = ProcedureKey::new(method, path.clone());
                        routes.push(parse_route(key, operation, shared));
                    }
                    Some(_) => {
                        return Err(Error::invalid_catalog(format!(
                            "operation {method} {path} must be an object"
                        )));
                    }
                }
            }
        }

        Ok(Self { routes })
    }

    /// All routes, grouped by path, methods in catalog order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a route by key.
    #[must_use]
    pub fn route(&self, key: &ProcedureKey) -> Option<&Route> {
        self.routes.iter().find(|route| route.key() == key)
    }

    /// Every procedure key.
    pub fn keys(&self) -> impl Iterator<Item = &ProcedureKey> {
        self.routes.iter().map(Route::key)
    }

    /// Keys of `GET` routes.
    pub fn query_keys(&self) -> impl Iterator<Item = &ProcedureKey> {
        self.keys()
            .filter(|key| key.kind() == ProcedureKind::Query)
    }

    /// Keys of non-`GET` routes.
    pub fn mutation_keys(&self) -> impl Iterator<Item = &ProcedureKey> {
        self.keys()
            .filter(|key| key.kind() == ProcedureKind::Mutation)
    }

    /// Validate every route.
    ///
    /// # Errors
    ///
    /// Returns the first route error found.
    pub fn validate(&self) -> Result<()> {
        self.routes.iter().try_for_each(Route::validate)
    }
}

fn parse_route(key: ProcedureKey, operation: &Map<String, Value>, shared: Option<&Value>) -> Route {
    let mut params = Vec::new();
    let mut groups = BTreeSet::new();

    // Path-item parameters first, operation parameters override by (name, location).
    for source in [shared, operation.get("parameters")].into_iter().flatten() {
        for param in parse_parameters(source, &mut groups) {
            params.retain(|existing: &ParamMeta| {
                existing.name != param.name || existing.location != param.location
            });
            params.push(param);
        }
    }

    let body_content_types = operation
        .get("requestBody")
        .filter(|body| !body.is_null())
        .map(content_types);

    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
            responses
                .iter()
                .map(|(status, response)| (status.clone(), content_types(response)))
                .collect()
        })
        .unwrap_or_default();

    Route {
        key,
        params,
        groups,
        body_content_types,
        responses,
    }
}

fn parse_parameters(source: &Value, groups: &mut BTreeSet<ParamLocation>) -> Vec<ParamMeta> {
    match source {
        // Grouped form: { path: { id: .. }, query: { .. } }
        Value::Object(grouped) => ParamLocation::GROUPS
            .into_iter()
            .filter_map(|location| {
                let group = grouped.get(location.as_str())?.as_object()?;
                groups.insert(location);
                Some(group.keys().map(move |name| ParamMeta {
                    name: name.clone(),
                    location,
                    required: location == ParamLocation::Path,
                }))
            })
            .flatten()
            .collect(),
        // OpenAPI form: [ { name, in, required } ]
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let name = item.get("name")?.as_str()?;
                let location = ParamLocation::parse(item.get("in")?.as_str()?)?;
                groups.insert(location);
                let required = location == ParamLocation::Path
                    || item.get("required").and_then(Value::as_bool) == Some(true);
                Some(ParamMeta {
                    name: name.to_string(),
                    location,
                    required,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn content_types(definition: &Value) -> Vec<String> {
    definition
        .get("content")
        .and_then(Value::as_object)
        .map(|content| content.keys().cloned().collect())
        .unwrap_or_default()
}
