//! Attribute parsing for the `Procedure` derive.

use syn::{Attribute, LitStr, Type};

/// HTTP method of a procedure key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Variant name of `rpcq::Method`, for code generation.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
        }
    }

    /// Canonical upper-case token.
    #[must_use]
    pub(crate) const fn token(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Parse an HTTP method from a string (case-insensitive).
    /// Returns `None` for unsupported methods.
    #[must_use]
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// `GET` procedures are queries.
    #[must_use]
    pub(crate) const fn is_query(self) -> bool {
        matches!(self, Self::Get)
    }
}

/// A procedure key checked at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeySpec {
    pub(crate) method: HttpMethod,
    pub(crate) path: String,
    pub(crate) placeholders: Vec<String>,
}

impl KeySpec {
    /// Canonical `"METHOD /path"` form.
    pub(crate) fn canonical(&self) -> String {
        format!("{} {}", self.method.token(), self.path)
    }

    /// Parse and validate a `"METHOD /path"` key.
    pub(crate) fn parse(key: &str) -> Result<Self, String> {
        let (method, path) = key.split_once(' ').ok_or_else(|| {
            format!("expected format: \"METHOD /path\" (e.g., \"GET /items/{{id}}\"), got {key:?}")
        })?;

        let method = HttpMethod::parse(method).ok_or_else(|| {
            format!("unsupported HTTP method: {method}. Supported: GET, POST, PUT, PATCH, DELETE")
        })?;

        if !path.starts_with('/') {
            return Err(format!("path must start with '/', got {path:?}"));
        }

        let placeholders = placeholders(path)?;

        Ok(Self {
            method,
            path: path.to_string(),
            placeholders,
        })
    }
}

/// Collect `{name}` placeholders, rejecting unbalanced or empty braces.
fn placeholders(path: &str) -> Result<Vec<String>, String> {
    let mut result = Vec::new();
    let mut current: Option<String> = None;

    for c in path.chars() {
        match (c, current.as_mut()) {
            ('{', None) => current = Some(String::new()),
            ('{', Some(_)) => return Err(format!("nested '{{' in path {path:?}")),
            ('}', None) => return Err(format!("unmatched '}}' in path {path:?}")),
            ('}', Some(name)) => {
                if name.is_empty() {
                    return Err(format!("empty placeholder in path {path:?}"));
                }
                result.push(std::mem::take(name));
                current = None;
            }
            (c, Some(name)) => name.push(c),
            (_, None) => {}
        }
    }

    if current.is_some() {
        return Err(format!("unclosed '{{' in path {path:?}"));
    }
    Ok(result)
}

/// Options parsed from `#[procedure(...)]`.
pub(crate) struct ProcedureAttrs {
    pub(crate) key: KeySpec,
    pub(crate) input: Option<Type>,
    pub(crate) output: Option<Type>,
}

impl ProcedureAttrs {
    /// Parse the `#[procedure(key = "...", input = T, output = U)]` attribute.
    pub(crate) fn from_attrs(
        attrs: &[Attribute],
        span: proc_macro2::Span,
    ) -> syn::Result<Self> {
        let mut key: Option<LitStr> = None;
        let mut input = None;
        let mut output = None;

        for attr in attrs {
            if !attr.path().is_ident("procedure") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    key = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("input") {
                    input = Some(meta.value()?.parse::<Type>()?);
                } else if meta.path.is_ident("output") {
                    output = Some(meta.value()?.parse::<Type>()?);
                } else {
                    return Err(meta.error("expected `key`, `input` or `output`"));
                }
                Ok(())
            })?;
        }

        let key = key.ok_or_else(|| {
            syn::Error::new(span, "missing #[procedure(key = \"METHOD /path\")]")
        })?;
        let key_spec = KeySpec::parse(&key.value()).map_err(|msg| syn::Error::new_spanned(&key, msg))?;

        if !key_spec.placeholders.is_empty() && input.is_none() {
            return Err(syn::Error::new_spanned(
                &key,
                format!(
                    "path placeholders {:?} require an `input` type",
                    key_spec.placeholders
                ),
            ));
        }

        Ok(Self {
            key: key_spec,
            input,
            output,
        })
    }
}
