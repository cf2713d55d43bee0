//! A typed model of the subset of an OpenAPI 3.0.x/3.1.x document this crate
//! needs to validate requests: paths, operations, parameters, and security
//! schemes. Document-wide concerns unrelated to request validation (info,
//! external docs, tags, links, callbacks) are modeled only far enough to
//! round-trip; this is a validator, not a general-purpose document editor.
//!
//! `paths` and `components.security_schemes` use [`IndexMap`] rather than a
//! sorted map: path-lookup tie-breaking (see [`crate::path`]) depends on the
//! order templates were declared in the document, not their lexicographic
//! order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Spec {
    pub openapi: String,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Spec {
    pub fn is_3_1(&self) -> bool {
        self.openapi.starts_with("3.1")
    }

    pub fn is_3_0(&self) -> bool {
        self.openapi.starts_with("3.0")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PathItem {
    #[serde(rename = "$ref", default)]
    pub ref_path: Option<String>,
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub options: Option<Operation>,
    #[serde(default)]
    pub head: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub trace: Option<Operation>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl PathItem {
    pub fn operation(&self, method: &http::Method) -> Option<&Operation> {
        match method.as_str() {
            "GET" => self.get.as_ref(),
            "PUT" => self.put.as_ref(),
            "POST" => self.post.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "OPTIONS" => self.options.as_ref(),
            "HEAD" => self.head.as_ref(),
            "PATCH" => self.patch.as_ref(),
            "TRACE" => self.trace.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    Simple,
    Label,
    Matrix,
    Form,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub style: Option<ParameterStyle>,
    #[serde(default)]
    pub explode: Option<bool>,
    #[serde(rename = "allowReserved", default)]
    pub allow_reserved: Option<bool>,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub content: Option<IndexMap<String, MediaType>>,
}

impl Parameter {
    /// `path` parameters are implicitly required regardless of the
    /// declared `required` flag.
    pub fn is_required(&self) -> bool {
        self.location == ParameterLocation::Path || self.required.unwrap_or(false)
    }

    pub fn effective_style(&self) -> ParameterStyle {
        self.style.unwrap_or(match self.location {
            ParameterLocation::Path | ParameterLocation::Header => ParameterStyle::Simple,
            ParameterLocation::Query | ParameterLocation::Cookie => ParameterStyle::Form,
        })
    }

    pub fn effective_explode(&self) -> bool {
        self.explode.unwrap_or(self.effective_style() == ParameterStyle::Form)
    }

    /// Resolves the effective schema, whether declared directly or through
    /// the single media-type entry of a content-wrapped parameter.
    pub fn effective_schema(&self) -> Option<(&Value, Option<&str>)> {
        if let Some(schema) = &self.schema {
            return Some((schema, None));
        }
        let (media_type, media) = self.content.as_ref()?.iter().next()?;
        media.schema.as_ref().map(|s| (s, Some(media_type.as_str())))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
    ApiKey,
    Http,
    OAuth2,
    OpenIdConnect,
    MutualTLS,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "in", default)]
    pub location: Option<ApiKeyLocation>,
    #[serde(default)]
    pub scheme: Option<String>,
}

/// One `SecurityRequirementSet`: scheme name -> required scopes. All entries
/// must pass for the set to pass (AND); an empty map means "no
/// authentication required".
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SecurityRequirement(pub IndexMap<String, Vec<String>>);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_parameter_is_always_required() {
        let p: Parameter = serde_json::from_value(json!({
            "name": "id",
            "in": "path",
            "schema": {"type": "string"}
        }))
        .unwrap();
        assert!(p.is_required());
    }

    #[test]
    fn default_style_for_query_is_form() {
        let p: Parameter = serde_json::from_value(json!({
            "name": "q",
            "in": "query",
            "schema": {"type": "string"}
        }))
        .unwrap();
        assert_eq!(p.effective_style(), ParameterStyle::Form);
        assert!(p.effective_explode());
    }

    #[test]
    fn default_style_for_header_is_simple_non_exploded() {
        let p: Parameter = serde_json::from_value(json!({
            "name": "X-Trace",
            "in": "header",
            "schema": {"type": "string"}
        }))
        .unwrap();
        assert_eq!(p.effective_style(), ParameterStyle::Simple);
        assert!(!p.effective_explode());
    }

    #[test]
    fn paths_preserve_insertion_order() {
        let spec: Spec = serde_json::from_value(json!({
            "openapi": "3.0.3",
            "paths": {
                "/zebra": {},
                "/apple": {},
                "/mango": {}
            }
        }))
        .unwrap();
        let keys: Vec<&str> = spec.paths.keys().map(|s| s.as_str()).collect();
        assert_eq!(keys, vec!["/zebra", "/apple", "/mango"]);
    }

    #[test]
    fn content_wrapped_parameter_resolves_schema() {
        let p: Parameter = serde_json::from_value(json!({
            "name": "filter",
            "in": "query",
            "content": {
                "application/json": {"schema": {"type": "object"}}
            }
        }))
        .unwrap();
        let (schema, media) = p.effective_schema().unwrap();
        assert_eq!(media, Some("application/json"));
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn version_detection() {
        let spec: Spec = serde_json::from_value(json!({"openapi": "3.1.0", "paths": {}})).unwrap();
        assert!(spec.is_3_1());
        assert!(!spec.is_3_0());
    }
}
