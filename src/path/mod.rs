//! `find(method, request_path, spec) -> PathLookupResult | not-found`: the
//! radix matcher ([`radix`]) is tried first; on a miss, the regex matcher
//! ([`regex_fallback`]) is tried in spec declaration order. Path-structural
//! matching is deliberately decoupled from path-parameter *value*
//! validation, which is the path parameter validator's job.

pub mod radix;
pub mod regex_fallback;

use crate::error::ValidationErrorType;
use crate::model::{PathItem, Spec};
use crate::request::Request;
use radix::RadixTree;
use regex_fallback::RegexCache;
use std::collections::HashMap;
use std::sync::Arc;

pub struct PathLookupResult {
    pub template: String,
    pub path_item: Arc<PathItem>,
    pub bindings: HashMap<String, String>,
}

/// Strips the longest matching `spec.servers[].url` path prefix from
/// `request_path`. If no server prefix matches, the path is used unchanged.
fn strip_server_prefix<'a>(spec: &Spec, request_path: &'a str) -> &'a str {
    let mut best: Option<&str> = None;
    for server in &spec.servers {
        let server_path = match url::Url::parse(&server.url) {
            Ok(u) => u.path().trim_end_matches('/').to_string(),
            Err(_) => server.url.trim_end_matches('/').to_string(),
        };
        if server_path.is_empty() {
            continue;
        }
        if let Some(stripped) = request_path.strip_prefix(server_path.as_str()) {
            if best.map(|b| b.len() < server_path.len()).unwrap_or(true) {
                best = Some(stripped);
            }
        }
    }
    best.unwrap_or(request_path)
}

pub fn find_path(
    request: &impl Request,
    spec: &Spec,
    radix: &RadixTree,
    regex_cache: Option<&RegexCache>,
) -> Result<PathLookupResult, ValidationErrorType> {
    let raw_path = request.path_ref();
    let stripped = strip_server_prefix(spec, raw_path);
    log::debug!("looking for path '{stripped}' and method '{}'", request.method_ref());

    if let Some(m) = radix.find(stripped) {
        return Ok(PathLookupResult {
            template: m.template,
            path_item: m.path_item,
            bindings: m.bindings.into_iter().collect(),
        });
    }

    if let Some(cache) = regex_cache {
        if let Some((template, m)) =
            regex_fallback::find_first_match(spec.paths.keys().map(String::as_str), stripped, cache)
        {
            let path_item = Arc::new(spec.paths.get(template).cloned().unwrap_or_default());
            return Ok(PathLookupResult {
                template: template.to_string(),
                path_item,
                bindings: m.bindings.into_iter().collect(),
            });
        }
    }

    Err(ValidationErrorType::PathNotFound {
        method: request.method_ref().to_string(),
        path: raw_path.to_string(),
    })
}

/// Fallback-free, single-path resolution used when no server list or
/// pre-built regex cache is on hand; intended for call sites that already
/// have an owned `RadixTree` (see [`crate::validator::ParameterValidator`]).
pub mod url {
    //! Minimal path-only URL parsing so we don't need a dependency for
    //! `Url::parse` just to read `server.url`'s path component.
    pub struct Url {
        path: String,
    }

    impl Url {
        pub fn parse(raw: &str) -> Result<Self, ()> {
            // Strip scheme://host[:port] if present; otherwise treat the
            // whole string as a path (OpenAPI server URLs may be relative).
            let without_scheme = match raw.find("://") {
                Some(idx) => &raw[idx + 3..],
                None => raw,
            };
            let path = match without_scheme.find('/') {
                Some(idx) => without_scheme[idx..].to_string(),
                None => String::new(),
            };
            Ok(Url { path })
        }

        pub fn path(&self) -> &str {
            &self.path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Spec;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> Spec {
        serde_json::from_value(value).unwrap()
    }

    struct FakeRequest {
        method: http::Method,
        path: String,
    }

    impl Request for FakeRequest {
        fn method_ref(&self) -> &http::Method {
            &self.method
        }
        fn path_ref(&self) -> &str {
            &self.path
        }
        fn headers_ref(&self) -> &http::HeaderMap {
            static EMPTY: http::HeaderMap = http::HeaderMap::new();
            &EMPTY
        }
        fn query_ref(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn finds_literal_path() {
        let spec = spec(json!({"openapi": "3.0.3", "paths": {"/burgers/beef": {}}}));
        let radix = RadixTree::build(&spec);
        let req = FakeRequest { method: http::Method::GET, path: "/burgers/beef".to_string() };
        let result = find_path(&req, &spec, &radix, None).unwrap();
        assert_eq!(result.template, "/burgers/beef");
    }

    #[test]
    fn strips_server_base_path() {
        let spec = spec(json!({
            "openapi": "3.0.3",
            "servers": [{"url": "https://api.example.com/v1"}],
            "paths": {"/burgers/beef": {}}
        }));
        let radix = RadixTree::build(&spec);
        let req = FakeRequest { method: http::Method::GET, path: "/v1/burgers/beef".to_string() };
        let result = find_path(&req, &spec, &radix, None).unwrap();
        assert_eq!(result.template, "/burgers/beef");
    }

    #[test]
    fn falls_back_to_regex_for_matrix_template() {
        let spec = spec(json!({"openapi": "3.0.3", "paths": {"/burgers/{;burger*}/locate": {}}}));
        let radix = RadixTree::build(&spec);
        let cache = RegexCache::new();
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/;burger=1;burger=2;burger=3/locate".to_string(),
        };
        let result = find_path(&req, &spec, &radix, Some(&cache)).unwrap();
        assert_eq!(result.template, "/burgers/{;burger*}/locate");
        assert_eq!(result.bindings.get("burger").unwrap(), ";burger=1;burger=2;burger=3");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let spec = spec(json!({"openapi": "3.0.3", "paths": {"/burgers/beef": {}}}));
        let radix = RadixTree::build(&spec);
        let req = FakeRequest { method: http::Method::GET, path: "/nope".to_string() };
        let err = find_path(&req, &spec, &radix, None).unwrap_err();
        assert!(matches!(err, ValidationErrorType::PathNotFound { .. }));
    }
}
