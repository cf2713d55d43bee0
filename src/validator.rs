//! The top-level entry point: [`ParameterValidator`] ties path lookup,
//! parameter merging, and the five per-location validators together behind
//! one object built once per specification and reused across requests.

use crate::builder::ParameterValidatorBuilder;
use crate::error::{ValidationError, ValidationErrorType};
use crate::model::{Operation, PathItem, Spec};
use crate::params::{params_for, params_in};
use crate::path::{find_path, PathLookupResult};
use crate::path::radix::RadixTree;
use crate::request::Request;
use crate::schema::SchemaEngine;
use crate::validators::{cookie, header, path as path_validator, query, security, ValidatorOptions};
use serde_json::Value;

pub struct ParameterValidator {
    spec: Spec,
    engine: SchemaEngine,
    radix: RadixTree,
    options: ValidatorOptions,
}

impl ParameterValidator {
    pub fn builder(spec: Value) -> ParameterValidatorBuilder {
        ParameterValidatorBuilder::new(spec)
    }

    pub(crate) fn new(spec: Spec, engine: SchemaEngine, radix: RadixTree, options: ValidatorOptions) -> Self {
        ParameterValidator { spec, engine, radix, options }
    }

    /// Resolves the path item and operation matching the request, reporting
    /// `path`/`missing` if neither the path nor (having found the path) the
    /// method exist.
    pub fn find_operation(&self, request: &impl Request) -> Result<(PathLookupResult, Operation), ValidationError> {
        let method = request.method_ref().clone();
        let lookup = find_path(request, &self.spec, &self.radix, self.options.regex_cache.as_ref())
            .map_err(|ty| self.adorn(ty, request, ""))?;
        let Some(operation) = lookup.path_item.operation(&method).cloned() else {
            let ty = ValidationErrorType::PathNotFound { method: method.to_string(), path: request.path_ref().to_string() };
            return Err(self.adorn(ty, request, &lookup.template));
        };
        Ok((lookup, operation))
    }

    /// Performs the path lookup itself, then validates the request's path
    /// parameters against it. Callers who already hold a [`PathLookupResult`]
    /// (e.g. because they also need the matched [`Operation`] for security
    /// or other per-location validation) should prefer
    /// [`Self::validate_path_params_with_path_item`] to avoid looking the
    /// path up twice.
    pub fn validate_path_params(&self, request: &impl Request) -> Vec<ValidationError> {
        let (lookup, operation) = match self.find_operation(request) {
            Ok(v) => v,
            Err(e) => return vec![e],
        };
        self.validate_path_params_with_path_item(request, &lookup.path_item, &operation, &lookup.bindings, &lookup.template)
    }

    pub fn validate_path_params_with_path_item(
        &self,
        request: &impl Request,
        path_item: &PathItem,
        operation: &Operation,
        bindings: &std::collections::HashMap<String, String>,
        spec_path: &str,
    ) -> Vec<ValidationError> {
        let merged = params_for(path_item, operation);
        let params = params_in(&merged, crate::model::ParameterLocation::Path);
        path_validator::validate_path_params(&params, bindings, &self.engine)
            .into_iter()
            .map(|ty| self.adorn(ty, request, spec_path))
            .collect()
    }

    /// Performs the path lookup itself, then validates the request's query
    /// parameters against the matched operation. See
    /// [`Self::validate_path_params`] for why a caller juggling several
    /// locations should prefer the `_with_path_item` twin instead.
    pub fn validate_query_params(&self, request: &impl Request) -> Vec<ValidationError> {
        let (lookup, operation) = match self.find_operation(request) {
            Ok(v) => v,
            Err(e) => return vec![e],
        };
        self.validate_query_params_with_path_item(request, &lookup.path_item, &operation, &lookup.template)
    }

    pub fn validate_query_params_with_path_item(
        &self,
        request: &impl Request,
        path_item: &PathItem,
        operation: &Operation,
        spec_path: &str,
    ) -> Vec<ValidationError> {
        let merged = params_for(path_item, operation);
        let params = params_in(&merged, crate::model::ParameterLocation::Query);
        query::validate_query_params(&params, request.query_ref(), &self.engine, self.options.strict_mode)
            .into_iter()
            .map(|ty| self.adorn(ty, request, spec_path))
            .collect()
    }

    /// Performs the path lookup itself, then validates the request's header
    /// parameters against the matched operation.
    pub fn validate_header_params(&self, request: &impl Request) -> Vec<ValidationError> {
        let (lookup, operation) = match self.find_operation(request) {
            Ok(v) => v,
            Err(e) => return vec![e],
        };
        self.validate_header_params_with_path_item(request, &lookup.path_item, &operation, &lookup.template)
    }

    pub fn validate_header_params_with_path_item(
        &self,
        request: &impl Request,
        path_item: &PathItem,
        operation: &Operation,
        spec_path: &str,
    ) -> Vec<ValidationError> {
        let merged = params_for(path_item, operation);
        let params = params_in(&merged, crate::model::ParameterLocation::Header);
        header::validate_header_params(
            &params,
            request.headers_ref(),
            &self.engine,
            self.options.strict_mode,
            &self.spec.components.security_schemes,
        )
        .into_iter()
        .map(|ty| self.adorn(ty, request, spec_path))
        .collect()
    }

    /// Performs the path lookup itself, then validates the request's cookie
    /// parameters against the matched operation.
    pub fn validate_cookie_params(&self, request: &impl Request) -> Vec<ValidationError> {
        let (lookup, operation) = match self.find_operation(request) {
            Ok(v) => v,
            Err(e) => return vec![e],
        };
        self.validate_cookie_params_with_path_item(request, &lookup.path_item, &operation, &lookup.template)
    }

    pub fn validate_cookie_params_with_path_item(
        &self,
        request: &impl Request,
        path_item: &PathItem,
        operation: &Operation,
        spec_path: &str,
    ) -> Vec<ValidationError> {
        let merged = params_for(path_item, operation);
        let params = params_in(&merged, crate::model::ParameterLocation::Cookie);
        let cookies = request.cookies();
        cookie::validate_cookie_params(&params, &cookies, &self.engine)
            .into_iter()
            .map(|ty| self.adorn(ty, request, spec_path))
            .collect()
    }

    /// Performs the path lookup itself, then validates the request against
    /// the matched operation's effective security requirements.
    pub fn validate_security(&self, request: &impl Request) -> Vec<ValidationError> {
        let (lookup, operation) = match self.find_operation(request) {
            Ok(v) => v,
            Err(e) => return vec![e],
        };
        self.validate_security_with_path_item(request, &operation, &lookup.template)
    }

    pub fn validate_security_with_path_item(&self, request: &impl Request, operation: &Operation, spec_path: &str) -> Vec<ValidationError> {
        if !self.options.security_validation {
            return Vec::new();
        }
        security::validate_security(operation.security.as_ref(), &self.spec.security, &self.spec.components.security_schemes, request)
            .into_iter()
            .map(|ty| self.adorn(ty, request, spec_path))
            .collect()
    }

    fn adorn(&self, ty: ValidationErrorType, request: &impl Request, spec_path: &str) -> ValidationError {
        ValidationError::adorn(ty, request.method_ref().as_str(), request.path_ref(), spec_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FakeRequest {
        method: http::Method,
        path: String,
        headers: http::HeaderMap,
        query: Option<String>,
    }

    impl Request for FakeRequest {
        fn method_ref(&self) -> &http::Method {
            &self.method
        }
        fn path_ref(&self) -> &str {
            &self.path
        }
        fn headers_ref(&self) -> &http::HeaderMap {
            &self.headers
        }
        fn query_ref(&self) -> Option<&str> {
            self.query.as_deref()
        }
    }

    fn burger_spec() -> Value {
        json!({
            "openapi": "3.0.3",
            "paths": {
                "/burgers/{id}": {
                    "get": {
                        "parameters": [
                            {"name": "id", "in": "path", "schema": {"type": "integer"}},
                            {"name": "bash", "in": "header", "required": true, "schema": {"type": "string"}},
                            {
                                "name": "PattyPreference",
                                "in": "cookie",
                                "schema": {"type": "number"}
                            }
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn finds_operation_for_known_path_and_method() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/42".to_string(),
            headers: http::HeaderMap::new(),
            query: None,
        };
        let (lookup, _operation) = validator.find_operation(&req).unwrap();
        assert_eq!(lookup.template, "/burgers/{id}");
    }

    #[test]
    fn unknown_method_on_known_path_is_path_not_found() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let req = FakeRequest {
            method: http::Method::POST,
            path: "/burgers/42".to_string(),
            headers: http::HeaderMap::new(),
            query: None,
        };
        let err = validator.find_operation(&req).unwrap_err();
        assert_eq!(err.validation_type, "path");
    }

    #[test]
    fn missing_required_header_reports_header_missing_message() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/42".to_string(),
            headers: http::HeaderMap::new(),
            query: None,
        };
        let errors = validator.validate_header_params(&req);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Header parameter 'bash' is missing");
    }

    #[test]
    fn non_numeric_cookie_reports_invalid_parameter_type() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let mut headers = http::HeaderMap::new();
        headers.insert("cookie", "PattyPreference=false".parse().unwrap());
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/42".to_string(),
            headers,
            query: None,
        };
        let errors = validator.validate_cookie_params(&req);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].how_to_fix, "Convert the value 'false' into a number");
    }

    #[test]
    fn well_formed_path_param_passes() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/42".to_string(),
            headers: http::HeaderMap::new(),
            query: None,
        };
        let errors = validator.validate_path_params(&req);
        assert!(errors.is_empty());
    }

    #[test]
    fn with_path_item_variant_reuses_a_caller_supplied_lookup() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/42".to_string(),
            headers: http::HeaderMap::new(),
            query: None,
        };
        let (lookup, operation) = validator.find_operation(&req).unwrap();
        let errors = validator.validate_header_params_with_path_item(&req, &lookup.path_item, &operation, &lookup.template);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn find_path_is_usable_standalone() {
        let validator = ParameterValidator::builder(burger_spec()).build().unwrap();
        let req = FakeRequest {
            method: http::Method::GET,
            path: "/burgers/42".to_string(),
            headers: http::HeaderMap::new(),
            query: None,
        };
        let result = crate::path::find_path(&req, &validator.spec, &validator.radix, None);
        assert!(result.is_ok());
    }
}
