//! Header parameter validation. Header names are matched case-insensitively
//! via [`http::HeaderMap`]; only `simple` style applies to headers per the
//! specification (`label`/`matrix`/`deepObject` aren't meaningful here).

use crate::encoding::csv_to_kv_map;
use crate::error::{Section, ValidationErrorType};
use crate::model::{ApiKeyLocation, Parameter, SecurityScheme, SecuritySchemeType};
use crate::primitive::OpenApiPrimitives;
use crate::schema::{to_validation_error, SchemaEngine};
use http::HeaderMap;
use indexmap::IndexMap;

/// Transport-level headers that are never subject to "undeclared parameter"
/// reporting in strict mode, since they aren't part of the API contract.
const TRANSPORT_HEADERS: &[&str] = &[
    "host",
    "content-length",
    "content-type",
    "connection",
    "accept",
    "accept-encoding",
    "user-agent",
    "cookie",
    "authorization",
];

pub fn validate_header_params(
    params: &[&Parameter],
    headers: &HeaderMap,
    engine: &SchemaEngine,
    strict_mode: bool,
    security_schemes: &IndexMap<String, SecurityScheme>,
) -> Vec<ValidationErrorType> {
    let mut errors = Vec::new();

    if strict_mode {
        let declared: Vec<String> = params.iter().map(|p| p.name.to_ascii_lowercase()).collect();
        let security_header_names: Vec<String> = security_schemes
            .values()
            .filter(|s| s.scheme_type == SecuritySchemeType::ApiKey && s.location == Some(ApiKeyLocation::Header))
            .filter_map(|s| s.name.as_ref().map(|n| n.to_ascii_lowercase()))
            .collect();
        for name in headers.keys() {
            let lower = name.as_str().to_ascii_lowercase();
            if !declared.contains(&lower)
                && !TRANSPORT_HEADERS.contains(&lower.as_str())
                && !security_header_names.contains(&lower)
            {
                errors.push(ValidationErrorType::UndeclaredParameter { name: name.to_string(), section: Section::Header });
            }
        }
    }

    for param in params {
        let raw = match headers.get(&param.name) {
            Some(v) => match v.to_str() {
                Ok(s) => s,
                Err(_) => {
                    errors.push(ValidationErrorType::ParameterCannotBeDecoded {
                        name: param.name.clone(),
                        section: Section::Header,
                    });
                    continue;
                }
            },
            None => {
                if param.is_required() {
                    errors.push(ValidationErrorType::ParameterMissing { name: param.name.clone(), section: Section::Header });
                }
                continue;
            }
        };

        let Some((schema, _media)) = param.effective_schema() else {
            continue;
        };
        let primitive = OpenApiPrimitives::get_type_from_schema(schema);

        let instance = match primitive {
            Some(OpenApiPrimitives::Array) => {
                let items: Vec<String> = raw.split(',').map(str::to_owned).collect();
                build_array(&items, schema)
            }
            Some(OpenApiPrimitives::Object) => match csv_to_kv_map(raw) {
                map if !map.is_empty() => {
                    serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, serde_json::Value::String(v))).collect())
                }
                _ => {
                    errors.push(ValidationErrorType::ParameterCannotBeDecoded {
                        name: param.name.clone(),
                        section: Section::Header,
                    });
                    continue;
                }
            },
            _ => match OpenApiPrimitives::convert_string_to_schema_type(schema, raw) {
                Ok(v) => v,
                Err(_) => {
                    let expected = primitive.unwrap_or(OpenApiPrimitives::String);
                    errors.push(ValidationErrorType::InvalidParameterType {
                        name: param.name.clone(),
                        expected,
                        raw: raw.to_string(),
                        section: Section::Header,
                    });
                    continue;
                }
            },
        };

        if let Some(enum_values) = schema.get("enum").and_then(|v| v.as_array()) {
            if let Some(actual) = instance.as_str() {
                let allowed: Vec<String> = enum_values.iter().filter_map(|v| v.as_str().map(str::to_owned)).collect();
                if !allowed.iter().any(|a| a == actual) {
                    errors.push(ValidationErrorType::EnumMismatch {
                        name: param.name.clone(),
                        allowed,
                        value: actual.to_string(),
                        section: Section::Header,
                    });
                    continue;
                }
            }
        }

        if let Err(failures) = engine.validate_inline(schema, &instance) {
            errors.push(to_validation_error(&param.name, Section::Header, failures));
        }
    }

    errors
}

fn build_array(items: &[String], schema: &serde_json::Value) -> serde_json::Value {
    let Some(items_schema) = schema.get("items") else {
        return serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect());
    };
    serde_json::Value::Array(
        items
            .iter()
            .map(|raw| OpenApiPrimitives::convert_string_to_schema_type(items_schema, raw).unwrap_or_else(|_| serde_json::Value::String(raw.clone())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Spec;
    use serde_json::json;

    fn engine_with(spec_value: serde_json::Value) -> SchemaEngine {
        let spec: Spec = serde_json::from_value(spec_value.clone()).unwrap();
        SchemaEngine::new(&spec, spec_value, false).unwrap()
    }

    fn param(value: serde_json::Value) -> Parameter {
        serde_json::from_value(value).unwrap()
    }

    fn no_schemes() -> IndexMap<String, SecurityScheme> {
        IndexMap::new()
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let engine = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "X-Trace-Id", "in": "header", "required": true, "schema": {"type": "string"}}));
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "abc123".parse().unwrap());
        let errors = validate_header_params(&[&p], &headers, &engine, false, &no_schemes());
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_required_header_is_reported() {
        let engine = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "bash", "in": "header", "required": true, "schema": {"type": "string"}}));
        let errors = validate_header_params(&[&p], &HeaderMap::new(), &engine, false, &no_schemes());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationErrorType::ParameterMissing { .. }));
    }

    #[test]
    fn strict_mode_ignores_transport_headers() {
        let engine = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "X-Trace-Id", "in": "header", "schema": {"type": "string"}}));
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-trace-id", "abc".parse().unwrap());
        let errors = validate_header_params(&[&p], &headers, &engine, true, &no_schemes());
        assert!(!errors.iter().any(|e| matches!(e, ValidationErrorType::UndeclaredParameter { .. })));
    }

    #[test]
    fn strict_mode_flags_unknown_application_header() {
        let engine = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p: Parameter = param(json!({"name": "X-Trace-Id", "in": "header", "schema": {"type": "string"}}));
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "abc".parse().unwrap());
        headers.insert("x-unexpected", "1".parse().unwrap());
        let errors = validate_header_params(&[&p], &headers, &engine, true, &no_schemes());
        assert!(errors.iter().any(|e| matches!(e, ValidationErrorType::UndeclaredParameter { .. })));
    }

    #[test]
    fn strict_mode_ignores_apikey_header_scheme() {
        let engine = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "X-Trace-Id", "in": "header", "schema": {"type": "string"}}));
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "abc".parse().unwrap());
        headers.insert("x-api-key", "secret".parse().unwrap());
        let mut schemes = IndexMap::new();
        schemes.insert(
            "apiKeyAuth".to_string(),
            SecurityScheme {
                scheme_type: SecuritySchemeType::ApiKey,
                name: Some("x-api-key".to_string()),
                location: Some(ApiKeyLocation::Header),
                scheme: None,
            },
        );
        let errors = validate_header_params(&[&p], &headers, &engine, true, &schemes);
        assert!(!errors.iter().any(|e| matches!(e, ValidationErrorType::UndeclaredParameter { .. })));
    }
}
