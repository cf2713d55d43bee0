//! Path parameter validation: every path parameter is implicitly required,
//! so a missing binding is always an error regardless of the parameter's
//! declared `required` flag. Values arrive pre-extracted as raw strings from
//! [`crate::path::find_path`]; this module strips any remaining style
//! marker, decodes arrays/objects, type-converts scalars, and hands the
//! result to the schema engine.

use crate::encoding::{csv_to_kv_map, explode, kv_csv_to_map};
use crate::error::{Section, ValidationErrorType};
use crate::model::{Parameter, ParameterStyle};
use crate::primitive::OpenApiPrimitives;
use crate::schema::{to_validation_error, SchemaEngine};
use std::collections::HashMap;

pub fn validate_path_params(
    params: &[&Parameter],
    bindings: &HashMap<String, String>,
    engine: &SchemaEngine,
) -> Vec<ValidationErrorType> {
    let mut errors = Vec::new();

    for param in params {
        let Some(raw) = bindings.get(&param.name) else {
            errors.push(ValidationErrorType::ParameterMissing { name: param.name.clone(), section: Section::Path });
            continue;
        };

        let Some((schema, _media)) = param.effective_schema() else {
            continue;
        };

        let primitive = OpenApiPrimitives::get_type_from_schema(schema);
        let style = param.effective_style();
        let explode_flag = param.effective_explode();

        let instance = match primitive {
            Some(OpenApiPrimitives::Array) => match decode_array(raw, style, explode_flag, &param.name) {
                Some(items) => match convert_array_items(&items, schema) {
                    Ok(v) => v,
                    Err(_) => {
                        errors.push(ValidationErrorType::ParameterCannotBeDecoded {
                            name: param.name.clone(),
                            section: Section::Path,
                        });
                        continue;
                    }
                },
                None => {
                    errors.push(ValidationErrorType::ParameterCannotBeDecoded {
                        name: param.name.clone(),
                        section: Section::Path,
                    });
                    continue;
                }
            },
            Some(OpenApiPrimitives::Object) => match decode_object(raw, style, explode_flag) {
                Some(map) => {
                    serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, serde_json::Value::String(v))).collect())
                }
                None => {
                    errors.push(ValidationErrorType::ParameterCannotBeDecoded {
                        name: param.name.clone(),
                        section: Section::Path,
                    });
                    continue;
                }
            },
            _ => {
                let scalar_raw = strip_scalar_marker(raw, style);
                match OpenApiPrimitives::convert_string_to_schema_type(schema, scalar_raw) {
                    Ok(v) => v,
                    Err(_) => {
                        let expected = primitive.unwrap_or(OpenApiPrimitives::String);
                        errors.push(ValidationErrorType::InvalidParameterType {
                            name: param.name.clone(),
                            expected,
                            raw: scalar_raw.to_string(),
                            section: Section::Path,
                        });
                        continue;
                    }
                }
            }
        };

        if let Some(enum_values) = schema.get("enum").and_then(|v| v.as_array()) {
            if let Some(actual) = instance.as_str() {
                let allowed: Vec<String> = enum_values.iter().filter_map(|v| v.as_str().map(str::to_owned)).collect();
                if !allowed.iter().any(|a| a == actual) {
                    errors.push(ValidationErrorType::EnumMismatch {
                        name: param.name.clone(),
                        allowed,
                        value: actual.to_string(),
                        section: Section::Path,
                    });
                    continue;
                }
            }
        }

        if let Err(failures) = engine.validate_inline(schema, &instance) {
            errors.push(to_validation_error(&param.name, Section::Path, failures));
        }
    }

    errors
}

/// Strips a `label`/`matrix` style marker from a scalar value. Radix-matched
/// paths never carry a marker (the style is implicitly `simple`); only
/// regex-fallback-matched templates can produce one.
fn strip_scalar_marker(raw: &str, style: ParameterStyle) -> &str {
    match style {
        ParameterStyle::Label => raw.strip_prefix('.').unwrap_or(raw),
        ParameterStyle::Matrix => {
            if let Some(rest) = raw.strip_prefix(';') {
                if let Some(eq) = rest.find('=') {
                    return &rest[eq + 1..];
                }
            }
            raw
        }
        _ => raw,
    }
}

/// Converts each decoded array member to the type `items` declares, if any.
/// Members that fail conversion fall back to their raw string form and let
/// the schema engine report the mismatch, except when no `items` schema is
/// present at all, in which case strings are the only sensible instance.
fn convert_array_items(items: &[String], schema: &serde_json::Value) -> Result<serde_json::Value, ()> {
    let Some(items_schema) = schema.get("items") else {
        return Ok(serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect()));
    };
    let converted: Vec<serde_json::Value> = items
        .iter()
        .map(|raw| OpenApiPrimitives::convert_string_to_schema_type(items_schema, raw).unwrap_or_else(|_| serde_json::Value::String(raw.clone())))
        .collect();
    Ok(serde_json::Value::Array(converted))
}

fn decode_array(raw: &str, style: ParameterStyle, explode_flag: bool, param_name: &str) -> Option<Vec<String>> {
    let items = explode(raw, style, explode_flag);
    if items.is_empty() {
        return None;
    }
    if style == ParameterStyle::Matrix && explode_flag {
        let prefix = format!("{param_name}=");
        return Some(items.iter().map(|t| t.strip_prefix(prefix.as_str()).unwrap_or(t).to_string()).collect());
    }
    Some(items)
}

fn decode_object(raw: &str, style: ParameterStyle, explode_flag: bool) -> Option<HashMap<String, String>> {
    match style {
        ParameterStyle::Matrix => {
            let body = raw.strip_prefix(';').unwrap_or(raw);
            let map = if explode_flag { kv_csv_to_map(body, ';') } else { csv_to_kv_map(body) };
            if map.is_empty() {
                None
            } else {
                Some(map)
            }
        }
        ParameterStyle::Label => {
            let body = raw.strip_prefix('.').unwrap_or(raw);
            let map = if explode_flag { kv_csv_to_map(body, '.') } else { csv_to_kv_map(body) };
            if map.is_empty() {
                None
            } else {
                Some(map)
            }
        }
        _ => {
            let map = csv_to_kv_map(raw);
            if map.is_empty() {
                None
            } else {
                Some(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Spec;
    use serde_json::json;

    fn engine_with(spec_value: serde_json::Value) -> (SchemaEngine, Spec) {
        let spec: Spec = serde_json::from_value(spec_value.clone()).unwrap();
        let engine = SchemaEngine::new(&spec, spec_value, false).unwrap();
        (engine, spec)
    }

    fn param(value: serde_json::Value) -> Parameter {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_path_binding_is_always_an_error() {
        let (engine, _) = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "id", "in": "path", "schema": {"type": "string"}}));
        let errors = validate_path_params(&[&p], &HashMap::new(), &engine);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationErrorType::ParameterMissing { .. }));
    }

    #[test]
    fn integer_path_param_rejects_fraction() {
        let (engine, _) = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "id", "in": "path", "schema": {"type": "integer"}}));
        let mut bindings = HashMap::new();
        bindings.insert("id".to_string(), "1.5".to_string());
        let errors = validate_path_params(&[&p], &bindings, &engine);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationErrorType::InvalidParameterType { .. }));
    }

    #[test]
    fn enum_mismatch_is_reported_distinctly() {
        let (engine, _) = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({
            "name": "burger",
            "in": "path",
            "schema": {"type": "string", "enum": ["beef", "veggie"]}
        }));
        let mut bindings = HashMap::new();
        bindings.insert("burger".to_string(), "fish".to_string());
        let errors = validate_path_params(&[&p], &bindings, &engine);
        assert!(matches!(errors[0], ValidationErrorType::EnumMismatch { .. }));
    }

    #[test]
    fn simple_style_array_is_comma_split() {
        let (engine, _) = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({
            "name": "ids",
            "in": "path",
            "schema": {"type": "array", "items": {"type": "integer"}}
        }));
        let mut bindings = HashMap::new();
        bindings.insert("ids".to_string(), "1,2,3".to_string());
        let errors = validate_path_params(&[&p], &bindings, &engine);
        assert!(errors.is_empty());
    }

    #[test]
    fn matrix_exploded_array_strips_repeated_key() {
        let (engine, _) = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({
            "name": "burger",
            "in": "path",
            "style": "matrix",
            "explode": true,
            "schema": {"type": "array", "items": {"type": "string"}}
        }));
        let mut bindings = HashMap::new();
        bindings.insert("burger".to_string(), ";burger=beef;burger=veggie".to_string());
        let errors = validate_path_params(&[&p], &bindings, &engine);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn valid_scalar_passes() {
        let (engine, _) = engine_with(json!({"openapi": "3.0.3", "paths": {}}));
        let p = param(json!({"name": "id", "in": "path", "schema": {"type": "integer"}}));
        let mut bindings = HashMap::new();
        bindings.insert("id".to_string(), "42".to_string());
        let errors = validate_path_params(&[&p], &bindings, &engine);
        assert!(errors.is_empty());
    }
}
