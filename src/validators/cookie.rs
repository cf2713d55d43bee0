//! Cookie parameter validation. Cookie names are matched case-sensitively
//! (unlike headers); object and array cookies are only ever sent
//! non-exploded, since a cookie jar has no concept of repeated keys.

use crate::encoding::csv_to_kv_map;
use crate::error::{Section, ValidationErrorType};
use crate::model::Parameter;
use crate::primitive::OpenApiPrimitives;
use crate::schema::{to_validation_error, SchemaEngine};
use std::collections::HashMap;

pub fn validate_cookie_params(
    params: &[&Parameter],
    cookies: &HashMap<String, String>,
    engine: &SchemaEngine,
) -> Vec<ValidationErrorType> {
    let mut errors = Vec::new();

    for param in params {
        let raw = match cookies.get(&param.name) {
            Some(v) => v.as_str(),
            None => {
                if param.is_required() {
                    errors.push(ValidationErrorType::ParameterMissing { name: param.name.clone(), section: Section::Cookie });
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
                        section: Section::Cookie,
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
                        section: Section::Cookie,
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
                        section: Section::Cookie,
                    });
                    continue;
                }
            }
        }

        if let Err(failures) = engine.validate_inline(schema, &instance) {
            errors.push(to_validation_error(&param.name, Section::Cookie, failures));
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
