//! Query parameter validation: the raw query string is split into raw
//! (still percent-encoded) `key=value` pairs once, then grouped per
//! declared parameter according to its `style`/`explode`. Reserved-character
//! checks run against the undecoded form, since that's the only place an
//! unescaped reserved character is observable.

use crate::encoding::{contains_style_delimiter, deep_object_to_map, explode};
use crate::error::{Section, ValidationErrorType};
use crate::model::{Parameter, ParameterStyle};
use crate::primitive::OpenApiPrimitives;
use crate::schema::{to_validation_error, SchemaEngine};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

const RESERVED_CHARS: &str = ":/?#[]@!$&'()*+,;=";

/// One raw `(key, value)` pair exactly as it appeared in the query string,
/// still percent-encoded.
pub fn split_raw_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| pair.split_once('=').map(|(k, v)| (k.to_string(), v.to_string())))
        .collect()
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

pub fn validate_query_params(
    params: &[&Parameter],
    query: Option<&str>,
    engine: &SchemaEngine,
    strict_mode: bool,
) -> Vec<ValidationErrorType> {
    let mut errors = Vec::new();
    let raw_pairs = split_raw_pairs(query.unwrap_or(""));

    if strict_mode {
        let declared: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        for (key, _) in &raw_pairs {
            let base = key.split('[').next().unwrap_or(key);
            if !declared.contains(&base) {
                errors.push(ValidationErrorType::UndeclaredParameter { name: key.clone(), section: Section::Query });
            }
        }
    }

    for param in params {
        let style = param.effective_style();
        let explode_flag = param.effective_explode();
        let allow_reserved = param.allow_reserved.unwrap_or(false);

        let matching: Vec<&(String, String)> = raw_pairs.iter().filter(|(k, _)| k == &param.name).collect();

        if style == ParameterStyle::DeepObject {
            let decoded_pairs: Vec<(String, String)> =
                raw_pairs.iter().map(|(k, v)| (decode(k), decode(v))).collect();
            let pair_refs: Vec<(&str, &str)> = decoded_pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let map = deep_object_to_map(pair_refs.into_iter(), &param.name);
            if map.is_empty() {
                if param.is_required() {
                    errors.push(ValidationErrorType::ParameterMissing { name: param.name.clone(), section: Section::Query });
                }
                continue;
            }
            if let Some((schema, _)) = param.effective_schema() {
                let instance =
                    serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, serde_json::Value::String(v))).collect());
                if let Err(failures) = engine.validate_inline(schema, &instance) {
                    errors.push(to_validation_error(&param.name, Section::Query, failures));
                }
            }
            continue;
        }

        if matching.is_empty() {
            if style == ParameterStyle::Form {
                if let Some((schema, _)) = param.effective_schema() {
                    if OpenApiPrimitives::get_type_from_schema(schema) == Some(OpenApiPrimitives::Object) {
                        if let Some(reconstructed) = reconstruct_object_from_top_level_keys(&raw_pairs, schema) {
                            if let Err(failures) = engine.validate_inline(schema, &reconstructed) {
                                errors.push(to_validation_error(&param.name, Section::Query, failures));
                            }
                            continue;
                        }
                    }
                }
            }
            if param.is_required() {
                errors.push(ValidationErrorType::ParameterMissing { name: param.name.clone(), section: Section::Query });
            }
            continue;
        }

        let Some((schema, media)) = param.effective_schema() else {
            continue;
        };
        let primitive = OpenApiPrimitives::get_type_from_schema(schema);

        if !allow_reserved && explode_flag {
            for (_, raw_value) in &matching {
                if raw_value.chars().any(|c| RESERVED_CHARS.contains(c)) {
                    errors.push(ValidationErrorType::IncorrectReservedValues {
                        name: param.name.clone(),
                        value: decode(raw_value),
                    });
                }
            }
        }

        if media.is_some() {
            let decoded = decode(&matching[0].1);
            match serde_json::from_str::<serde_json::Value>(&decoded) {
                Ok(v) => {
                    if let Err(failures) = engine.validate_inline(schema, &v) {
                        errors.push(to_validation_error(&param.name, Section::Query, failures));
                    }
                }
                Err(e) => {
                    errors.push(ValidationErrorType::InvalidJsonEncoding { name: param.name.clone(), reason: e.to_string() });
                }
            }
            continue;
        }

        let instance = match primitive {
            Some(OpenApiPrimitives::Array) => {
                if explode_flag {
                    if matching.len() == 1 && contains_style_delimiter(&matching[0].1, style) {
                        errors.push(ValidationErrorType::IncorrectFormEncoding { name: param.name.clone() });
                    }
                    let items: Vec<String> = matching.iter().map(|(_, v)| decode(v)).collect();
                    build_array(&items, schema)
                } else {
                    if matching.len() != 1 {
                        let err = match style {
                            ParameterStyle::PipeDelimited => {
                                ValidationErrorType::IncorrectPipeDelimiting { name: param.name.clone() }
                            }
                            ParameterStyle::SpaceDelimited => {
                                ValidationErrorType::IncorrectSpaceDelimiting { name: param.name.clone() }
                            }
                            _ => ValidationErrorType::ParameterCannotBeDecoded {
                                name: param.name.clone(),
                                section: Section::Query,
                            },
                        };
                        errors.push(err);
                        continue;
                    }
                    let decoded = decode(&matching[0].1);
                    let items = explode(&decoded, style, false);
                    build_array(&items, schema)
                }
            }
            Some(OpenApiPrimitives::Object) => {
                let decoded = decode(&matching[0].1);
                match crate::encoding::csv_to_kv_map(&decoded) {
                    map if !map.is_empty() => {
                        serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, serde_json::Value::String(v))).collect())
                    }
                    _ => {
                        errors.push(ValidationErrorType::ParameterCannotBeDecoded {
                            name: param.name.clone(),
                            section: Section::Query,
                        });
                        continue;
                    }
                }
            }
            _ => {
                let decoded = decode(&matching[0].1);
                match OpenApiPrimitives::convert_string_to_schema_type(schema, &decoded) {
                    Ok(v) => v,
                    Err(_) => {
                        let expected = primitive.unwrap_or(OpenApiPrimitives::String);
                        errors.push(ValidationErrorType::InvalidParameterType {
                            name: param.name.clone(),
                            expected,
                            raw: decoded,
                            section: Section::Query,
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
                        section: Section::Query,
                    });
                    continue;
                }
            }
        }

        if let Err(failures) = engine.validate_inline(schema, &instance) {
            errors.push(to_validation_error(&param.name, Section::Query, failures));
        }
    }

    errors
}

/// Attempts to decode an entirely-absent object query parameter from
/// top-level query keys matching its declared properties (e.g.
/// `?vinegar=true&chips=12` for a schema with `vinegar`/`chips` properties).
/// Returns `None` if no declared property key was present.
fn reconstruct_object_from_top_level_keys(raw_pairs: &[(String, String)], schema: &serde_json::Value) -> Option<serde_json::Value> {
    let properties = schema.get("properties").and_then(|v| v.as_object())?;
    let mut reconstructed = serde_json::Map::new();
    for (key, raw_value) in raw_pairs {
        if let Some(prop_schema) = properties.get(key) {
            let decoded = decode(raw_value);
            let value =
                OpenApiPrimitives::convert_string_to_schema_type(prop_schema, &decoded).unwrap_or(serde_json::Value::String(decoded));
            reconstructed.insert(key.clone(), value);
        }
    }
    if reconstructed.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(reconstructed))
    }
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
