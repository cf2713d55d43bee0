//! Conversion of raw parameter strings into typed JSON values, driven by a
//! schema's declared `type`. Every parameter value arrives as a string; this
//! module is the single place where that string is promoted to the shape the
//! schema engine expects.

use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum OpenApiPrimitives {
    Null,
    Bool,
    Integer,
    Array,
    Number,
    String,
    Object,
}

impl Display for OpenApiPrimitives {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenApiPrimitives::Null => write!(f, "null"),
            OpenApiPrimitives::Bool => write!(f, "boolean"),
            OpenApiPrimitives::Integer => write!(f, "integer"),
            OpenApiPrimitives::Array => write!(f, "array"),
            OpenApiPrimitives::Number => write!(f, "number"),
            OpenApiPrimitives::String => write!(f, "string"),
            OpenApiPrimitives::Object => write!(f, "object"),
        }
    }
}

impl FromStr for OpenApiPrimitives {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(OpenApiPrimitives::Null),
            "boolean" => Ok(OpenApiPrimitives::Bool),
            "integer" => Ok(OpenApiPrimitives::Integer),
            "number" => Ok(OpenApiPrimitives::Number),
            "string" => Ok(OpenApiPrimitives::String),
            "array" => Ok(OpenApiPrimitives::Array),
            "object" => Ok(OpenApiPrimitives::Object),
            other => Err(PrimitiveError::invalid_schema_error(format!(
                "unrecognized schema type '{other}'"
            ))),
        }
    }
}

impl OpenApiPrimitives {
    pub fn get_type_from_schema(schema: &Value) -> Option<OpenApiPrimitives> {
        let type_field = schema.get("type")?.as_str()?;
        OpenApiPrimitives::from_str(type_field).ok()
    }

    /// Converts `input` to the JSON value `schema.type` describes.
    ///
    /// Integers reject a fractional component (`"1.5"` against `type:
    /// integer` is an error, not a truncated match), unlike a float64-style
    /// parse.
    pub fn convert_string_to_schema_type(schema: &Value, input: &str) -> Result<Value, PrimitiveError> {
        let type_field = schema
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PrimitiveError::invalid_schema_error("schema has no 'type' field"))?;
        let primitive = OpenApiPrimitives::from_str(type_field)?;
        primitive.convert_value_to_type(input)
    }

    pub fn convert_value_to_type(&self, input: &str) -> Result<Value, PrimitiveError> {
        match self {
            OpenApiPrimitives::Null => Ok(Value::Null),
            OpenApiPrimitives::Bool => Self::convert_bool(input),
            OpenApiPrimitives::Integer => Self::convert_integer(input),
            OpenApiPrimitives::Number => Self::convert_number(input),
            OpenApiPrimitives::String => Ok(json!(input)),
            other => Err(PrimitiveError::invalid_primitive_type(format!(
                "'{other}' cannot be converted from a scalar string; decode it as a sequence or map first"
            ))),
        }
    }

    fn convert_bool(input: &str) -> Result<Value, PrimitiveError> {
        match input {
            "true" => Ok(json!(true)),
            "false" => Ok(json!(false)),
            _ => Err(PrimitiveError::conversion_error(format!(
                "could not convert '{input}' into a boolean"
            ))),
        }
    }

    fn convert_integer(input: &str) -> Result<Value, PrimitiveError> {
        if input.contains('.') {
            return Err(PrimitiveError::conversion_error(format!(
                "could not convert '{input}' into an integer; value has a fractional component"
            )));
        }
        match input.parse::<i64>() {
            Ok(v) => Ok(json!(v)),
            Err(_) => Err(PrimitiveError::conversion_error(format!(
                "could not convert '{input}' into an integer"
            ))),
        }
    }

    fn convert_number(input: &str) -> Result<Value, PrimitiveError> {
        match input.parse::<f64>() {
            Ok(v) => Ok(json!(v)),
            Err(_) => Err(PrimitiveError::conversion_error(format!(
                "could not convert '{input}' into a number"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PrimitiveError {
    ConversionError(String),
    InvalidSchemaError(String),
    InvalidPrimitiveType(String),
}

impl PrimitiveError {
    pub fn conversion_error(msg: impl Into<String>) -> Self {
        PrimitiveError::ConversionError(msg.into())
    }

    pub fn invalid_schema_error(msg: impl Into<String>) -> Self {
        PrimitiveError::InvalidSchemaError(msg.into())
    }

    pub fn invalid_primitive_type(msg: impl Into<String>) -> Self {
        PrimitiveError::InvalidPrimitiveType(msg.into())
    }
}

impl Display for PrimitiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveError::ConversionError(msg) => write!(f, "conversion error: {msg}"),
            PrimitiveError::InvalidSchemaError(msg) => write!(f, "invalid schema: {msg}"),
            PrimitiveError::InvalidPrimitiveType(msg) => write!(f, "invalid primitive type: {msg}"),
        }
    }
}

impl std::error::Error for PrimitiveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_rejects_fraction() {
        let schema = json!({"type": "integer"});
        let err = OpenApiPrimitives::convert_string_to_schema_type(&schema, "1.5").unwrap_err();
        assert!(matches!(err, PrimitiveError::ConversionError(_)));
    }

    #[test]
    fn integer_accepts_whole_number() {
        let schema = json!({"type": "integer"});
        let v = OpenApiPrimitives::convert_string_to_schema_type(&schema, "42").unwrap();
        assert_eq!(v, json!(42));
    }

    #[test]
    fn number_accepts_fraction() {
        let schema = json!({"type": "number"});
        let v = OpenApiPrimitives::convert_string_to_schema_type(&schema, "1.5").unwrap();
        assert_eq!(v, json!(1.5));
    }

    #[test]
    fn boolean_only_accepts_literal_strings() {
        let schema = json!({"type": "boolean"});
        assert!(OpenApiPrimitives::convert_string_to_schema_type(&schema, "true").is_ok());
        assert!(OpenApiPrimitives::convert_string_to_schema_type(&schema, "yes").is_err());
    }

    #[test]
    fn missing_type_field_is_an_error() {
        let schema = json!({});
        assert!(OpenApiPrimitives::convert_string_to_schema_type(&schema, "x").is_err());
    }

    #[test]
    fn unknown_type_is_an_error() {
        let schema = json!({"type": "banana"});
        assert!(OpenApiPrimitives::convert_string_to_schema_type(&schema, "x").is_err());
    }

    #[test]
    fn array_and_object_are_not_scalar_convertible() {
        assert!(OpenApiPrimitives::Array.convert_value_to_type("1,2").is_err());
        assert!(OpenApiPrimitives::Object.convert_value_to_type("a,1").is_err());
    }
}
