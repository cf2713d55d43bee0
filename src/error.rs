//! Error taxonomy for request validation.
//!
//! [`ValidationErrorType`] is the internal, `Section`-qualified enum that
//! every component in this crate returns. [`ValidationError`] is the public,
//! serializable envelope built from it once request context (method, path,
//! matched spec path) is known. Every validator records a failure and keeps
//! going rather than unwinding, so a single request can surface more than
//! one problem.

use crate::primitive::OpenApiPrimitives;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Which part of the request (or specification) an error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Path,
    Query,
    Header,
    Cookie,
    Security,
    Schema,
    Spec,
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Path => write!(f, "path"),
            Section::Query => write!(f, "query"),
            Section::Header => write!(f, "header"),
            Section::Cookie => write!(f, "cookie"),
            Section::Security => write!(f, "security"),
            Section::Schema => write!(f, "schema"),
            Section::Spec => write!(f, "spec"),
        }
    }
}

impl Section {
    /// Capitalized form used at the start of a human-facing message, e.g.
    /// "Header parameter 'bash' is missing".
    fn cap(&self) -> &'static str {
        match self {
            Section::Path => "Path",
            Section::Query => "Query",
            Section::Header => "Header",
            Section::Cookie => "Cookie",
            Section::Security => "Security",
            Section::Schema => "Schema",
            Section::Spec => "Spec",
        }
    }
}

/// One keyword-level failure reported by the schema engine, attached to a
/// parent [`ValidationError`] when schema validation (rather than a
/// structural/decode check) is what failed.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaValidationFailure {
    pub reason: String,
    pub location: String,
    pub reference_schema: serde_json::Value,
}

#[derive(Debug, Clone)]
pub enum ValidationErrorType {
    PathNotFound {
        method: String,
        path: String,
    },
    ParameterMissing {
        name: String,
        section: Section,
    },
    InvalidParameterType {
        name: String,
        expected: OpenApiPrimitives,
        raw: String,
        section: Section,
    },
    ParameterCannotBeDecoded {
        name: String,
        section: Section,
    },
    EnumMismatch {
        name: String,
        allowed: Vec<String>,
        value: String,
        section: Section,
    },
    SchemaValidationFailed {
        name: String,
        section: Section,
        failures: Vec<SchemaValidationFailure>,
    },
    IncorrectReservedValues {
        name: String,
        value: String,
    },
    IncorrectFormEncoding {
        name: String,
    },
    IncorrectPipeDelimiting {
        name: String,
    },
    IncorrectSpaceDelimiting {
        name: String,
    },
    InvalidDeepObject {
        name: String,
    },
    InvalidJsonEncoding {
        name: String,
        reason: String,
    },
    UndeclaredParameter {
        name: String,
        section: Section,
    },
    SecuritySchemeMissing {
        scheme_name: String,
    },
    AuthorizationHeaderMissing,
    AuthorizationSchemeMismatch {
        expected: String,
        found: String,
    },
    ApiKeyMissing {
        name: String,
        section: Section,
    },
    SchemaCompilationFailed {
        reason: String,
    },
}

impl ValidationErrorType {
    pub fn section(&self) -> Section {
        match self {
            ValidationErrorType::PathNotFound { .. } => Section::Path,
            ValidationErrorType::ParameterMissing { section, .. }
            | ValidationErrorType::InvalidParameterType { section, .. }
            | ValidationErrorType::ParameterCannotBeDecoded { section, .. }
            | ValidationErrorType::EnumMismatch { section, .. }
            | ValidationErrorType::SchemaValidationFailed { section, .. }
            | ValidationErrorType::UndeclaredParameter { section, .. }
            | ValidationErrorType::ApiKeyMissing { section, .. } => *section,
            ValidationErrorType::IncorrectReservedValues { .. }
            | ValidationErrorType::IncorrectFormEncoding { .. }
            | ValidationErrorType::IncorrectPipeDelimiting { .. }
            | ValidationErrorType::IncorrectSpaceDelimiting { .. }
            | ValidationErrorType::InvalidDeepObject { .. }
            | ValidationErrorType::InvalidJsonEncoding { .. } => Section::Query,
            ValidationErrorType::SecuritySchemeMissing { .. }
            | ValidationErrorType::AuthorizationHeaderMissing
            | ValidationErrorType::AuthorizationSchemeMismatch { .. } => Section::Security,
            ValidationErrorType::SchemaCompilationFailed { .. } => Section::Schema,
        }
    }

    /// `(validationType, validationSubType)` per the stable JSON envelope.
    pub fn taxonomy(&self) -> (&'static str, &'static str) {
        match self {
            ValidationErrorType::PathNotFound { .. } => ("path", "missing"),
            ValidationErrorType::ParameterMissing { section, .. } => (section_taxonomy(*section), "missing"),
            ValidationErrorType::InvalidParameterType { expected, section, .. } => {
                (section_taxonomy(*section), invalid_type_subtype(*expected))
            }
            ValidationErrorType::ParameterCannotBeDecoded { section, .. } => {
                (section_taxonomy(*section), "cannot-be-decoded")
            }
            ValidationErrorType::EnumMismatch { section, .. } => (section_taxonomy(*section), "enum-mismatch"),
            ValidationErrorType::SchemaValidationFailed { section, .. } => (section_taxonomy(*section), "schema"),
            ValidationErrorType::IncorrectReservedValues { .. } => ("parameter", "incorrect-reserved-values"),
            ValidationErrorType::IncorrectFormEncoding { .. } => ("parameter", "incorrect-form-encoding"),
            ValidationErrorType::IncorrectPipeDelimiting { .. } => ("parameter", "incorrect-pipe-delimiting"),
            ValidationErrorType::IncorrectSpaceDelimiting { .. } => ("parameter", "incorrect-space-delimiting"),
            ValidationErrorType::InvalidDeepObject { .. } => ("parameter", "invalid-deep-object"),
            ValidationErrorType::InvalidJsonEncoding { .. } => ("parameter", "invalid-json"),
            ValidationErrorType::UndeclaredParameter { section, .. } => (section_taxonomy(*section), "undeclared"),
            ValidationErrorType::SecuritySchemeMissing { .. } => ("security", "scheme-missing"),
            ValidationErrorType::AuthorizationHeaderMissing => ("security", "authorization-header-missing"),
            ValidationErrorType::AuthorizationSchemeMismatch { .. } => ("security", "authorization-scheme-mismatch"),
            ValidationErrorType::ApiKeyMissing { section, .. } => (
                "security",
                match section {
                    Section::Header => "apikey-missing-header",
                    Section::Query => "apikey-missing-query",
                    Section::Cookie => "apikey-missing-cookie",
                    _ => "apikey-missing",
                },
            ),
            ValidationErrorType::SchemaCompilationFailed { .. } => ("schema-compilation", "compile-failed"),
        }
    }

    /// The imperative, human-facing remediation hint. Preserves the original
    /// case of offending values (lowercasing it would hide the exact
    /// attacker/client-supplied input from the report).
    pub fn how_to_fix(&self) -> String {
        match self {
            ValidationErrorType::PathNotFound { method, path } => {
                format!("Declare an operation for '{method} {path}', or correct the request path")
            }
            ValidationErrorType::ParameterMissing { name, section } => {
                format!("Provide the required {section} parameter '{name}'")
            }
            ValidationErrorType::InvalidParameterType { expected, raw, .. } => {
                format!("Convert the value '{raw}' into a {expected}")
            }
            ValidationErrorType::ParameterCannotBeDecoded { name, .. } => {
                format!("Re-encode parameter '{name}' using its declared style and explode settings")
            }
            ValidationErrorType::EnumMismatch { name, allowed, value, .. } => {
                format!(
                    "Use one of [{}] instead of '{value}' for parameter '{name}'",
                    allowed.join(", ")
                )
            }
            ValidationErrorType::SchemaValidationFailed { name, .. } => {
                format!("Correct the value supplied for parameter '{name}' to satisfy its schema")
            }
            ValidationErrorType::IncorrectReservedValues { name, value } => {
                format!(
                    "URL-encode the reserved characters in '{value}' for parameter '{name}': {}",
                    percent_encoding::utf8_percent_encode(value, percent_encoding::NON_ALPHANUMERIC)
                )
            }
            ValidationErrorType::IncorrectFormEncoding { name } => {
                format!("Repeat the query key '{name}' once per value instead of comma-joining them")
            }
            ValidationErrorType::IncorrectPipeDelimiting { name } => {
                format!("Supply a single pipe-delimited value for '{name}' instead of repeating the key")
            }
            ValidationErrorType::IncorrectSpaceDelimiting { name } => {
                format!("Supply a single space-delimited value for '{name}' instead of repeating the key")
            }
            ValidationErrorType::InvalidDeepObject { name } => {
                format!("Supply exactly one value per property of the deep object '{name}'")
            }
            ValidationErrorType::InvalidJsonEncoding { name, reason } => {
                format!("Fix the JSON encoding of parameter '{name}': {reason}")
            }
            ValidationErrorType::UndeclaredParameter { name, section } => {
                format!("Remove the undeclared {section} parameter '{name}', or add it to the specification")
            }
            ValidationErrorType::SecuritySchemeMissing { scheme_name } => {
                format!("Define the security scheme '{scheme_name}' in components.securitySchemes")
            }
            ValidationErrorType::AuthorizationHeaderMissing => {
                "Include an Authorization header on the request".to_string()
            }
            ValidationErrorType::AuthorizationSchemeMismatch { expected, found } => {
                format!("Use the '{expected}' Authorization scheme instead of '{found}'")
            }
            ValidationErrorType::ApiKeyMissing { name, section } => {
                format!("Supply the API key '{name}' in the request {section}")
            }
            ValidationErrorType::SchemaCompilationFailed { reason } => {
                format!("Simplify the schema so it compiles: {reason}")
            }
        }
    }

    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            ValidationErrorType::ParameterMissing { name, .. }
            | ValidationErrorType::InvalidParameterType { name, .. }
            | ValidationErrorType::ParameterCannotBeDecoded { name, .. }
            | ValidationErrorType::EnumMismatch { name, .. }
            | ValidationErrorType::SchemaValidationFailed { name, .. }
            | ValidationErrorType::IncorrectReservedValues { name, .. }
            | ValidationErrorType::IncorrectFormEncoding { name }
            | ValidationErrorType::IncorrectPipeDelimiting { name }
            | ValidationErrorType::IncorrectSpaceDelimiting { name }
            | ValidationErrorType::InvalidDeepObject { name }
            | ValidationErrorType::InvalidJsonEncoding { name, .. }
            | ValidationErrorType::UndeclaredParameter { name, .. }
            | ValidationErrorType::ApiKeyMissing { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Display for ValidationErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrorType::PathNotFound { method, path } => {
                write!(f, "No operation matches '{method} {path}'")
            }
            ValidationErrorType::ParameterMissing { name, section } => {
                write!(f, "{} parameter '{name}' is missing", section.cap())
            }
            ValidationErrorType::InvalidParameterType { name, expected, raw, section } => {
                write!(f, "{} parameter '{name}' value '{raw}' is not a valid {expected}", section.cap())
            }
            ValidationErrorType::ParameterCannotBeDecoded { name, section } => {
                write!(f, "{} parameter '{name}' could not be decoded", section.cap())
            }
            ValidationErrorType::EnumMismatch { name, value, section, .. } => {
                write!(f, "{} parameter '{name}' value '{value}' is not an allowed enum value", section.cap())
            }
            ValidationErrorType::SchemaValidationFailed { name, section, .. } => {
                write!(f, "{} parameter '{name}' failed schema validation", section.cap())
            }
            ValidationErrorType::IncorrectReservedValues { name, .. } => {
                write!(f, "query parameter '{name}' contains unescaped reserved characters")
            }
            ValidationErrorType::IncorrectFormEncoding { name } => {
                write!(f, "query parameter '{name}' is comma-joined but explode=true expects repeated keys")
            }
            ValidationErrorType::IncorrectPipeDelimiting { name } => {
                write!(f, "query parameter '{name}' is repeated but pipeDelimited expects a single value")
            }
            ValidationErrorType::IncorrectSpaceDelimiting { name } => {
                write!(f, "query parameter '{name}' is repeated but spaceDelimited expects a single value")
            }
            ValidationErrorType::InvalidDeepObject { name } => {
                write!(f, "deep object query parameter '{name}' has a repeated property")
            }
            ValidationErrorType::InvalidJsonEncoding { name, reason } => {
                write!(f, "query parameter '{name}' is not valid JSON: {reason}")
            }
            ValidationErrorType::UndeclaredParameter { name, section } => {
                write!(f, "{section} parameter '{name}' is not declared in the specification")
            }
            ValidationErrorType::SecuritySchemeMissing { scheme_name } => {
                write!(f, "security scheme '{scheme_name}' is not defined")
            }
            ValidationErrorType::AuthorizationHeaderMissing => {
                write!(f, "Authorization header is missing")
            }
            ValidationErrorType::AuthorizationSchemeMismatch { expected, found } => {
                write!(f, "Authorization scheme '{found}' does not match expected '{expected}'")
            }
            ValidationErrorType::ApiKeyMissing { name, section } => {
                write!(f, "API key '{name}' is missing from the request {section}")
            }
            ValidationErrorType::SchemaCompilationFailed { reason } => {
                write!(f, "schema failed to compile: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationErrorType {}

fn section_taxonomy(section: Section) -> &'static str {
    match section {
        Section::Path => "path",
        _ => "parameter",
    }
}

fn invalid_type_subtype(expected: OpenApiPrimitives) -> &'static str {
    match expected {
        OpenApiPrimitives::Integer => "invalid-parameter-integer",
        OpenApiPrimitives::Number => "invalid-parameter-number",
        OpenApiPrimitives::Bool => "invalid-parameter-boolean",
        _ => "invalid-type",
    }
}

/// The public, serializable error envelope returned to callers. Built from a
/// [`ValidationErrorType`] once request context is known; see
/// [`ValidationError::adorn`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub message: String,
    #[serde(rename = "validationType")]
    pub validation_type: String,
    #[serde(rename = "validationSubType")]
    pub validation_sub_type: String,
    pub reason: String,
    #[serde(rename = "specLine")]
    pub spec_line: i64,
    #[serde(rename = "specColumn")]
    pub spec_column: i64,
    #[serde(rename = "howToFix")]
    pub how_to_fix: String,
    #[serde(rename = "validationErrors", skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<SchemaValidationFailure>,
    #[serde(rename = "requestMethod")]
    pub request_method: String,
    #[serde(rename = "requestPath")]
    pub request_path: String,
    #[serde(rename = "specPath")]
    pub spec_path: String,
    #[serde(rename = "parameterName", skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
}

impl ValidationError {
    /// Builds the envelope from an internal error type, with request/spec
    /// context populated lazily by the caller that has it on hand.
    pub fn adorn(ty: ValidationErrorType, request_method: &str, request_path: &str, spec_path: &str) -> Self {
        let (validation_type, validation_sub_type) = ty.taxonomy();
        let how_to_fix = ty.how_to_fix();
        let reason = ty.to_string();
        let parameter_name = ty.parameter_name().map(str::to_owned);
        let validation_errors = match &ty {
            ValidationErrorType::SchemaValidationFailed { failures, .. } => failures.clone(),
            _ => Vec::new(),
        };
        ValidationError {
            message: reason.clone(),
            validation_type: validation_type.to_string(),
            validation_sub_type: validation_sub_type.to_string(),
            reason,
            spec_line: -1,
            spec_column: -1,
            how_to_fix,
            validation_errors,
            request_method: request_method.to_string(),
            request_path: request_path.to_string(),
            spec_path: spec_path.to_string(),
            parameter_name,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn how_to_fix_preserves_original_case() {
        let ty = ValidationErrorType::InvalidParameterType {
            name: "PattyPreference".to_string(),
            expected: OpenApiPrimitives::Number,
            raw: "False".to_string(),
            section: Section::Cookie,
        };
        assert_eq!(ty.how_to_fix(), "Convert the value 'False' into a number");
    }

    #[test]
    fn adorn_populates_request_context() {
        let ty = ValidationErrorType::PathNotFound {
            method: "GET".to_string(),
            path: "/nope".to_string(),
        };
        let err = ValidationError::adorn(ty, "GET", "/nope", "");
        assert_eq!(err.request_method, "GET");
        assert_eq!(err.request_path, "/nope");
        assert_eq!(err.validation_type, "path");
        assert_eq!(err.validation_sub_type, "missing");
    }

    #[test]
    fn taxonomy_for_security_apikey_header() {
        let ty = ValidationErrorType::ApiKeyMissing {
            name: "X-API-Key".to_string(),
            section: Section::Header,
        };
        assert_eq!(ty.taxonomy(), ("security", "apikey-missing-header"));
    }

    #[test]
    fn cookie_enum_mismatch_scenario_message() {
        // Mirrors the "Cookie enum reported" end-to-end scenario.
        let ty = ValidationErrorType::InvalidParameterType {
            name: "PattyPreference".to_string(),
            expected: OpenApiPrimitives::Number,
            raw: "false".to_string(),
            section: Section::Cookie,
        };
        assert_eq!(ty.how_to_fix(), "Convert the value 'false' into a number");
    }

    #[test]
    fn header_missing_scenario_message() {
        // Mirrors the "Header missing required" end-to-end scenario.
        let ty = ValidationErrorType::ParameterMissing {
            name: "bash".to_string(),
            section: Section::Header,
        };
        assert_eq!(ty.to_string(), "Header parameter 'bash' is missing");
    }
}
