//! Adapter over the `jsonschema` engine. A [`SchemaEngine`] is built once per
//! specification document and reused for every parameter/schema validation
//! call; engine panics (malformed `$ref` cycles, pathological regex in
//! `pattern`) are caught and reported as [`ValidationErrorType::SchemaCompilationFailed`]
//! rather than taking the whole request down with them.

use crate::error::{SchemaValidationFailure, ValidationErrorType};
use crate::json_path::JsonPath;
use crate::model::Spec;
use jsonschema::{Draft, Resource, ValidationOptions, Validator as JsonValidator};
use serde_json::{json, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub struct SchemaEngine {
    options: ValidationOptions,
}

impl SchemaEngine {
    /// `spec_json` must be the full specification document, `$id`-tagged as
    /// `@@root` so that per-parameter schemas can be referenced from it by
    /// JSON pointer without re-embedding them. `format_assertions` controls
    /// whether `format` keywords are enforced as assertions rather than
    /// merely annotated.
    pub fn new(spec: &Spec, mut spec_json: Value, format_assertions: bool) -> Result<Self, ValidationErrorType> {
        spec_json["$id"] = json!("@@root");
        let draft = if spec.is_3_1() { Draft::Draft202012 } else { Draft::Draft4 };

        let resource = Resource::from_contents(spec_json).map_err(|e| ValidationErrorType::SchemaCompilationFailed {
            reason: format!("specification document is not a valid schema resource: {e}"),
        })?;

        let options = JsonValidator::options()
            .with_draft(draft)
            .should_validate_formats(format_assertions)
            .with_resource("@@inner", resource);

        Ok(Self { options })
    }

    /// Validates `instance` against the schema rooted at `#/<json_path>` in
    /// the specification document.
    pub fn validate_at_pointer(&self, json_path: &JsonPath, instance: &Value) -> Result<(), Vec<SchemaValidationFailure>> {
        let pointer_schema = json!({ "$ref": format!("@@root#/{}", json_path.format_path()) });
        self.validate_against(&pointer_schema, instance)
    }

    /// Validates `instance` against an inline schema value (used for
    /// content-wrapped parameters, which carry their schema directly rather
    /// than by reference into the document).
    pub fn validate_inline(&self, schema: &Value, instance: &Value) -> Result<(), Vec<SchemaValidationFailure>> {
        self.validate_against(schema, instance)
    }

    fn validate_against(&self, schema: &Value, instance: &Value) -> Result<(), Vec<SchemaValidationFailure>> {
        let built = catch_unwind(AssertUnwindSafe(|| self.options.build(schema)));
        let validator = match built {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => {
                return Err(vec![SchemaValidationFailure {
                    reason: e.to_string(),
                    location: String::new(),
                    reference_schema: schema.clone(),
                }])
            }
            Err(_) => {
                return Err(vec![SchemaValidationFailure {
                    reason: "schema compilation panicked".to_string(),
                    location: String::new(),
                    reference_schema: schema.clone(),
                }])
            }
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| validator.iter_errors(instance).collect::<Vec<_>>()));
        let errors = match outcome {
            Ok(errors) => errors,
            Err(_) => {
                return Err(vec![SchemaValidationFailure {
                    reason: "schema validation panicked".to_string(),
                    location: String::new(),
                    reference_schema: schema.clone(),
                }])
            }
        };

        if errors.is_empty() {
            return Ok(());
        }
        Err(errors
            .into_iter()
            .map(|e| SchemaValidationFailure {
                reason: e.to_string(),
                location: String::new(),
                reference_schema: schema.clone(),
            })
            .collect())
    }
}

/// Convenience wrapper turning a list of engine failures into the crate's
/// public error type for a named parameter.
pub fn to_validation_error(
    name: &str,
    section: crate::error::Section,
    failures: Vec<SchemaValidationFailure>,
) -> ValidationErrorType {
    ValidationErrorType::SchemaValidationFailed { name: name.to_string(), section, failures }
}
