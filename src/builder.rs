//! Fluent construction of a [`crate::validator::ParameterValidator`]. Every
//! setter here that can be wrong is fallible and surfaces through
//! [`BuilderError`] at `build()` time rather than silently discarding bad
//! input and falling back to a guessed default — that keeps the builder
//! chainable by value while still failing loudly.

use crate::model::Spec;
use crate::path::radix::RadixTree;
use crate::path::regex_fallback::RegexCache;
use crate::schema::SchemaEngine;
use crate::validator::ParameterValidator;
use crate::validators::ValidatorOptions;
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum BuilderError {
    InvalidSpecification(String),
    SchemaCompilationFailed(String),
}

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderError::InvalidSpecification(msg) => write!(f, "invalid specification: {msg}"),
            BuilderError::SchemaCompilationFailed(msg) => write!(f, "schema compilation failed: {msg}"),
        }
    }
}

impl std::error::Error for BuilderError {}

pub struct ParameterValidatorBuilder {
    spec_json: Value,
    options: ValidatorOptions,
}

impl ParameterValidatorBuilder {
    pub(crate) fn new(spec_json: Value) -> Self {
        ParameterValidatorBuilder { spec_json, options: ValidatorOptions::default() }
    }

    /// Skips `security` validation entirely, as if every operation declared
    /// no security requirements.
    pub fn without_security_validation(mut self) -> Self {
        self.options.security_validation = false;
        self
    }

    pub fn with_format_assertions(mut self, enabled: bool) -> Self {
        self.options.format_assertions = enabled;
        self
    }

    pub fn with_regex_cache(mut self, cache: RegexCache) -> Self {
        self.options.regex_cache = Some(cache);
        self
    }

    /// When enabled, parameters present on the request but not declared in
    /// the specification are reported as errors instead of ignored.
    pub fn with_strict_mode(mut self, enabled: bool) -> Self {
        self.options.strict_mode = enabled;
        self
    }

    pub fn build(self) -> Result<ParameterValidator, BuilderError> {
        let spec: Spec = serde_json::from_value(self.spec_json.clone())
            .map_err(|e| BuilderError::InvalidSpecification(e.to_string()))?;

        let engine = SchemaEngine::new(&spec, self.spec_json, self.options.format_assertions)
            .map_err(|e| BuilderError::SchemaCompilationFailed(e.to_string()))?;

        let radix = RadixTree::build(&spec);

        let options = if self.options.regex_cache.is_some() {
            self.options
        } else {
            ValidatorOptions { regex_cache: Some(RegexCache::new()), ..self.options }
        };

        log::debug!("built parameter validator for openapi {} with {} paths", spec.openapi, spec.paths.len());
        Ok(ParameterValidator::new(spec, engine, radix, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_successfully_from_valid_spec() {
        let spec = json!({"openapi": "3.0.3", "paths": {}});
        let builder = ParameterValidatorBuilder::new(spec);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn fluent_setters_are_chainable() {
        let spec = json!({"openapi": "3.0.3", "paths": {}});
        let builder = ParameterValidatorBuilder::new(spec)
            .without_security_validation()
            .with_format_assertions(true)
            .with_strict_mode(true);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn malformed_spec_is_a_build_error() {
        let spec = json!({"paths": "not-a-map"});
        let builder = ParameterValidatorBuilder::new(spec);
        assert!(builder.build().is_err());
    }
}
