//! Validates in-flight HTTP requests — path, query, header, and cookie
//! parameters, plus security requirements — against an OpenAPI 3.0.x or
//! 3.1.x specification document.
//!
//! ```no_run
//! use oasguard::ParameterValidator;
//! use serde_json::json;
//!
//! let spec = json!({"openapi": "3.0.3", "paths": {}});
//! let validator = ParameterValidator::builder(spec).build().unwrap();
//! let request = http::Request::builder().method("GET").uri("/burgers/beef").body(()).unwrap();
//!
//! match validator.find_operation(&request) {
//!     Ok((lookup, operation)) => {
//!         let mut errors = validator.validate_query_params_with_path_item(&request, &lookup.path_item, &operation, &lookup.template);
//!         errors.extend(validator.validate_security_with_path_item(&request, &operation, &lookup.template));
//!         for e in &errors {
//!             log::warn!("{e}");
//!         }
//!     }
//!     Err(e) => log::warn!("{e}"),
//! }
//! ```
//!
//! Parameter values are never inferred or defaulted beyond what the
//! specification declares; every validator in this crate records a failure
//! and keeps going rather than stopping at the first one, so a caller sees
//! every problem with a request in one pass.

mod builder;
mod encoding;
mod error;
mod json_path;
mod model;
mod params;
pub mod path;
mod primitive;
mod request;
mod schema;
mod validator;
mod validators;
mod value;

pub use builder::{BuilderError, ParameterValidatorBuilder};
pub use error::{Section, SchemaValidationFailure, ValidationError, ValidationErrorType};
pub use model::{
    ApiKeyLocation, Components, MediaType, Operation, Parameter, ParameterLocation, ParameterStyle, PathItem,
    SecurityRequirement, SecurityScheme, SecuritySchemeType, Server, Spec,
};
pub use params::{params_for, params_in};
pub use path::find_path;
pub use path::radix::RadixTree;
pub use path::regex_fallback::RegexCache;
pub use path::PathLookupResult;
pub use primitive::{OpenApiPrimitives, PrimitiveError};
pub use request::{parse_cookie_header, Request};
pub use validator::ParameterValidator;
pub use value::ParamValue;
