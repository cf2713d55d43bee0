//! Security requirement validation. A specification's `security` is a list
//! of requirement *sets*; a request passes if it satisfies every scheme
//! within at least one set (sets are OR'd, schemes within a set are AND'd).
//! An operation's own `security` (including an explicit empty list, meaning
//! "no auth") overrides the document-level default.

use crate::error::{Section, ValidationErrorType};
use crate::model::{ApiKeyLocation, SecurityRequirement, SecurityScheme, SecuritySchemeType};
use crate::request::Request;
use indexmap::IndexMap;

pub fn validate_security(
    operation_security: Option<&Vec<SecurityRequirement>>,
    global_security: &[SecurityRequirement],
    security_schemes: &IndexMap<String, SecurityScheme>,
    request: &impl Request,
) -> Vec<ValidationErrorType> {
    let effective: &[SecurityRequirement] = match operation_security {
        Some(sets) => sets,
        None => global_security,
    };

    if effective.is_empty() {
        return Vec::new();
    }

    let mut all_errors = Vec::new();

    for requirement_set in effective {
        if requirement_set.0.is_empty() {
            return Vec::new();
        }
        let mut set_errors = Vec::new();
        for scheme_name in requirement_set.0.keys() {
            match security_schemes.get(scheme_name) {
                Some(scheme) => {
                    if let Err(e) = check_scheme(scheme_name, scheme, request) {
                        set_errors.push(e);
                    }
                }
                None => set_errors.push(ValidationErrorType::SecuritySchemeMissing { scheme_name: scheme_name.clone() }),
            }
        }
        if set_errors.is_empty() {
            return Vec::new();
        }
        all_errors.extend(set_errors);
    }

    all_errors
}

fn check_scheme(scheme_name: &str, scheme: &SecurityScheme, request: &impl Request) -> Result<(), ValidationErrorType> {
    match scheme.scheme_type {
        SecuritySchemeType::Http => check_http_scheme(scheme, request),
        SecuritySchemeType::ApiKey => check_api_key(scheme_name, scheme, request),
        SecuritySchemeType::OAuth2 | SecuritySchemeType::OpenIdConnect => check_bearer_like(request),
        SecuritySchemeType::MutualTLS => Ok(()),
    }
}

fn check_http_scheme(scheme: &SecurityScheme, request: &impl Request) -> Result<(), ValidationErrorType> {
    let Some(header) = request.headers_ref().get(http::header::AUTHORIZATION) else {
        return Err(ValidationErrorType::AuthorizationHeaderMissing);
    };
    let Ok(header) = header.to_str() else {
        return Err(ValidationErrorType::AuthorizationHeaderMissing);
    };
    let expected = scheme.scheme.as_deref().unwrap_or("bearer");
    let found_scheme = header.split_whitespace().next().unwrap_or("");
    if !found_scheme.eq_ignore_ascii_case(expected) {
        return Err(ValidationErrorType::AuthorizationSchemeMismatch {
            expected: expected.to_string(),
            found: found_scheme.to_string(),
        });
    }
    Ok(())
}

fn check_bearer_like(request: &impl Request) -> Result<(), ValidationErrorType> {
    if request.headers_ref().get(http::header::AUTHORIZATION).is_some() {
        Ok(())
    } else {
        Err(ValidationErrorType::AuthorizationHeaderMissing)
    }
}

fn check_api_key(scheme_name: &str, scheme: &SecurityScheme, request: &impl Request) -> Result<(), ValidationErrorType> {
    let name = scheme.name.as_deref().unwrap_or(scheme_name);
    match scheme.location {
        Some(ApiKeyLocation::Header) => {
            if request.headers_ref().get(name).is_some() {
                Ok(())
            } else {
                Err(ValidationErrorType::ApiKeyMissing { name: name.to_string(), section: Section::Header })
            }
        }
        Some(ApiKeyLocation::Cookie) => {
            if request.cookies().contains_key(name) {
                Ok(())
            } else {
                Err(ValidationErrorType::ApiKeyMissing { name: name.to_string(), section: Section::Cookie })
            }
        }
        Some(ApiKeyLocation::Query) | None => {
            let present = request
                .query_ref()
                .map(|q| q.split('&').any(|pair| pair.split('=').next() == Some(name)))
                .unwrap_or(false);
            if present {
                Ok(())
            } else {
                Err(ValidationErrorType::ApiKeyMissing { name: name.to_string(), section: Section::Query })
            }
        }
    }
}
