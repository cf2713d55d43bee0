//! Per-location parameter validators. Each submodule covers one of `path`,
//! `query`, `header`, `cookie`, or `security`; [`ValidatorOptions`] carries
//! the knobs that apply across all of them.

pub mod cookie;
pub mod header;
pub mod path;
pub mod query;
pub mod security;

use crate::path::regex_fallback::RegexCache;

/// Cross-cutting knobs a [`crate::builder::ParameterValidatorBuilder`]
/// assembles and every per-location validator reads from.
#[derive(Clone)]
pub struct ValidatorOptions {
    pub security_validation: bool,
    pub format_assertions: bool,
    pub strict_mode: bool,
    pub regex_cache: Option<RegexCache>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        ValidatorOptions {
            security_validation: true,
            format_assertions: false,
            strict_mode: false,
            regex_cache: None,
        }
    }
}
