//! The regex fallback matcher: templates the radix tree cannot represent
//! (matrix `{;name}`, label `{.name}`, and OData-style templates with
//! literal characters embedded around a placeholder) are converted to a
//! regular expression and matched against the whole request path. Compiled
//! expressions are memoized in an optional, concurrent [`RegexCache`].

use crate::error::ValidationErrorType;
use dashmap::DashMap;
use regex::Regex;
use std::sync::Arc;

/// Concurrent cache of compiled per-template regexes. Entries never mutate
/// once inserted; a double-compile on a race is harmless and simply
/// overwrites with an equal value.
#[derive(Default)]
pub struct RegexCache {
    compiled: DashMap<String, Arc<CompiledTemplate>>,
}

struct CompiledTemplate {
    regex: Regex,
    param_names: Vec<String>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_compile(&self, template: &str) -> Result<Arc<CompiledTemplate>, ValidationErrorType> {
        if let Some(existing) = self.compiled.get(template) {
            return Ok(existing.clone());
        }
        let (pattern, param_names) = template_to_regex(template)?;
        let regex = Regex::new(&pattern).map_err(|e| ValidationErrorType::SchemaCompilationFailed {
            reason: format!("template '{template}' did not compile to a valid regex: {e}"),
        })?;
        let compiled = Arc::new(CompiledTemplate { regex, param_names });
        self.compiled.insert(template.to_string(), compiled.clone());
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

pub struct RegexMatch {
    pub bindings: Vec<(String, String)>,
}

/// Tries every template in `templates` (in spec order) against `path`,
/// returning the first match. A template with unbalanced braces is skipped
/// rather than aborting the whole scan.
pub fn find_first_match<'a>(
    templates: impl Iterator<Item = &'a str>,
    path: &str,
    cache: &RegexCache,
) -> Option<(&'a str, RegexMatch)> {
    for template in templates {
        let compiled = match cache.get_or_compile(template) {
            Ok(c) => c,
            Err(_) => continue,
        };
        if let Some(captures) = compiled.regex.captures(path) {
            let bindings = compiled
                .param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| captures.get(i + 1).map(|m| (name.clone(), m.as_str().to_string())))
                .collect();
            return Some((template, RegexMatch { bindings }));
        }
    }
    None
}

/// Converts an OpenAPI path template into `(regex pattern, ordered param
/// names)`. Plain `{name}` segments become a non-greedy capture; `{;name}`
/// (matrix) and `{.name}` (label) segments capture their marker and all
/// repeated occurrences within the segment raw, leaving further
/// style-specific decoding to the parameter validator. Everything else is
/// matched literally (escaped), which is what makes OData-style embedded
/// literals (`(RelationshipNumber='{x}')`) work.
fn template_to_regex(template: &str) -> Result<(String, Vec<String>), ValidationErrorType> {
    let mut pattern = String::from("^");
    let mut param_names = Vec::new();
    let chars: Vec<char> = template.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' {
            let close = chars[i..]
                .iter()
                .position(|&c| c == '}')
                .map(|p| i + p)
                .ok_or_else(|| ValidationErrorType::SchemaCompilationFailed {
                    reason: format!("template '{template}' has an unbalanced '{{'"),
                })?;
            let inner: String = chars[i + 1..close].iter().collect();
            let (name, fragment) = placeholder_fragment(&inner);
            param_names.push(name);
            pattern.push_str(&fragment);
            i = close + 1;
        } else {
            let start = i;
            while i < chars.len() && chars[i] != '{' {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            pattern.push_str(&regex::escape(&literal));
        }
    }
    pattern.push('$');
    Ok((pattern, param_names))
}

fn placeholder_fragment(inner: &str) -> (String, String) {
    let inner = inner.strip_suffix('*').unwrap_or(inner);
    if let Some(name) = inner.strip_prefix(';') {
        let escaped = regex::escape(name);
        (name.to_string(), format!("(;{escaped}=[^/]+)"))
    } else if let Some(name) = inner.strip_prefix('.') {
        (name.to_string(), "(\\.[^/]+)".to_string())
    } else {
        (inner.to_string(), "([^/]+?)".to_string())
    }
}
