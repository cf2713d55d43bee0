//! Pure decoding helpers for OpenAPI parameter `style`/`explode` wire
//! encodings. None of these panic; undecodable input yields an empty
//! collection so the caller can turn that into a structured error.

use crate::model::ParameterStyle;
use std::collections::HashMap;

/// Splits `value` by the delimiter implied by `style`, stripping any
/// non-exploded `label`/`matrix` marker first. For exploded `label`/`matrix`
/// arrays each resulting segment still carries its leading `.`/`;name=`
/// marker; stripping that per-segment marker is the caller's job once it
/// knows the parameter name (see [`crate::validators::path`]).
pub fn explode(value: &str, style: ParameterStyle, exploded: bool) -> Vec<String> {
    let (marker_stripped, delimiter, strip_empty) = match style {
        ParameterStyle::Simple | ParameterStyle::Form => (value, ',', false),
        ParameterStyle::PipeDelimited => (value, '|', false),
        ParameterStyle::SpaceDelimited => (value, ' ', false),
        ParameterStyle::Label => {
            if exploded {
                (value, '.', true)
            } else {
                (value.strip_prefix('.').unwrap_or(value), ',', false)
            }
        }
        ParameterStyle::Matrix => {
            if exploded {
                (value, ';', true)
            } else {
                (strip_matrix_marker(value), ',', false)
            }
        }
        ParameterStyle::DeepObject => (value, ',', false),
    };
    if marker_stripped.is_empty() {
        return Vec::new();
    }
    marker_stripped
        .split(delimiter)
        .filter(|segment| !(strip_empty && segment.is_empty()))
        .map(str::to_owned)
        .collect()
}

/// Strips a leading `;name=` marker from a non-exploded matrix value.
fn strip_matrix_marker(value: &str) -> &str {
    if let Some(rest) = value.strip_prefix(';') {
        if let Some(eq) = rest.find('=') {
            return &rest[eq + 1..];
        }
    }
    value
}

/// "a,1,b,2" -> {a:"1", b:"2"}. Odd token count or empty input yields an
/// empty map, signalling "undecodable" to the caller.
pub fn csv_to_kv_map(value: &str) -> HashMap<String, String> {
    if value.is_empty() {
        return HashMap::new();
    }
    let tokens: Vec<&str> = value.split(',').collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return HashMap::new();
    }
    tokens
        .chunks_exact(2)
        .map(|pair| (pair[0].to_owned(), pair[1].to_owned()))
        .collect()
}

/// "a=1,b=2" (or "a=1;b=2" etc, depending on `delimiter`) -> {a:"1", b:"2"}.
/// Tokens without `=` are dropped; if every token is malformed, returns an
/// empty map.
pub fn kv_csv_to_map(value: &str, delimiter: char) -> HashMap<String, String> {
    if value.is_empty() {
        return HashMap::new();
    }
    value
        .split(delimiter)
        .filter_map(|token| token.split_once('='))
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// Groups repeated `base[prop]=value` query parameters under `base_key`,
/// returning {prop: value, ...}.
pub fn deep_object_to_map<'a>(
    query_pairs: impl Iterator<Item = (&'a str, &'a str)>,
    base_key: &str,
) -> HashMap<String, String> {
    let prefix = format!("{base_key}[");
    let mut out = HashMap::new();
    for (k, v) in query_pairs {
        if let Some(rest) = k.strip_prefix(&prefix) {
            if let Some(prop) = rest.strip_suffix(']') {
                out.insert(prop.to_owned(), v.to_owned());
            }
        }
    }
    out
}

/// True iff `value` contains the delimiter that distinguishes the style's
/// non-exploded form, used to detect a comma-joined array sent where
/// `explode=true` expected repeated keys.
pub fn contains_style_delimiter(value: &str, style: ParameterStyle) -> bool {
    match style {
        ParameterStyle::Form | ParameterStyle::Simple => value.contains(','),
        ParameterStyle::PipeDelimited => value.contains('|'),
        ParameterStyle::SpaceDelimited => value.contains(' '),
        ParameterStyle::Label => value.contains(','),
        ParameterStyle::Matrix => value.contains(','),
        ParameterStyle::DeepObject => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explode_form_non_exploded_csv() {
        assert_eq!(explode("1,2,3", ParameterStyle::Form, false), vec!["1", "2", "3"]);
    }

    #[test]
    fn explode_matrix_exploded() {
        assert_eq!(
            explode(";burger=1;burger=2;burger=3", ParameterStyle::Matrix, true),
            vec!["burger=1", "burger=2", "burger=3"]
        );
    }

    #[test]
    fn explode_matrix_non_exploded_strips_marker() {
        assert_eq!(explode(";burger=1,2,3", ParameterStyle::Matrix, false), vec!["1", "2", "3"]);
    }

    #[test]
    fn explode_label_non_exploded_strips_dot() {
        assert_eq!(explode(".1,2,3", ParameterStyle::Label, false), vec!["1", "2", "3"]);
    }

    #[test]
    fn explode_empty_value_is_empty() {
        assert!(explode("", ParameterStyle::Form, false).is_empty());
    }

    #[test]
    fn csv_to_kv_map_even_tokens() {
        let map = csv_to_kv_map("a,1,b,2");
        assert_eq!(map.get("a"), Some(&"1".to_string()));
        assert_eq!(map.get("b"), Some(&"2".to_string()));
    }

    #[test]
    fn csv_to_kv_map_odd_tokens_is_empty() {
        assert!(csv_to_kv_map("a,1,b").is_empty());
    }

    #[test]
    fn kv_csv_to_map_basic() {
        let map = kv_csv_to_map("a=1,b=2", ',');
        assert_eq!(map.get("a"), Some(&"1".to_string()));
        assert_eq!(map.get("b"), Some(&"2".to_string()));
    }

    #[test]
    fn kv_csv_to_map_malformed_tokens_dropped() {
        let map = kv_csv_to_map("a=1,nope,b=2", ',');
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn deep_object_groups_properties() {
        let pairs = vec![("fishy[ocean]", "atlantic"), ("fishy[salt]", "12"), ("other", "x")];
        let map = deep_object_to_map(pairs.into_iter(), "fishy");
        assert_eq!(map.get("ocean"), Some(&"atlantic".to_string()));
        assert_eq!(map.get("salt"), Some(&"12".to_string()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn contains_style_delimiter_form() {
        assert!(contains_style_delimiter("1,2", ParameterStyle::Form));
        assert!(!contains_style_delimiter("1", ParameterStyle::Form));
    }
}
