//! JSON-Pointer-style path accumulation, used both to address schema `$ref`
//! fragments inside the loaded specification and to populate
//! [`crate::error::ValidationError::spec_path`].

const PATH_SEPARATOR: &str = "/";
const TILDE: &str = "~";
const ENCODED_TILDE: &str = "~0";
const ENCODED_BACKSLASH: &str = "~1";

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct JsonPath(pub Vec<String>);

use serde::Serialize;

impl JsonPath {
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    /// Appends a segment, escaping `~` and `/` per RFC 6901.
    pub fn add(&mut self, segment: impl AsRef<str>) -> &mut Self {
        let segment = segment.as_ref();
        if segment.contains(TILDE) || segment.contains(PATH_SEPARATOR) {
            let segment = segment
                .replace(TILDE, ENCODED_TILDE)
                .replace(PATH_SEPARATOR, ENCODED_BACKSLASH);
            self.0.push(segment);
        } else {
            self.0.push(segment.to_owned());
        }
        self
    }

    pub fn format_path(&self) -> String {
        self.0.join(PATH_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_path_is_empty() {
        let path = JsonPath::new();
        assert_eq!(path.0.len(), 0);
        assert_eq!(path.format_path(), "");
    }

    #[test]
    fn single_segment() {
        let mut path = JsonPath::new();
        path.add("paths");
        assert_eq!(path.format_path(), "paths");
    }

    #[test]
    fn multiple_segments_chained() {
        let mut path = JsonPath::new();
        path.add("components").add("schemas").add("User");
        assert_eq!(path.format_path(), "components/schemas/User");
    }

    #[test]
    fn tilde_is_escaped() {
        let mut path = JsonPath::new();
        path.add("user~name");
        assert_eq!(path.0[0], format!("user{}name", ENCODED_TILDE));
    }

    #[test]
    fn slash_is_escaped() {
        let mut path = JsonPath::new();
        path.add("/pets");
        let expected = format!("{}pets", ENCODED_BACKSLASH);
        assert_eq!(path.0[0], expected);
        assert_eq!(path.format_path(), expected);
    }

    #[test]
    fn realistic_spec_pointer() {
        let mut path = JsonPath::new();
        path.add("paths").add("/pets/{id}").add("get").add("parameters").add("0");
        let expected_second = format!("{}pets{}{{id}}", ENCODED_BACKSLASH, ENCODED_BACKSLASH);
        assert_eq!(path.0[1], expected_second);
        assert_eq!(
            path.format_path(),
            format!("paths/{}/get/parameters/0", expected_second)
        );
    }
}
