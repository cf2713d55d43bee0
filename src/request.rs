//! The read-only request contract this crate validates against. Mirrors
//! `http::Request<T>`'s accessors; body content is never touched — request
//! and response body validation are out of scope for this crate.

use http::{HeaderMap, Method};
use std::collections::HashMap;

pub trait Request {
    fn method_ref(&self) -> &Method;
    fn path_ref(&self) -> &str;
    fn headers_ref(&self) -> &HeaderMap;
    fn query_ref(&self) -> Option<&str>;

    /// Cookies parsed from the `Cookie` header, exact-case, first occurrence
    /// wins (matching common cookie-jar semantics: a client only ever sends
    /// one value per name on a well-formed request, but if it sends more we
    /// prefer the first like most servers do).
    fn cookies(&self) -> HashMap<String, String> {
        let Some(raw) = self.headers_ref().get(http::header::COOKIE) else {
            return HashMap::new();
        };
        let Ok(raw) = raw.to_str() else {
            return HashMap::new();
        };
        parse_cookie_header(raw)
    }
}

pub fn parse_cookie_header(raw: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for pair in raw.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        if let Some((name, value)) = pair.split_once('=') {
            out.entry(name.trim().to_owned()).or_insert_with(|| value.trim().to_owned());
        }
    }
    out
}

impl<T> Request for http::Request<T> {
    fn method_ref(&self) -> &Method {
        self.method()
    }

    fn path_ref(&self) -> &str {
        self.uri().path()
    }

    fn headers_ref(&self) -> &HeaderMap {
        self.headers()
    }

    fn query_ref(&self) -> Option<&str> {
        self.uri().query()
    }
}
