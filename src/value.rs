//! A decoded parameter value. Every value arrives on the wire as a string;
//! [`ParamValue`] is what a per-location validator produces once it has
//! applied style/explode decoding and (for scalars) primitive conversion.
//! Array and object members stay as raw strings — their own type conversion
//! happens when the schema validator walks them against `items`/`properties`.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Raw(String),
    Scalar(serde_json::Value),
    Array(Vec<String>),
    Object(HashMap<String, String>),
}

impl ParamValue {
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ParamValue::Raw(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            ParamValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            ParamValue::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, String>> {
        match self {
            ParamValue::Object(m) => Some(m),
            _ => None,
        }
    }

    /// A JSON representation suitable for handing to the schema engine: the
    /// only variant that needs a conversion is `Raw`, which schema
    /// validation never sees directly (it always operates on a `Scalar`,
    /// `Array`, or `Object`).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Raw(s) => serde_json::Value::String(s.clone()),
            ParamValue::Scalar(v) => v.clone(),
            ParamValue::Array(items) => {
                serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect())
            }
            ParamValue::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone()))).collect(),
            ),
        }
    }
}
