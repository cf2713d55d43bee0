//! Merges a path item's shared parameters with an operation's own, per the
//! `(name, in)` override rule: an operation-level parameter with the same
//! name and location replaces the path-item one, everything else keeps the
//! path-item's declaration order with operation-only parameters appended.

use crate::model::{Operation, Parameter, ParameterLocation, PathItem};

pub fn params_for<'a>(path_item: &'a PathItem, operation: &'a Operation) -> Vec<&'a Parameter> {
    let mut merged: Vec<&Parameter> = Vec::with_capacity(path_item.parameters.len() + operation.parameters.len());

    for p in &path_item.parameters {
        let overridden = operation
            .parameters
            .iter()
            .any(|op| op.name == p.name && op.location == p.location);
        if !overridden {
            merged.push(p);
        }
    }
    for p in &operation.parameters {
        merged.push(p);
    }
    merged
}

pub fn params_in<'a>(params: &[&'a Parameter], location: ParameterLocation) -> Vec<&'a Parameter> {
    params.iter().filter(|p| p.location == location).copied().collect()
}
