// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::document::ApiObject;
use serde_yaml::Value;

/// Remove `metadata.namespace` from an object.
///
/// Returns the removed namespace, or `None` when the object had none and was
/// left untouched.
pub fn strip_namespace(object: &mut ApiObject) -> Option<String> {
    let namespace = object.namespace()?.to_string();
    let metadata = object.metadata_mut()?;
    match metadata.shift_remove("namespace") {
        Some(Value::String(_)) => Some(namespace),
        _ => None,
    }
}
