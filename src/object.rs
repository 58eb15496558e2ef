// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! The normalized, schema-agnostic representation of one API object.
//!
//! Both execution paths produce the same shape: the local kube client
//! serializes its typed/dynamic results into a `GenericObject`, and the
//! tunnel client decodes forwarded response bodies into one. Callers cannot
//! tell which path produced the value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DispatchError;

/// An untyped, arbitrarily-nested API object or list, freshly allocated per
/// response. Mirrors a single Kubernetes API document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericObject(pub Value);

impl GenericObject {
    /// The object's `kind` field, if present.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    /// The object's `metadata.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.0
            .pointer("/metadata/name")
            .and_then(Value::as_str)
    }

    /// The object's `metadata.namespace`, if present.
    #[allow(dead_code)]
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
    }

    /// True when this is a `*List` document.
    #[allow(dead_code)]
    pub fn is_list(&self) -> bool {
        self.kind().is_some_and(|k| k.ends_with("List"))
    }

    /// Items of a list document; a single object yields itself.
    pub fn items(&self) -> Vec<&Value> {
        match self.0.get("items").and_then(Value::as_array) {
            Some(items) => items.iter().collect(),
            None => vec![&self.0],
        }
    }
}

impl From<Value> for GenericObject {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Decode a response body into a `GenericObject`.
///
/// Malformed JSON fails with a `Decode` error naming the byte length and a
/// short content preview; it never panics and never returns a partially
/// populated object.
pub fn decode(bytes: &[u8]) -> Result<GenericObject, DispatchError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|_| DispatchError::decode(bytes))?;
    Ok(GenericObject(value))
}
