// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! REST path construction for forwarded operations.
//!
//! Pure string building, no I/O: an `OperationDescriptor` maps to the
//! Kubernetes API path the tunnel expects after the `/{cluster}` prefix.
//! Core-group resources live under `/api/{version}`, named groups under
//! `/apis/{group}/{version}`.

use url::form_urlencoded;

use crate::kubernetes::{OperationDescriptor, Verb, plurals};

/// Build the API path for a list/get descriptor.
///
/// Deterministic and side-effect free: identical descriptors always produce
/// identical paths. Label selectors are form-urlencoded (`=` becomes `%3D`).
pub fn build_path(desc: &OperationDescriptor) -> String {
    if desc.verb == Verb::Logs {
        let log = desc.log.clone().unwrap_or_default();
        return build_log_path(
            desc.namespace.as_deref().unwrap_or("default"),
            desc.name.as_deref().unwrap_or_default(),
            log.container.as_deref(),
            log.tail_lines,
        );
    }

    let gvk = match &desc.gvk {
        Some(gvk) => gvk,
        // Descriptors are validated before they get here; list/get always
        // carry a GVK.
        None => return String::new(),
    };

    let mut path = if gvk.group.is_empty() {
        format!("/api/{}", gvk.version)
    } else {
        format!("/apis/{}/{}", gvk.group, gvk.version)
    };

    if let Some(namespace) = &desc.namespace {
        path.push_str("/namespaces/");
        path.push_str(namespace);
    }

    path.push('/');
    path.push_str(&plurals::plural_for_kind(&gvk.kind));

    if let Some(name) = &desc.name {
        path.push('/');
        path.push_str(name);
    }

    if let Some(selector) = &desc.label_selector {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("labelSelector", selector)
            .finish();
        path.push('?');
        path.push_str(&query);
    }

    path
}

/// Build the API path for a pod log read.
///
/// Uses the native log subresource under the pod's namespace/name, with
/// `container` and `tailLines` as query parameters. `tailLines` is included
/// only when strictly positive.
pub fn build_log_path(
    namespace: &str,
    pod: &str,
    container: Option<&str>,
    tail_lines: i64,
) -> String {
    let mut path = format!("/api/v1/namespaces/{namespace}/pods/{pod}/log");

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;
    if let Some(container) = container {
        query.append_pair("container", container);
        has_query = true;
    }
    if tail_lines > 0 {
        query.append_pair("tailLines", &tail_lines.to_string());
        has_query = true;
    }
    if has_query {
        path.push('?');
        path.push_str(&query.finish());
    }

    path
}
