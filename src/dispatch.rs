// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! The routing decision layer.
//!
//! Every operation entry point consults the same predicate before acting:
//! an operation is forwarded through the tunnel only when forwarding is
//! enabled, a tunnel client is actually configured, and the caller named a
//! non-empty target cluster. Three independent gates; if any is closed the
//! operation runs against the local cluster.
//!
//! Mutating verbs are not implemented over the tunnel. When the predicate
//! picks Forward for one of them, the dispatcher fails with an explicit
//! `Unsupported` error instead of quietly running the mutation locally,
//! which would hit the wrong cluster. This layer adds nothing else: no
//! retries, no caching.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::kubernetes::{Gvk, LocalClient, LogOptions, OperationDescriptor, Verb};
use crate::object::GenericObject;
use crate::tunnel::{ResourceForwarder, path};

/// Per-request forwarding switches. The third gate (a configured tunnel
/// client) is the presence of the dispatcher's forwarder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchMode {
    pub forwarding_enabled: bool,
}

/// Outcome of the routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Local,
    Forward(String),
}

/// The single source of truth for routing. `cluster` is honored only when
/// non-empty; evaluated identically for every operation kind.
pub fn decide(mode: DispatchMode, forwarder_configured: bool, cluster: Option<&str>) -> Route {
    let target = cluster.filter(|c| !c.is_empty());
    match target {
        Some(c) if mode.forwarding_enabled && forwarder_configured => {
            Route::Forward(c.to_string())
        }
        Some(c) => {
            debug!(cluster = %c, forwarding_enabled = mode.forwarding_enabled,
                   "cluster target present but forwarding gates closed; routing locally");
            Route::Local
        }
        None => Route::Local,
    }
}

pub struct Dispatcher {
    local: LocalClient,
    forwarder: Option<Arc<dyn ResourceForwarder>>,
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(
        local: LocalClient,
        forwarder: Option<Arc<dyn ResourceForwarder>>,
        mode: DispatchMode,
    ) -> Self {
        if mode.forwarding_enabled && forwarder.is_none() {
            warn!("forwarding enabled but no tunnel client configured; all operations run locally");
        }
        Self {
            local,
            forwarder,
            mode,
        }
    }

    fn route(&self, cluster: Option<&str>) -> Route {
        decide(self.mode, self.forwarder.is_some(), cluster)
    }

    fn forwarder(&self, cluster: &str) -> Result<&dyn ResourceForwarder, DispatchError> {
        // decide() only picks Forward when a forwarder exists; this guard
        // keeps a broken invariant from becoming a panic.
        self.forwarder
            .as_deref()
            .ok_or_else(|| DispatchError::Routing {
                cluster: cluster.to_string(),
            })
    }

    /// List pods, namespaced or across all namespaces.
    pub async fn pods_list(
        &self,
        namespace: Option<&str>,
        label_selector: Option<&str>,
        cluster: Option<&str>,
    ) -> Result<GenericObject> {
        self.resources_list(&Gvk::core("Pod"), namespace, label_selector, cluster)
            .await
    }

    /// List namespaces.
    pub async fn namespaces_list(
        &self,
        label_selector: Option<&str>,
        cluster: Option<&str>,
    ) -> Result<GenericObject> {
        self.resources_list(&Gvk::core("Namespace"), None, label_selector, cluster)
            .await
    }

    /// List resources of an arbitrary type.
    pub async fn resources_list(
        &self,
        gvk: &Gvk,
        namespace: Option<&str>,
        label_selector: Option<&str>,
        cluster: Option<&str>,
    ) -> Result<GenericObject> {
        match self.route(cluster) {
            Route::Local => {
                self.local
                    .resources_list(gvk, namespace, label_selector)
                    .await
            }
            Route::Forward(cluster) => {
                let mut desc = OperationDescriptor::new(Verb::List, gvk.clone());
                if let Some(ns) = namespace {
                    desc = desc.namespace(ns);
                }
                if let Some(selector) = label_selector {
                    desc = desc.label_selector(selector);
                }
                let api_path = path::build_path(&desc);
                Ok(self
                    .forwarder(&cluster)?
                    .forward_request(&cluster, &api_path)
                    .await?)
            }
        }
    }

    /// Get one resource by name.
    pub async fn resources_get(
        &self,
        gvk: &Gvk,
        namespace: Option<&str>,
        name: &str,
        cluster: Option<&str>,
    ) -> Result<GenericObject> {
        match self.route(cluster) {
            Route::Local => self.local.resources_get(gvk, namespace, name).await,
            Route::Forward(cluster) => {
                let mut desc =
                    OperationDescriptor::new(Verb::Get, gvk.clone()).name(name);
                if let Some(ns) = namespace {
                    desc = desc.namespace(ns);
                }
                let api_path = path::build_path(&desc);
                Ok(self
                    .forwarder(&cluster)?
                    .forward_request(&cluster, &api_path)
                    .await?)
            }
        }
    }

    /// Apply manifest documents (create-or-update). Not supported over the
    /// tunnel; forwarding resolves to an explicit error.
    pub async fn resources_create_or_update(
        &self,
        manifest: &str,
        cluster: Option<&str>,
    ) -> Result<Vec<GenericObject>> {
        match self.route(cluster) {
            Route::Local => self.local.resources_create_or_update(manifest).await,
            Route::Forward(cluster) => Err(unsupported_forward(Verb::Update, &cluster).into()),
        }
    }

    /// Delete one resource by name. Not supported over the tunnel.
    pub async fn resources_delete(
        &self,
        gvk: &Gvk,
        namespace: Option<&str>,
        name: &str,
        cluster: Option<&str>,
    ) -> Result<()> {
        match self.route(cluster) {
            Route::Local => self.local.resources_delete(gvk, namespace, name).await,
            Route::Forward(cluster) => Err(unsupported_forward(Verb::Delete, &cluster).into()),
        }
    }

    /// Read pod logs.
    pub async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        options: &LogOptions,
        cluster: Option<&str>,
    ) -> Result<String> {
        match self.route(cluster) {
            Route::Local => self.local.pod_logs(namespace, pod, options).await,
            Route::Forward(cluster) => Ok(self
                .forwarder(&cluster)?
                .forward_log_request(
                    &cluster,
                    namespace,
                    pod,
                    options.container.as_deref(),
                    options.tail_lines,
                )
                .await?),
        }
    }
}

/// The explicit "not over the tunnel" rejection for mutating verbs.
fn unsupported_forward(verb: Verb, cluster: &str) -> DispatchError {
    debug_assert!(verb.is_mutating());
    DispatchError::Unsupported {
        verb,
        cluster: cluster.to_string(),
    }
}
