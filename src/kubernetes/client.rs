// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Local (hub) cluster client.
//!
//! Thin wrapper over `kube` used whenever the dispatcher routes an operation
//! locally. All results are normalized to `GenericObject` so callers see the
//! same shape regardless of which path executed the operation.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{
    Api, ApiResource, DeleteParams, DynamicObject, ListParams, LogParams, Patch, PatchParams,
};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde::Deserialize;
use tracing::debug;

use super::{Gvk, LogOptions, plurals};
use crate::object::GenericObject;

/// Timeout for connecting to the K8s API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading K8s API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Field manager name used for server-side apply
const FIELD_MANAGER: &str = "k8smux";

pub struct LocalClient {
    client: Client,
}

impl LocalClient {
    /// Connect using the kubeconfig, optionally pinning a context.
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let kubeconfig = Kubeconfig::read()?;

        if let Some(ctx) = context
            && !kubeconfig.contexts.iter().any(|c| c.name == ctx)
        {
            return Err(anyhow!("Context '{}' not found in kubeconfig", ctx));
        }

        let mut config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .context("Failed to load kubeconfig")?;

        config.connect_timeout = Some(CONNECT_TIMEOUT);
        config.read_timeout = Some(READ_TIMEOUT);

        let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
        Ok(Self { client })
    }

    fn api_resource(gvk: &Gvk) -> ApiResource {
        let api_version = if gvk.group.is_empty() {
            gvk.version.clone()
        } else {
            format!("{}/{}", gvk.group, gvk.version)
        };
        ApiResource {
            group: gvk.group.clone(),
            version: gvk.version.clone(),
            api_version,
            kind: gvk.kind.clone(),
            plural: plurals::plural_for_kind(&gvk.kind),
        }
    }

    fn dynamic_api(&self, gvk: &Gvk, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = Self::api_resource(gvk);
        match namespace {
            Some(ns) if !plurals::is_cluster_scoped(&gvk.kind) => {
                Api::namespaced_with(self.client.clone(), ns, &ar)
            }
            _ => Api::all_with(self.client.clone(), &ar),
        }
    }

    /// List resources of a type, optionally namespaced and label-filtered.
    pub async fn resources_list(
        &self,
        gvk: &Gvk,
        namespace: Option<&str>,
        label_selector: Option<&str>,
    ) -> Result<GenericObject> {
        let api = self.dynamic_api(gvk, namespace);
        let mut params = ListParams::default();
        if let Some(selector) = label_selector {
            params = params.labels(selector);
        }
        let list = api
            .list(&params)
            .await
            .with_context(|| format!("Failed to list {}", gvk.kind))?;
        Ok(serde_json::to_value(&list)?.into())
    }

    /// Get a single resource by name.
    pub async fn resources_get(
        &self,
        gvk: &Gvk,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<GenericObject> {
        let api = self.dynamic_api(gvk, namespace);
        let obj = api
            .get(name)
            .await
            .with_context(|| format!("Failed to get {} '{}'", gvk.kind, name))?;
        Ok(serde_json::to_value(&obj)?.into())
    }

    /// Apply one or more YAML/JSON manifest documents (server-side apply,
    /// which creates or updates as needed). Returns the applied objects.
    pub async fn resources_create_or_update(&self, manifest: &str) -> Result<Vec<GenericObject>> {
        let mut applied = Vec::new();

        for document in serde_yaml::Deserializer::from_str(manifest) {
            let value = serde_json::Value::deserialize(document)
                .context("Failed to parse manifest document")?;
            if value.is_null() {
                continue;
            }

            let api_version = value
                .get("apiVersion")
                .and_then(serde_json::Value::as_str)
                .context("Manifest document is missing apiVersion")?;
            let kind = value
                .get("kind")
                .and_then(serde_json::Value::as_str)
                .context("Manifest document is missing kind")?;
            let name = value
                .pointer("/metadata/name")
                .and_then(serde_json::Value::as_str)
                .context("Manifest document is missing metadata.name")?
                .to_string();
            let namespace = value
                .pointer("/metadata/namespace")
                .and_then(serde_json::Value::as_str)
                .map(String::from);

            let gvk = Gvk::from_api_version(api_version, kind);
            let api = self.dynamic_api(&gvk, namespace.as_deref());

            debug!(kind = %kind, name = %name, "applying manifest document");
            let params = PatchParams::apply(FIELD_MANAGER).force();
            let obj = api
                .patch(&name, &params, &Patch::Apply(&value))
                .await
                .with_context(|| format!("Failed to apply {} '{}'", kind, name))?;
            applied.push(serde_json::to_value(&obj)?.into());
        }

        if applied.is_empty() {
            return Err(anyhow!("Manifest contained no documents"));
        }
        Ok(applied)
    }

    /// Delete a resource by name.
    pub async fn resources_delete(
        &self,
        gvk: &Gvk,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<()> {
        let api = self.dynamic_api(gvk, namespace);
        api.delete(name, &DeleteParams::default())
            .await
            .with_context(|| format!("Failed to delete {} '{}'", gvk.kind, name))?;
        Ok(())
    }

    /// Read pod logs.
    pub async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        options: &LogOptions,
    ) -> Result<String> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = LogParams {
            container: options.container.clone(),
            tail_lines: (options.tail_lines > 0).then_some(options.tail_lines),
            ..Default::default()
        };
        api.logs(pod, &params)
            .await
            .with_context(|| format!("Failed to read logs for pod '{}'", pod))
    }
}
