// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP transport to the cluster-proxy tunnel.
//!
//! One `TunnelClient` instance is shared read-only across concurrent
//! operations: the reqwest client, hub URL, bearer token and resolved route
//! are immutable after construction. Requests are bounded by a 30s client
//! timeout composed with whatever deadline the caller applies; dropping the
//! returned future releases the connection.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, warn};
use url::Url;

use super::ResourceForwarder;
use super::path;
use super::route::RouteResolver;
use crate::error::DispatchError;
use crate::object::{self, GenericObject};

/// Upper bound on any single tunnel request, independent of caller deadlines.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("k8smux/", env!("CARGO_PKG_VERSION"));

/// Hub API group that managed-cluster metadata lives under.
const MANAGED_CLUSTER_API: &str = "/apis/cluster.open-cluster-management.io/v1";

/// Connection settings for the hub's control API.
#[derive(Debug, Clone)]
pub struct TunnelConfig {
    /// Hub API server URL (e.g. "https://api.hub.example.com:6443").
    pub server_url: String,
    /// Bearer token presented on every request.
    pub token: String,
    /// Accept invalid TLS certificates from the hub and the tunnel route.
    /// Strict validation is the default; enabling this is logged.
    pub insecure_skip_tls_verify: bool,
}

/// Client for forwarding Kubernetes API requests through the tunnel route.
pub struct TunnelClient {
    http: reqwest::Client,
    server_url: Url,
    token: String,
    route: RouteResolver,
}

impl TunnelClient {
    pub fn new(config: TunnelConfig) -> Result<Self> {
        let server_url = Url::parse(config.server_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid hub server URL: {}", config.server_url))?;

        if config.insecure_skip_tls_verify {
            warn!("TLS certificate validation disabled for tunnel requests");
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()
            .context("Failed to build tunnel HTTP client")?;

        Ok(Self {
            http,
            server_url,
            token: config.token,
            route: RouteResolver::new(),
        })
    }

    /// Absolute URL for a path on the hub's own API server.
    fn hub_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url.as_str().trim_end_matches('/'), path)
    }

    /// Resolve the tunnel route host, fetching the Route object on first use.
    async fn route_host(&self, cluster: &str) -> Result<&str, DispatchError> {
        let url = self.hub_url(&RouteResolver::discovery_path());
        let http = &self.http;
        let token = &self.token;
        self.route
            .host_or_resolve(|| async move {
                let response = http
                    .get(&url)
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                let status = response.status();
                if !status.is_success() {
                    return Err(format!("route lookup returned {status}"));
                }
                let body = response.bytes().await.map_err(|e| e.to_string())?;
                Ok(body.to_vec())
            })
            .await
            .map_err(|reason| DispatchError::Discovery {
                cluster: cluster.to_string(),
                reason,
            })
    }

    /// Issue a GET through the tunnel and return the raw body on 2xx.
    async fn forward_raw(
        &self,
        cluster: &str,
        api_path: &str,
        accept: &str,
    ) -> Result<Vec<u8>, DispatchError> {
        let host = self.route_host(cluster).await?;
        // Route-based scheme: https://{host}/{cluster}{apiPath}. The scheme
        // follows the hub URL so a plain-http dev hub forwards over http.
        let url = format!("{}://{}/{}{}", self.server_url.scheme(), host, cluster, api_path);
        debug!(cluster = %cluster, url = %url, "forwarding request through tunnel");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|source| DispatchError::Transport {
                cluster: cluster.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| DispatchError::Transport {
                cluster: cluster.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(DispatchError::remote_status(cluster, status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    /// Check whether a managed cluster is reachable through the tunnel.
    pub async fn validate_cluster(&self, cluster: &str) -> Result<(), DispatchError> {
        self.forward_raw(cluster, "/api/v1", "application/json")
            .await?;
        debug!(cluster = %cluster, "cluster validated through tunnel");
        Ok(())
    }

    /// Check whether the hub exposes the managed-cluster API at all.
    pub async fn is_hub_environment(&self) -> bool {
        let url = self.hub_url(MANAGED_CLUSTER_API);
        match self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// List the names of managed clusters registered on the hub.
    pub async fn list_managed_clusters(&self) -> Result<Vec<String>, DispatchError> {
        let url = self.hub_url(&format!("{MANAGED_CLUSTER_API}/managedclusters"));
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| DispatchError::Transport {
                cluster: "hub".to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| DispatchError::Transport {
                cluster: "hub".to_string(),
                source,
            })?;
        if !status.is_success() {
            return Err(DispatchError::remote_status("hub", status.as_u16(), &body));
        }

        let list = object::decode(&body)?;
        let names = list
            .items()
            .iter()
            .filter_map(|item| {
                item.pointer("/metadata/name")
                    .and_then(serde_json::Value::as_str)
                    .map(String::from)
            })
            .collect();
        Ok(names)
    }
}

#[async_trait]
impl ResourceForwarder for TunnelClient {
    async fn forward_request(
        &self,
        cluster: &str,
        path: &str,
    ) -> Result<GenericObject, DispatchError> {
        let body = self.forward_raw(cluster, path, "application/json").await?;
        object::decode(&body)
    }

    async fn forward_log_request(
        &self,
        cluster: &str,
        namespace: &str,
        pod: &str,
        container: Option<&str>,
        tail_lines: i64,
    ) -> Result<String, DispatchError> {
        let log_path = path::build_log_path(namespace, pod, container, tail_lines);
        let body = self.forward_raw(cluster, &log_path, "text/plain").await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
