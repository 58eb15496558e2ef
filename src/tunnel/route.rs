// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Discovery of the cluster-proxy ingress route.
//!
//! The tunnel is reached through an OpenShift Route published in the
//! multicluster-engine namespace. One authenticated read of that Route
//! object yields the externally reachable host; only `spec.host` is decoded,
//! so key order and unrelated `host` fields elsewhere in the document cannot
//! mis-resolve the route.
//!
//! Resolution is lazy and cached: the first forward that needs the host
//! triggers the read, concurrent callers coalesce on the same in-flight
//! attempt, and failures are not cached so a later forward retries.

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

/// Namespace holding the cluster-proxy Route.
const ROUTE_NAMESPACE: &str = "multicluster-engine";

/// Name of the cluster-proxy Route object.
const ROUTE_NAME: &str = "cluster-proxy-addon-user";

/// Scoped view of a Route object: everything except `spec.host` is ignored.
#[derive(Debug, Deserialize)]
struct RouteEnvelope {
    #[serde(default)]
    spec: RouteSpec,
}

#[derive(Debug, Default, Deserialize)]
struct RouteSpec {
    host: Option<String>,
}

/// Resolves and caches the tunnel's ingress host.
#[derive(Debug)]
pub struct RouteResolver {
    host: OnceCell<String>,
}

impl RouteResolver {
    pub fn new() -> Self {
        Self {
            host: OnceCell::new(),
        }
    }

    /// The hub API path of the well-known Route object.
    pub fn discovery_path() -> String {
        format!("/apis/route.openshift.io/v1/namespaces/{ROUTE_NAMESPACE}/routes/{ROUTE_NAME}")
    }

    /// Return the cached host, resolving it on first use.
    ///
    /// `fetch` performs the authenticated read of the Route object and
    /// returns its raw body. Errors are returned to the caller but never
    /// cached; the route stays unresolved until a read succeeds.
    pub async fn host_or_resolve<F, Fut>(&self, fetch: F) -> Result<&str, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, String>>,
    {
        self.host
            .get_or_try_init(|| async {
                let body = fetch().await?;
                match extract_route_host(&body) {
                    Some(host) => {
                        debug!(host = %host, "discovered cluster-proxy route");
                        Ok(host)
                    }
                    None => Err("route object has no spec.host field".to_string()),
                }
            })
            .await
            .map(String::as_str)
    }

    /// The resolved host, if discovery already succeeded.
    #[cfg(test)]
    pub fn cached_host(&self) -> Option<&str> {
        self.host.get().map(String::as_str)
    }
}

/// Extract `spec.host` from a Route body. Returns None on malformed JSON or
/// a missing field; discovery failures are non-fatal at this layer.
fn extract_route_host(body: &[u8]) -> Option<String> {
    let envelope: RouteEnvelope = serde_json::from_slice(body).ok()?;
    envelope.spec.host.filter(|h| !h.is_empty())
}
