pub mod path;
mod route;

mod client;

pub use client::{TunnelClient, TunnelConfig};

use async_trait::async_trait;

use crate::error::DispatchError;
use crate::object::GenericObject;

/// Forwarding capability held by the dispatcher.
///
/// The dispatcher owns an `Option<Arc<dyn ResourceForwarder>>` rather than an
/// opaque handle, so "tunnel configured" is simply `Some` and no downcasting
/// happens at the point of use.
#[async_trait]
pub trait ResourceForwarder: Send + Sync {
    /// Forward a GET for `path` (a Kubernetes API path, `?query` included)
    /// to the managed cluster and decode the JSON body.
    async fn forward_request(
        &self,
        cluster: &str,
        path: &str,
    ) -> Result<GenericObject, DispatchError>;

    /// Forward a pod log read and return the plain-text body.
    async fn forward_log_request(
        &self,
        cluster: &str,
        namespace: &str,
        pod: &str,
        container: Option<&str>,
        tail_lines: i64,
    ) -> Result<String, DispatchError>;
}
