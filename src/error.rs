// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy for the multi-cluster dispatch layer.
//!
//! Every failure on the forwarding path names the target cluster and the
//! stage that failed (routing, discovery, transport, remote status, decode),
//! so a caller never sees a bare generic error for a forwarded operation.
//! None of these are retried internally; local-cluster errors from the kube
//! client pass through as `anyhow::Error` and are not part of this taxonomy.

use crate::kubernetes::Verb;

/// Maximum number of body bytes carried in a `RemoteStatus` error.
pub const MAX_BODY_EXCERPT: usize = 512;

/// Maximum number of bytes shown in a `Decode` error preview.
pub const MAX_DECODE_PREVIEW: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Forwarding was requested but no tunnel client is configured.
    #[error("cluster '{cluster}' requested but no tunnel client is configured")]
    Routing { cluster: String },

    /// The operation cannot be forwarded through the tunnel.
    /// Mutating verbs are rejected here instead of silently running locally,
    /// which would execute the mutation against the wrong cluster.
    #[error("{verb} is not supported over the tunnel for cluster '{cluster}'")]
    Unsupported { verb: Verb, cluster: String },

    /// The tunnel ingress route could not be discovered.
    #[error("tunnel route not discovered for cluster '{cluster}': {reason}")]
    Discovery { cluster: String, reason: String },

    /// Network-level failure reaching the tunnel.
    #[error("tunnel request failed for cluster '{cluster}'")]
    Transport {
        cluster: String,
        #[source]
        source: reqwest::Error,
    },

    /// The tunnel or the downstream API answered with a non-2xx status.
    #[error("tunnel returned {status} for cluster '{cluster}': {body}")]
    RemoteStatus {
        cluster: String,
        status: u16,
        body: String,
    },

    /// The response body was not valid JSON where JSON was expected.
    #[error("invalid JSON response ({len} bytes): {preview}")]
    Decode { len: usize, preview: String },
}

impl DispatchError {
    /// Build a `RemoteStatus` error, truncating the body excerpt.
    pub fn remote_status(cluster: &str, status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let excerpt: String = text.chars().take(MAX_BODY_EXCERPT).collect();
        Self::RemoteStatus {
            cluster: cluster.to_string(),
            status,
            body: excerpt,
        }
    }

    /// Build a `Decode` error with a short content preview.
    pub fn decode(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let preview: String = text.chars().take(MAX_DECODE_PREVIEW).collect();
        Self::Decode {
            len: bytes.len(),
            preview,
        }
    }
}
