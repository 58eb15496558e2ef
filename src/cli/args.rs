// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "k8smux")]
#[command(author, version, about = "Run Kubernetes operations locally or on managed clusters")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Managed cluster to run against; omit to use the local cluster
    #[arg(long, global = true, value_name = "CLUSTER")]
    pub cluster: Option<String>,

    /// Enable forwarding through the hub's cluster-proxy tunnel
    #[arg(long, global = true)]
    pub multi_cluster: bool,

    /// Hub API server URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub hub_url: Option<String>,

    /// Bearer token for the hub; falls back to $K8SMUX_TOKEN
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Accept invalid TLS certificates from the hub/tunnel
    #[arg(long, global = true)]
    pub insecure_skip_tls_verify: bool,

    /// Kubeconfig context for local operations
    #[arg(short, long, global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Omit table headers in output
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List pods, in one namespace or across all
    Pods {
        /// Namespace; omit to list across all namespaces
        #[arg(short, long)]
        namespace: Option<String>,

        /// Label selector (e.g. "app=web")
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// List namespaces
    Namespaces {
        /// Label selector
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// List resources of an arbitrary type
    List {
        /// Resource kind (e.g. Deployment)
        kind: String,

        /// API version (e.g. "v1", "apps/v1")
        #[arg(long, default_value = "v1")]
        api_version: String,

        /// Namespace; omit for cluster scope / all namespaces
        #[arg(short, long)]
        namespace: Option<String>,

        /// Label selector
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// Get one resource by name
    Get {
        /// Resource kind (e.g. Deployment)
        kind: String,

        /// Resource name
        name: String,

        /// API version (e.g. "v1", "apps/v1")
        #[arg(long, default_value = "v1")]
        api_version: String,

        /// Namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Apply manifest file(s) (create or update; local cluster only)
    Apply {
        /// Manifest file path
        #[arg(short, long)]
        file: String,
    },

    /// Delete one resource by name (local cluster only)
    Delete {
        /// Resource kind
        kind: String,

        /// Resource name
        name: String,

        /// API version (e.g. "v1", "apps/v1")
        #[arg(long, default_value = "v1")]
        api_version: String,

        /// Namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Read pod logs
    Logs {
        /// Pod name
        pod: String,

        /// Namespace
        #[arg(short, long, default_value = "default")]
        namespace: String,

        /// Container name
        #[arg(short = 'C', long)]
        container: Option<String>,

        /// Number of lines from the end; 0 reads from the beginning
        #[arg(long, default_value = "0")]
        tail: i64,
    },

    /// List managed clusters registered on the hub
    Clusters,

    /// Check that a managed cluster is reachable through the tunnel
    Validate {
        /// Managed cluster name
        cluster: String,
    },
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}
