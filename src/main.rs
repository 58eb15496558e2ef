// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
pub mod config;
mod dispatch;
mod error;
mod kubernetes;
mod object;
mod output;
mod tunnel;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::prelude::*;

use cli::{Args, Command};
use dispatch::{DispatchMode, Dispatcher};
use kubernetes::{Gvk, LocalClient, LogOptions};
use tunnel::{ResourceForwarder, TunnelClient, TunnelConfig};

/// Initialize logging to stderr; -v switches the default level to debug.
fn init_logging(verbose: bool) {
    let filter = if verbose { "k8smux=debug" } else { "k8smux=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

/// Effective settings after merging flags, environment, and the config file.
struct Settings {
    multi_cluster: bool,
    hub_url: Option<String>,
    token: Option<String>,
    insecure_skip_tls_verify: bool,
}

impl Settings {
    fn resolve(args: &Args) -> Self {
        let file = config::Config::load().unwrap_or_else(|e| {
            warn!("Could not load config file: {e:#}");
            config::Config::default()
        });
        Self {
            multi_cluster: args.multi_cluster || file.multi_cluster,
            hub_url: args.hub_url.clone().or(file.hub_url),
            token: args
                .token
                .clone()
                .or_else(|| std::env::var("K8SMUX_TOKEN").ok().filter(|t| !t.is_empty())),
            insecure_skip_tls_verify: args.insecure_skip_tls_verify
                || file.insecure_skip_tls_verify,
        }
    }
}

/// Build the tunnel client when multi-cluster mode is on and the hub is
/// fully specified. Missing pieces are warned about, not fatal: the
/// dispatcher then routes everything locally.
fn build_tunnel(settings: &Settings) -> Result<Option<Arc<TunnelClient>>> {
    if !settings.multi_cluster {
        return Ok(None);
    }
    let Some(hub_url) = &settings.hub_url else {
        warn!("--multi-cluster set but no hub URL configured; forwarding unavailable");
        return Ok(None);
    };
    let Some(token) = &settings.token else {
        warn!("--multi-cluster set but no token provided (--token or $K8SMUX_TOKEN); forwarding unavailable");
        return Ok(None);
    };

    let client = TunnelClient::new(TunnelConfig {
        server_url: hub_url.clone(),
        token: token.clone(),
        insecure_skip_tls_verify: settings.insecure_skip_tls_verify,
    })?;
    Ok(Some(Arc::new(client)))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (aws-lc-rs)
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let args = Args::parse();
    init_logging(args.verbose);

    let settings = Settings::resolve(&args);
    let tunnel = build_tunnel(&settings)?;

    // Hub-only commands talk to the control API; no local client needed.
    match &args.command {
        Command::Clusters => {
            let tunnel = tunnel.context(
                "listing managed clusters requires --multi-cluster with a hub URL and token",
            )?;
            let names = tunnel.list_managed_clusters().await?;
            for name in names {
                println!("{name}");
            }
            return Ok(());
        }
        Command::Validate { cluster } => {
            let tunnel = tunnel.context(
                "validating a cluster requires --multi-cluster with a hub URL and token",
            )?;
            tunnel.validate_cluster(cluster).await?;
            println!("cluster '{cluster}' is reachable through the tunnel");
            return Ok(());
        }
        _ => {}
    }

    if args.cluster.is_some()
        && let Some(tunnel) = &tunnel
        && !tunnel.is_hub_environment().await
    {
        warn!("hub does not expose the managed-cluster API; forwarding may fail");
    }

    let local = LocalClient::connect(args.context.as_deref()).await?;
    let forwarder = tunnel
        .clone()
        .map(|t| t as Arc<dyn ResourceForwarder>);
    let dispatcher = Dispatcher::new(
        local,
        forwarder,
        DispatchMode {
            forwarding_enabled: settings.multi_cluster,
        },
    );

    let cluster = args.cluster.as_deref();
    match &args.command {
        Command::Pods {
            namespace,
            selector,
        } => {
            let result = dispatcher
                .pods_list(namespace.as_deref(), selector.as_deref(), cluster)
                .await?;
            println!("{}", output::format(&result, &args.output, args.no_headers));
        }
        Command::Namespaces { selector } => {
            let result = dispatcher
                .namespaces_list(selector.as_deref(), cluster)
                .await?;
            println!("{}", output::format(&result, &args.output, args.no_headers));
        }
        Command::List {
            kind,
            api_version,
            namespace,
            selector,
        } => {
            let gvk = Gvk::from_api_version(api_version, kind);
            let result = dispatcher
                .resources_list(&gvk, namespace.as_deref(), selector.as_deref(), cluster)
                .await?;
            println!("{}", output::format(&result, &args.output, args.no_headers));
        }
        Command::Get {
            kind,
            name,
            api_version,
            namespace,
        } => {
            let gvk = Gvk::from_api_version(api_version, kind);
            let result = dispatcher
                .resources_get(&gvk, namespace.as_deref(), name, cluster)
                .await?;
            println!("{}", output::format(&result, &args.output, args.no_headers));
        }
        Command::Apply { file } => {
            let manifest = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read manifest file: {file}"))?;
            let applied = dispatcher
                .resources_create_or_update(&manifest, cluster)
                .await?;
            for obj in &applied {
                println!(
                    "{}/{} applied",
                    obj.kind().unwrap_or("object"),
                    obj.name().unwrap_or("?")
                );
            }
        }
        Command::Delete {
            kind,
            name,
            api_version,
            namespace,
        } => {
            let gvk = Gvk::from_api_version(api_version, kind);
            dispatcher
                .resources_delete(&gvk, namespace.as_deref(), name, cluster)
                .await?;
            println!("{kind}/{name} deleted");
        }
        Command::Logs {
            pod,
            namespace,
            container,
            tail,
        } => {
            let options = LogOptions {
                container: container.clone(),
                tail_lines: *tail,
            };
            let logs = dispatcher
                .pod_logs(namespace, pod, &options, cluster)
                .await?;
            print!("{logs}");
        }
        Command::Clusters | Command::Validate { .. } => unreachable!("handled above"),
    }

    Ok(())
}
