// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation from kubeconfig files or the ambient environment

use crate::config::Config;
use crate::error::{DemoError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the configured cluster.
///
/// An explicit kubeconfig path wins. Otherwise the config is inferred from
/// `$KUBECONFIG`, `~/.kube/config`, or the in-cluster service account.
#[instrument(skip(config), fields(kubeconfig = ?config.kubeconfig, context = ?config.context))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let options = KubeConfigOptions {
        context: config.context.clone(),
        ..Default::default()
    };

    let client_config = match &config.kubeconfig {
        Some(path) => {
            let kubeconfig = read_kubeconfig(path).await?;
            build_config_from_kubeconfig(&kubeconfig, &options).await?
        }
        None if options.context.is_some() => KConfig::from_kubeconfig(&options)
            .await
            .map_err(|e| {
                DemoError::KubeconfigError(format!("Failed to load kubeconfig context: {}", e))
            })?,
        None => KConfig::infer()
            .await
            .map_err(|e| DemoError::KubeconfigError(format!("Failed to infer config: {}", e)))?,
    };

    info!("Using cluster {}", client_config.cluster_url);

    Client::try_from(client_config)
        .map_err(|e| DemoError::KubeconfigError(format!("Failed to create client: {}", e)))
}

async fn read_kubeconfig(path: &Path) -> Result<String> {
    debug!("Reading kubeconfig from {}", path.display());

    tokio::fs::read_to_string(path).await.map_err(|e| {
        DemoError::KubeconfigError(format!(
            "Failed to read kubeconfig {}: {}",
            path.display(),
            e
        ))
    })
}

/// Build a client config from kubeconfig YAML
async fn build_config_from_kubeconfig(
    kubeconfig: &str,
    options: &KubeConfigOptions,
) -> Result<KConfig> {
    let kubeconfig_parsed = parse_kubeconfig(kubeconfig)?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, options)
        .await
        .map_err(|e| DemoError::KubeconfigError(format!("Failed to create config: {}", e)))
}

fn parse_kubeconfig(kubeconfig: &str) -> Result<Kubeconfig> {
    serde_yaml::from_str(kubeconfig)
        .map_err(|e| DemoError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))
}
