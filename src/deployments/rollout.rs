// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for a deployment rollout to finish

use crate::constants::rollout::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::deployments::crud::describe_deployment;
use crate::error::{DemoError, Result};
use crate::types::DeploymentSummary;
use kube::Client;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{info, instrument, warn};

/// Poll a deployment until all desired replicas report ready.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
#[instrument(skip(client))]
pub async fn wait_for_available(
    client: &Client,
    namespace: &str,
    name: &str,
    timeout: Duration,
) -> Result<DeploymentSummary> {
    let deadline = Instant::now() + timeout;
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match describe_deployment(client, namespace, name).await {
            Ok(deployment) => {
                let summary = DeploymentSummary::from(&deployment);
                if summary.is_rolled_out() {
                    info!(
                        "Deployment {}/{} is ready ({}/{} replicas)",
                        namespace, name, summary.ready_replicas, summary.desired_replicas
                    );
                    return Ok(summary);
                }
                info!(
                    "Deployment {}/{} has {}/{} ready replicas, waiting {} seconds...",
                    namespace, name, summary.ready_replicas, summary.desired_replicas, interval
                );
            }
            Err(e) if e.is_not_found() => return Err(e),
            Err(e) => {
                warn!(
                    "Error checking deployment {}/{}: {}, retrying in {} seconds...",
                    namespace, name, e, interval
                );
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(DemoError::Timeout {
                what: format!("deployment {}/{} to become ready", namespace, name),
                secs: timeout.as_secs(),
            });
        }
        sleep(Duration::from_secs(interval).min(deadline - now)).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}
