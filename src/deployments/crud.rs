// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create, read, update and delete calls against the apps/v1 Deployment API

use crate::error::{DemoError, Result};
use crate::retry::{retry_on_conflict, RetryPolicy};
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{debug, info, instrument};

fn deployments(client: &Client, namespace: &str) -> Api<Deployment> {
    Api::namespaced(client.clone(), namespace)
}

/// Create a deployment in the given namespace
#[instrument(skip(client, deployment), fields(deployment = %deployment.name_any()))]
pub async fn create_deployment(
    client: &Client,
    namespace: &str,
    deployment: &Deployment,
) -> Result<Deployment> {
    info!("Creating deployment {}/{}", namespace, deployment.name_any());
    let created = deployments(client, namespace)
        .create(&PostParams::default(), deployment)
        .await?;
    debug!(
        "Created deployment {}/{} at resourceVersion {:?}",
        namespace,
        created.name_any(),
        created.resource_version()
    );
    Ok(created)
}

/// List deployments, optionally narrowed by a label selector
#[instrument(skip(client))]
pub async fn list_deployments(
    client: &Client,
    namespace: &str,
    selector: Option<&str>,
) -> Result<Vec<Deployment>> {
    let mut lp = ListParams::default();
    if let Some(selector) = selector {
        lp = lp.labels(selector);
    }

    let list = deployments(client, namespace).list(&lp).await?;
    debug!("Listed {} deployments in {}", list.items.len(), namespace);
    Ok(list.items)
}

/// Fetch the current state of a single deployment
#[instrument(skip(client))]
pub async fn describe_deployment(client: &Client, namespace: &str, name: &str) -> Result<Deployment> {
    Ok(deployments(client, namespace).get(name).await?)
}

/// Scale a deployment and swap the image of its first container.
///
/// Each attempt re-reads the latest version before replacing it, so a
/// concurrent writer only costs a retry.
#[instrument(skip(client, policy))]
pub async fn update_deployment(
    client: &Client,
    namespace: &str,
    name: &str,
    replicas: i32,
    image: &str,
    policy: &RetryPolicy,
) -> Result<Deployment> {
    info!("Updating deployment {}/{}", namespace, name);
    let api = deployments(client, namespace);

    let updated = retry_on_conflict(policy, || {
        let api = api.clone();
        async move {
            let mut latest = api.get(name).await?;
            apply_update(&mut latest, replicas, image)?;
            Ok::<_, DemoError>(api.replace(name, &PostParams::default(), &latest).await?)
        }
    })
    .await?;

    info!(
        "Updated deployment {}/{} to {} replicas of {}",
        namespace, name, replicas, image
    );
    Ok(updated)
}

fn apply_update(deployment: &mut Deployment, replicas: i32, image: &str) -> Result<()> {
    let name = deployment.name_any();
    let spec = deployment
        .spec
        .as_mut()
        .ok_or_else(|| DemoError::NoContainers(name.clone()))?;
    spec.replicas = Some(replicas);

    let container = spec
        .template
        .spec
        .as_mut()
        .and_then(|pod| pod.containers.first_mut())
        .ok_or(DemoError::NoContainers(name))?;
    container.image = Some(image.to_string());
    Ok(())
}

/// Delete a deployment, letting the garbage collector remove dependents first
#[instrument(skip(client))]
pub async fn delete_deployment(client: &Client, namespace: &str, name: &str) -> Result<()> {
    info!("Deleting deployment {}/{}", namespace, name);
    deployments(client, namespace)
        .delete(name, &DeleteParams::foreground())
        .await?
        .map_left(|d| debug!("Deployment {} is being deleted", d.name_any()))
        .map_right(|s| debug!("Deployment {} deleted: {:?}", name, s.status));
    info!("Deleted deployment {}/{}", namespace, name);
    Ok(())
}
