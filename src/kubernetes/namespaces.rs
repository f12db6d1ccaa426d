// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{DemoError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::PostParams, Api, Client};
use tracing::{debug, info, instrument};

/// Make sure `namespace` exists, creating it when it is missing.
///
/// Returns whether this call created it. Losing a creation race to another
/// client counts as the namespace already existing.
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<bool> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    let existing = namespaces
        .get_opt(namespace)
        .await
        .map_err(|e| DemoError::NamespaceError(format!("looking up {}: {}", namespace, e)))?;
    if existing.is_some() {
        debug!("Namespace {} found", namespace);
        return Ok(false);
    }

    let mut ns = Namespace::default();
    ns.metadata.name = Some(namespace.to_string());
    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            info!("Created namespace {}", namespace);
            Ok(true)
        }
        Err(kube::Error::Api(resp)) if resp.reason == "AlreadyExists" => {
            debug!("Namespace {} was created concurrently", namespace);
            Ok(false)
        }
        Err(e) => Err(DemoError::NamespaceError(format!(
            "creating {}: {}",
            namespace, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{namespace_json, status_json, MockService};

    #[tokio::test]
    async fn test_existing_namespace_is_left_alone() {
        let mock = MockService::new().on_get("/api/v1/namespaces/apps", 200, &namespace_json("apps"));
        let client = mock.clone().into_client();

        let created = ensure_namespace_exists(&client, "apps").await.unwrap();

        assert!(!created);
        assert!(mock.requests().iter().all(|r| r.method == "GET"));
    }

    #[tokio::test]
    async fn test_missing_namespace_is_created() {
        let mock = MockService::new().on_post("/api/v1/namespaces", 201, &namespace_json("apps"));
        let client = mock.clone().into_client();

        let created = ensure_namespace_exists(&client, "apps").await.unwrap();

        assert!(created);
        let posts = mock.requests_for("POST");
        assert_eq!(posts.len(), 1);
        let body: serde_json::Value = serde_json::from_str(&posts[0].body).unwrap();
        assert_eq!(body["metadata"]["name"], "apps");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_namespace_error() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/apps",
            403,
            &status_json(403, "Forbidden", "namespaces \"apps\" is forbidden"),
        );
        let client = mock.into_client();

        let result = ensure_namespace_exists(&client, "apps").await;
        assert!(matches!(result, Err(DemoError::NamespaceError(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creation_counts_as_existing() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            409,
            &status_json(409, "AlreadyExists", "namespaces \"apps\" already exists"),
        );
        let client = mock.into_client();

        let created = ensure_namespace_exists(&client, "apps").await.unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_create_failure_is_namespace_error() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            403,
            &status_json(403, "Forbidden", "namespaces is forbidden"),
        );
        let client = mock.into_client();

        let result = ensure_namespace_exists(&client, "apps").await;
        assert!(matches!(result, Err(DemoError::NamespaceError(_))));
    }
}
