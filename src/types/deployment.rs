// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{defaults, APP_LABEL_KEY};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Shape of the demo deployment: a single container behind an `app` label
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentTemplate {
    pub name: String,
    pub replicas: i32,
    pub app_label: String,
    pub container_name: String,
    pub image: String,
    pub port_name: String,
    pub container_port: i32,
}

impl DeploymentTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replicas: defaults::REPLICAS,
            app_label: defaults::APP_LABEL.to_string(),
            container_name: defaults::CONTAINER_NAME.to_string(),
            image: defaults::IMAGE.to_string(),
            port_name: defaults::PORT_NAME.to_string(),
            container_port: defaults::CONTAINER_PORT,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_replicas(mut self, replicas: i32) -> Self {
        self.replicas = replicas;
        self
    }

    fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(APP_LABEL_KEY.to_string(), self.app_label.clone())])
    }

    /// Build the Deployment object sent to the API server
    pub fn build(&self) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(self.replicas),
                selector: LabelSelector {
                    match_labels: Some(self.labels()),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(self.labels()),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![Container {
                            name: self.container_name.clone(),
                            image: Some(self.image.clone()),
                            ports: Some(vec![ContainerPort {
                                name: Some(self.port_name.clone()),
                                protocol: Some("TCP".to_string()),
                                container_port: self.container_port,
                                ..Default::default()
                            }]),
                            ..Default::default()
                        }],
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Human-readable view of a deployment's spec and rollout status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub name: String,
    pub namespace: String,
    pub desired_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub images: Vec<String>,
    pub available: bool,
}

impl DeploymentSummary {
    /// All desired replicas are ready
    pub fn is_rolled_out(&self) -> bool {
        self.ready_replicas >= self.desired_replicas
    }
}

impl From<&Deployment> for DeploymentSummary {
    fn from(deployment: &Deployment) -> Self {
        let spec = deployment.spec.as_ref();
        let status = deployment.status.as_ref();

        let images = spec
            .and_then(|s| s.template.spec.as_ref())
            .map(|pod| {
                pod.containers
                    .iter()
                    .filter_map(|c| c.image.clone())
                    .collect()
            })
            .unwrap_or_default();

        // The API server defaults an unset replica count to 1
        let desired_replicas = spec.and_then(|s| s.replicas).unwrap_or(1);

        Self {
            name: deployment.name_any(),
            namespace: deployment.namespace().unwrap_or_default(),
            desired_replicas,
            ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
            available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
            images,
            available: is_available(deployment),
        }
    }
}

impl fmt::Display for DeploymentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:      {}", self.name)?;
        writeln!(f, "Namespace: {}", self.namespace)?;
        writeln!(
            f,
            "Replicas:  {} desired | {} ready | {} available",
            self.desired_replicas, self.ready_replicas, self.available_replicas
        )?;
        writeln!(f, "Images:    {}", self.images.join(", "))?;
        write!(f, "Available: {}", self.available)
    }
}

/// Check the `Available` condition of a deployment
pub fn is_available(deployment: &Deployment) -> bool {
    deployment
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Available" && c.status == "True")
        })
}
