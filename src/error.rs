// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Deployment {0} has no containers")]
    NoContainers(String),

    #[error("Timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DemoError {
    /// HTTP status code of the underlying API error, if any
    pub fn api_code(&self) -> Option<u16> {
        match self {
            DemoError::KubeError(kube::Error::Api(resp)) => Some(resp.code),
            _ => None,
        }
    }

    /// An optimistic-concurrency conflict: the object changed since it was read
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DemoError::KubeError(kube::Error::Api(resp)) if resp.code == 409 && resp.reason == "Conflict"
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.api_code() == Some(404)
    }

    /// A create was rejected because the object is already there
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            DemoError::KubeError(kube::Error::Api(resp)) if resp.code == 409 && resp.reason == "AlreadyExists"
        )
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;
