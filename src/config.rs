// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{defaults, env as vars};
use crate::error::{DemoError, Result};
use std::env;
use std::path::PathBuf;

/// Program configuration, loaded from environment variables and overridden by flags
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit kubeconfig file; inferred from the environment when unset
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: String,
    pub deployment_name: String,
    pub image: String,
    pub replicas: i32,
    /// Pause for the Return key between steps
    pub interactive: bool,
    /// Bound for the watch step; the watch follows forever when unset
    pub watch_timeout_secs: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            namespace: defaults::NAMESPACE.to_string(),
            deployment_name: defaults::DEPLOYMENT_NAME.to_string(),
            image: defaults::IMAGE.to_string(),
            replicas: defaults::REPLICAS,
            interactive: true,
            watch_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(namespace) = lookup(vars::NAMESPACE) {
            config.namespace = namespace;
        }
        if let Some(name) = lookup(vars::DEPLOYMENT_NAME) {
            config.deployment_name = name;
        }
        if let Some(image) = lookup(vars::IMAGE) {
            config.image = image;
        }
        if let Some(replicas) = lookup(vars::REPLICAS) {
            config.replicas = replicas.trim().parse().map_err(|e| {
                DemoError::ConfigError(format!(
                    "{} must be an integer, got '{}': {}",
                    vars::REPLICAS,
                    replicas,
                    e
                ))
            })?;
        }
        let non_interactive: bool = lookup(vars::NON_INTERACTIVE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        config.interactive = !non_interactive;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.deployment_name.is_empty() {
            return Err(DemoError::ConfigError("deployment name must not be empty".into()));
        }
        if self.namespace.is_empty() {
            return Err(DemoError::ConfigError("namespace must not be empty".into()));
        }
        if self.replicas < 0 {
            return Err(DemoError::ConfigError(format!(
                "replicas must not be negative, got {}",
                self.replicas
            )));
        }
        Ok(())
    }
}
