// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The guided walk through the Deployment API: create, list, delete, watch.

use crate::config::Config;
use crate::constants::update;
use crate::deployments::{
    create_deployment, delete_deployment, describe_deployment, list_deployments,
    update_deployment, wait_for_available, watch_deployments,
};
use crate::error::Result;
use crate::kubernetes::ensure_namespace_exists;
use crate::prompt::wait_for_return;
use crate::retry::RetryPolicy;
use crate::types::{DeploymentSummary, DeploymentTemplate};
use kube::{Client, ResourceExt};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::{info, instrument, warn};

/// Optional steps and tweaks on top of the basic sequence
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Scale down and bump the image after creating
    pub update: bool,
    /// Print a summary of the deployment before deleting it
    pub describe: bool,
    /// Wait up to this long for the rollout after creating
    pub wait_ready: Option<Duration>,
    pub create_namespace: bool,
    /// Label selector applied when listing
    pub selector: Option<String>,
}

type Input = BufReader<Box<dyn AsyncRead + Unpin + Send>>;

/// Runs demo steps against a cluster and writes their output to `out`
pub struct Demo<W> {
    client: Client,
    config: Config,
    options: DemoOptions,
    retry: RetryPolicy,
    out: W,
    /// Shared by every pause so read-ahead from piped input is not lost
    input: Input,
    prompt_out: Box<dyn AsyncWrite + Unpin + Send>,
}

impl<W: Write> Demo<W> {
    pub fn new(client: Client, config: Config, options: DemoOptions, out: W) -> Self {
        Self {
            client,
            config,
            options,
            retry: RetryPolicy::default(),
            out,
            input: BufReader::new(Box::new(tokio::io::stdin())),
            prompt_out: Box::new(tokio::io::stdout()),
        }
    }

    /// Read Return presses from `input` and write prompts to `prompt_out`
    /// instead of the terminal
    pub fn with_terminal<R, P>(mut self, input: R, prompt_out: P) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        P: AsyncWrite + Unpin + Send + 'static,
    {
        self.input = BufReader::new(Box::new(input));
        self.prompt_out = Box::new(prompt_out);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the full sequence
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Starting demo for deployment {}/{}",
            self.config.namespace, self.config.deployment_name
        );

        match self.create().await {
            Ok(()) => {}
            Err(e) if e.is_already_exists() => {
                warn!(
                    "Deployment {} already exists, continuing with the existing one",
                    self.config.deployment_name
                );
            }
            Err(e) => return Err(e),
        }

        if self.options.update {
            self.update().await?;
        }

        self.list().await?;

        if self.options.describe {
            self.describe(false).await?;
        }

        self.delete().await?;
        self.watch().await?;

        info!("Demo finished");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create(&mut self) -> Result<()> {
        let namespace = self.config.namespace.clone();
        if self.options.create_namespace {
            ensure_namespace_exists(&self.client, &namespace).await?;
        }

        writeln!(self.out, "Creating deployment...")?;
        let deployment = DeploymentTemplate::new(&self.config.deployment_name)
            .with_image(&self.config.image)
            .with_replicas(self.config.replicas)
            .build();
        let created = create_deployment(&self.client, &namespace, &deployment).await?;
        writeln!(self.out, "Created deployment {:?}.", created.name_any())?;

        if let Some(timeout) = self.options.wait_ready {
            let summary =
                wait_for_available(&self.client, &namespace, &created.name_any(), timeout).await?;
            writeln!(
                self.out,
                "Deployment {:?} is ready with {}/{} replicas.",
                summary.name, summary.ready_replicas, summary.desired_replicas
            )?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update(&mut self) -> Result<()> {
        self.pause().await?;
        writeln!(self.out, "Updating deployment...")?;
        let updated = update_deployment(
            &self.client,
            &self.config.namespace,
            &self.config.deployment_name,
            update::REPLICAS,
            update::IMAGE,
            &self.retry,
        )
        .await?;
        writeln!(self.out, "Updated deployment {:?}.", updated.name_any())?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&mut self) -> Result<()> {
        self.pause().await?;
        writeln!(
            self.out,
            "Listing deployments in namespace {:?}:",
            self.config.namespace
        )?;
        let deployments = list_deployments(
            &self.client,
            &self.config.namespace,
            self.options.selector.as_deref(),
        )
        .await?;
        for deployment in &deployments {
            writeln!(self.out, "{}", deployment.name_any())?;
        }
        Ok(())
    }

    /// Print the deployment summary, as text or JSON
    #[instrument(skip(self))]
    pub async fn describe(&mut self, json: bool) -> Result<()> {
        self.pause().await?;
        let deployment = describe_deployment(
            &self.client,
            &self.config.namespace,
            &self.config.deployment_name,
        )
        .await?;
        let summary = DeploymentSummary::from(&deployment);
        if json {
            writeln!(self.out, "{}", serde_json::to_string_pretty(&summary)?)?;
        } else {
            writeln!(self.out, "{}", summary)?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self) -> Result<()> {
        self.pause().await?;
        writeln!(self.out, "Deleting deployment...")?;
        delete_deployment(
            &self.client,
            &self.config.namespace,
            &self.config.deployment_name,
        )
        .await?;
        writeln!(self.out, "Deleted deployment.")?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn watch(&mut self) -> Result<()> {
        self.pause().await?;
        writeln!(
            self.out,
            "Watching deployments in namespace {:?}:",
            self.config.namespace
        )?;
        self.out.flush()?;

        let timeout = self
            .config
            .watch_timeout_secs
            .map(|secs| Duration::from_secs(secs.into()));
        let out = &mut self.out;
        watch_deployments(&self.client, &self.config.namespace, timeout, |event| {
            if let Err(e) = writeln!(out, "{}", event).and_then(|_| out.flush()) {
                warn!("Failed to print watch event: {}", e);
            }
        })
        .await
    }

    async fn pause(&mut self) -> Result<()> {
        if !self.config.interactive {
            return Ok(());
        }
        self.out.flush()?;
        wait_for_return(&mut self.input, &mut self.prompt_out).await
    }
}
