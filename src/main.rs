// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kubedemo::config::Config;
use kubedemo::demo::{Demo, DemoOptions};
use kubedemo::kubernetes::create_client;

#[derive(Parser)]
#[command(name = "kubedemo")]
#[command(about = "Walk through the Kubernetes Deployment API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Absolute path to the kubeconfig file; inferred when omitted
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Namespace to operate in
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Name of the demo deployment
    #[arg(long, global = true)]
    name: Option<String>,

    /// Container image for the demo deployment
    #[arg(long, global = true)]
    image: Option<String>,

    /// Number of replicas for the demo deployment
    #[arg(long, global = true)]
    replicas: Option<i32>,

    /// Do not wait for the Return key between steps
    #[arg(short, long, global = true)]
    yes: bool,

    /// Stop watching after this many seconds
    #[arg(long, global = true)]
    watch_timeout: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Clone, Default)]
struct CreateArgs {
    /// Create the namespace if it does not exist
    #[arg(long)]
    create_namespace: bool,

    /// Wait up to this many seconds for all replicas to become ready
    #[arg(long)]
    wait: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, delete and watch in sequence (default)
    Demo {
        #[command(flatten)]
        create: CreateArgs,

        /// Scale down and bump the image after creating
        #[arg(long)]
        update: bool,

        /// Print the deployment before deleting it
        #[arg(long)]
        describe: bool,
    },

    /// Create the demo deployment
    Create {
        #[command(flatten)]
        create: CreateArgs,
    },

    /// Scale to one replica running nginx:1.13
    Update,

    /// List deployments
    List {
        /// Label selector, e.g. app=demo
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// Show the demo deployment
    Describe {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the demo deployment
    Delete,

    /// Watch deployment events
    Watch,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        config.kubeconfig = self.kubeconfig.clone().filter(|p| !p.as_os_str().is_empty());
        config.context = self.context.clone();
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(name) = &self.name {
            config.deployment_name = name.clone();
        }
        if self.yes {
            config.interactive = false;
        }
        if let Some(image) = &self.image {
            config.image = image.clone();
        }
        if let Some(replicas) = self.replicas {
            config.replicas = replicas;
        }
        if self.watch_timeout.is_some() {
            config.watch_timeout_secs = self.watch_timeout;
        }

        config.validate()?;
        Ok(config)
    }

    fn options(&self) -> DemoOptions {
        let mut options = DemoOptions::default();
        match &self.command {
            Some(Commands::Demo {
                create,
                update,
                describe,
            }) => {
                apply_create_args(&mut options, create);
                options.update = *update;
                options.describe = *describe;
            }
            Some(Commands::Create { create }) => apply_create_args(&mut options, create),
            Some(Commands::List { selector }) => options.selector = selector.clone(),
            _ => {}
        }
        options
    }
}

fn apply_create_args(options: &mut DemoOptions, create: &CreateArgs) {
    options.create_namespace = create.create_namespace;
    options.wait_ready = create.wait.map(Duration::from_secs);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout only carries results
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("kubedemo={},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = cli.config().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: namespace={}, deployment={}",
        config.namespace, config.deployment_name
    );

    let client = create_client(&config)
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    let mut demo = Demo::new(client, config, cli.options(), io::stdout());

    let result = match &cli.command {
        None | Some(Commands::Demo { .. }) => demo.run().await,
        Some(Commands::Create { .. }) => demo.create().await,
        Some(Commands::Update) => demo.update().await,
        Some(Commands::List { .. }) => demo.list().await,
        Some(Commands::Describe { json }) => demo.describe(*json).await,
        Some(Commands::Delete) => demo.delete().await,
        Some(Commands::Watch) => demo.watch().await,
    };
    result.context("Deployment operation failed")?;

    Ok(())
}
