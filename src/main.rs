#![deny(clippy::unwrap_used)]

mod cmd;
mod common;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use common::STARTING;
use kubedeploy::{config::DEFAULT_CONFIG_FILE, vault::EnvSecretStore};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    let cli = KubeDeploy::parse();

    tracing_subscriber::registry()
        // Filter spans based on the verbosity flags.
        .with(eval_logging(&cli))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        // Install this registry as the global tracing registry.
        .try_init()
        .context("error initializing logging")?;

    tracing::info!(
        "{} Starting {} {}",
        STARTING,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    cli.run()
}

fn eval_logging(cli: &KubeDeploy) -> tracing_subscriber::EnvFilter {
    let directives = match (cli.verbose, cli.quiet) {
        // quiet overrides verbose
        (_, true) => "error,kubedeploy=warn",
        // increase verbosity
        (0, false) => "error,kubedeploy=info",
        (1, false) => "error,kubedeploy=debug",
        (_, false) => "error,kubedeploy=trace",
    };
    tracing_subscriber::EnvFilter::new(directives)
}

/// Resolve a layered deployment configuration into per-instance environments.
#[derive(Parser)]
#[command(about, author, version)]
struct KubeDeploy {
    #[command(subcommand)]
    action: KubeDeploySubcommands,
    /// Path to the deployment config file
    #[arg(
        long,
        env = "KUBEDEPLOY_CONFIG",
        global(true),
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,
    /// Enable verbose logging.
    #[arg(short, long, global(true), action=ArgAction::Count)]
    pub verbose: u8,
    /// Be more quiet, conflicts with --verbose
    #[arg(short, long, global(true), conflicts_with("verbose"))]
    pub quiet: bool,
}

impl KubeDeploy {
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn run(self) -> Result<()> {
        match self.action {
            KubeDeploySubcommands::Resolve(inner) => {
                inner.run(self.config, &EnvSecretStore::from_env())
            }
            KubeDeploySubcommands::Validate(inner) => {
                inner.run(self.config, &EnvSecretStore::from_env())
            }
            KubeDeploySubcommands::Schema(inner) => inner.run(),
        }
    }
}

#[derive(Subcommand)]
enum KubeDeploySubcommands {
    /// Resolve the config and print the final environment of the selected instances.
    Resolve(cmd::resolve::Resolve),
    /// Resolve the config and report whether it is valid.
    Validate(cmd::validate::Validate),
    /// Print the JSON schema of the deployment config.
    Schema(cmd::schema::Schema),
}
