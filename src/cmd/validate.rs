use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use kubedeploy::{config, vault::SecretStore};

use crate::common::SUCCESS;

/// Resolve the config and report whether it is valid.
#[derive(Clone, Debug, Args)]
#[command(name = "validate")]
pub struct Validate {}

impl Validate {
    #[tracing::instrument(level = "trace", skip(self, config, store))]
    pub fn run(self, config: PathBuf, store: &dyn SecretStore) -> Result<()> {
        let rtc = config::load(config, store)?;

        let instances: usize = rtc.environments.iter().map(|e| e.instances.len()).sum();
        println!(
            "{} {} is valid: {} environment(s), {} instance(s), deploying {} from {}",
            SUCCESS,
            rtc.config_file.display(),
            rtc.environments.len(),
            instances,
            rtc.container.image(),
            rtc.script_path().display(),
        );

        Ok(())
    }
}
