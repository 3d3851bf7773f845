//! Deployment configuration.
//!
//! The configuration is loaded from a single YAML document ([`models`]) and then resolved into a
//! per-instance runtime model ([`rt`]).

mod models;
pub mod rt;

pub use models::source::Source;
pub use models::*;

use crate::{error::Result, vault::SecretStore};
use std::path::PathBuf;

/// The default location of the deployment configuration.
pub const DEFAULT_CONFIG_FILE: &str = "./stim.deploy.yaml";

/// Load the configuration file and resolve it into the runtime model.
pub fn load(path: impl Into<PathBuf>, store: &dyn SecretStore) -> Result<rt::RtcDeploy> {
    Source::File(path.into()).resolve(store)
}

impl Source {
    /// Load the configuration from the source and resolve it.
    pub fn resolve(self, store: &dyn SecretStore) -> Result<rt::RtcDeploy> {
        let (cfg, path) = self.load()?;
        rt::RtcDeploy::from_config(cfg, &path, store)
    }
}
