//! The configuration model
//!
//! This is what the user provides in the deployment document, and which gets resolved into the
//! runtime model (see [`crate::config::rt`]).

pub mod source;

mod deployment;
mod env_spec;
mod environment;
mod types;

pub use deployment::*;
pub use env_spec::*;
pub use environment::*;
pub use types::*;


use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Common configuration model functionality
pub trait ConfigModel {
    /// Replace unset values with their literal defaults
    fn apply_defaults(&mut self) {}
}

/// The persisted deployment configuration model
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployment: Deployment,

    #[serde(default, deserialize_with = "null_as_default")]
    pub container: Container,

    #[serde(default, deserialize_with = "null_as_default")]
    pub global: Global,

    #[serde(default, deserialize_with = "null_as_default")]
    pub environments: Vec<Environment>,
}

impl ConfigModel for Configuration {
    fn apply_defaults(&mut self) {
        self.deployment.apply_defaults();
        self.container.apply_defaults();
    }
}

impl Configuration {
    /// Consume the configuration, returning it with all defaults applied.
    pub fn with_defaults(mut self) -> Self {
        self.apply_defaults();
        tracing::trace!(
            repo = %self.container.repo,
            tag = %self.container.tag,
            directory = %self.deployment.directory,
            script = %self.deployment.script,
            "applied configuration defaults"
        );
        self
    }
}
