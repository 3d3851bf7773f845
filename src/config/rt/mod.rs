//! Runtime config.
//!
//! The configuration document declares settings on three levels: global, environment and
//! instance. Resolving it produces one final [`EnvSpec`] per instance, which has everything the
//! deployment container needs.
//!
//! Resolution is a single pass: defaults are applied, the structure is validated, and then every
//! instance gets merged with its parents and has the reserved values injected. The first error
//! aborts the whole resolution.

mod inject;
mod merge;
mod path;
mod validate;

pub use inject::*;
pub use merge::*;
pub use path::*;

use crate::{
    config::{Configuration, Container, EnvSpec, is_all_instances},
    error::{Error, Result},
    vault::SecretStore,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Runtime config of a deployment document.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcDeploy {
    /// The configuration file this was loaded from.
    pub config_file: PathBuf,
    /// The absolute deployment directory.
    pub directory: PathBuf,
    /// The name of the deployment script, inside the deployment directory.
    pub script: String,
    /// The container running the deployment.
    pub container: Container,
    pub environments: Vec<RtcEnvironment>,
    #[serde(skip)]
    environment_index: HashMap<String, usize>,
}

/// A resolved environment.
#[derive(Clone, Debug, Serialize)]
pub struct RtcEnvironment {
    pub name: String,
    pub instances: Vec<RtcInstance>,
    #[serde(skip)]
    instance_index: HashMap<String, usize>,
}

/// A resolved instance, ready to be deployed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcInstance {
    pub name: String,
    pub env_spec: EnvSpec,
}

impl RtcDeploy {
    /// Resolve a configuration, loaded from `config_file`.
    ///
    /// The secret store is queried once per instance.
    pub fn from_config(
        cfg: Configuration,
        config_file: &Path,
        store: &dyn SecretStore,
    ) -> Result<Self> {
        let cfg = cfg.with_defaults();
        let index = validate::validate(&cfg)?;

        let Configuration {
            deployment,
            container,
            global,
            environments,
        } = cfg;
        let global = global.env_spec();

        let environments = environments
            .into_iter()
            .zip(index.instances)
            .map(|(environment, instance_index)| -> Result<RtcEnvironment> {
                let instances = environment
                    .instances
                    .iter()
                    .map(|instance| -> Result<RtcInstance> {
                        let target = Target {
                            environment: &environment.name,
                            instance: &instance.name,
                        };

                        let merged =
                            merge_env_spec(instance.env_spec(), environment.env_spec(), global);
                        tracing::trace!(?target, "merged env spec");

                        let env_spec = inject(target, merged, store)?;
                        tracing::debug!(
                            environment = target.environment,
                            instance = target.instance,
                            "resolved instance"
                        );

                        Ok(RtcInstance {
                            name: instance.name.clone(),
                            env_spec,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(RtcEnvironment {
                    name: environment.name,
                    instances,
                    instance_index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let directory = resolve_directory(config_file, &deployment.directory);
        tracing::debug!("deployment directory: {}", directory.display());

        Ok(Self {
            config_file: config_file.to_path_buf(),
            directory,
            script: deployment.script,
            container,
            environments,
            environment_index: index.environments,
        })
    }

    /// The full path of the deployment script.
    pub fn script_path(&self) -> PathBuf {
        self.directory.join(&self.script)
    }

    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Option<&RtcEnvironment> {
        self.environment_index
            .get(name)
            .map(|&i| &self.environments[i])
    }

    /// Select instances of an environment, either by name, or all of them using
    /// [`crate::config::ALL_INSTANCES`].
    pub fn select(
        &self,
        environment: &str,
        instance: &str,
    ) -> Result<(&RtcEnvironment, Vec<&RtcInstance>)> {
        let env = self
            .environment(environment)
            .ok_or_else(|| Error::UnknownEnvironment {
                name: environment.to_string(),
            })?;

        if is_all_instances(instance) {
            return Ok((env, env.instances.iter().collect()));
        }

        let inst = env
            .instance(instance)
            .ok_or_else(|| Error::UnknownInstance {
                environment: environment.to_string(),
                instance: instance.to_string(),
            })?;

        Ok((env, vec![inst]))
    }
}

impl RtcEnvironment {
    /// Look up an instance by name.
    pub fn instance(&self, name: &str) -> Option<&RtcInstance> {
        self.instance_index.get(name).map(|&i| &self.instances[i])
    }
}
