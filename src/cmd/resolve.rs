use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use kubedeploy::{
    config::{self, ALL_INSTANCES, EnvSpec, rt::RtcDeploy},
    vault::{SecretStore, VAULT_TOKEN},
};
use serde::Serialize;

use crate::common::REDACTED;

/// Resolve the config and print the final environment of the selected instances.
#[derive(Clone, Debug, Args)]
#[command(name = "resolve")]
pub struct Resolve {
    /// Only resolve instances of this environment
    #[arg(short, long)]
    pub environment: Option<String>,
    /// Only resolve this instance of the environment [default: all]
    #[arg(short, long, requires = "environment")]
    pub instance: Option<String>,
    /// The output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    pub format: Format,
    /// Show the secret store token instead of redacting it
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Yaml,
    Json,
    /// `NAME=value` lines, as consumed by the deployment container
    Env,
}

/// A single resolved instance, as printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolved<'a> {
    environment: &'a str,
    instance: &'a str,
    env_spec: EnvSpec,
}

impl Resolve {
    #[tracing::instrument(level = "trace", skip(self, config, store))]
    pub fn run(self, config: PathBuf, store: &dyn SecretStore) -> Result<()> {
        let rtc = config::load(config, store)?;
        let resolved = self.select(&rtc)?;
        tracing::debug!(
            "printing {} resolved instance(s) as {}",
            resolved.len(),
            self.format
        );

        print!("{}", render(&resolved, self.format)?);
        Ok(())
    }

    fn select<'a>(&self, rtc: &'a RtcDeploy) -> Result<Vec<Resolved<'a>>> {
        let selected = match &self.environment {
            Some(environment) => {
                let instance = self.instance.as_deref().unwrap_or(ALL_INSTANCES);
                let (env, instances) = rtc.select(environment, instance)?;
                instances.into_iter().map(|i| (env, i)).collect::<Vec<_>>()
            }
            None => rtc
                .environments
                .iter()
                .flat_map(|env| env.instances.iter().map(move |i| (env, i)))
                .collect(),
        };

        Ok(selected
            .into_iter()
            .map(|(env, instance)| Resolved {
                environment: &env.name,
                instance: &instance.name,
                env_spec: if self.show_secrets {
                    instance.env_spec.clone()
                } else {
                    redact(&instance.env_spec)
                },
            })
            .collect())
    }
}

fn redact(spec: &EnvSpec) -> EnvSpec {
    let mut spec = spec.clone();
    for var in &mut spec.environment_vars {
        if var.name == VAULT_TOKEN {
            var.value = REDACTED.to_string();
        }
    }
    spec
}

fn render(resolved: &[Resolved<'_>], format: Format) -> Result<String> {
    Ok(match format {
        Format::Yaml => serde_yaml::to_string(resolved)?,
        Format::Json => format!("{}\n", serde_json::to_string_pretty(resolved)?),
        Format::Env => {
            let mut out = String::new();
            for r in resolved {
                out.push_str(&format!("# {}/{}\n", r.environment, r.instance));
                for var in &r.env_spec.environment_vars {
                    // env files have no quoting, a line break would start a new variable
                    if var.value.contains(['\n', '\r']) {
                        bail!(
                            "value of `{}` for {}/{} contains a line break and can't be written as an env file",
                            var.name,
                            r.environment,
                            r.instance
                        );
                    }
                    out.push_str(&format!("{}={}\n", var.name, var.value));
                }
            }
            out
        }
    })
}
