use super::null_as_default;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The environment a deployment runs with.
///
/// May be set globally, per environment and per instance. Instance values take precedence over
/// environment values, which take precedence over global values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub kubernetes: Kubernetes,
    /// Secrets to read from the secret store into environment variables
    #[serde(default, deserialize_with = "null_as_default")]
    pub secrets: Vec<SecretItem>,
    /// Plain environment variables
    #[serde(default, deserialize_with = "null_as_default")]
    #[serde(rename = "env")]
    pub environment_vars: Vec<EnvironmentVar>,
}

/// Shared empty spec, standing in for unset `envSpec` blocks.
pub(crate) static EMPTY_ENV_SPEC: EnvSpec = EnvSpec::EMPTY;

impl EnvSpec {
    pub const EMPTY: EnvSpec = EnvSpec {
        kubernetes: Kubernetes {
            service_account: String::new(),
            cluster: String::new(),
        },
        secrets: Vec::new(),
        environment_vars: Vec::new(),
    };

    /// Look up the value of an environment variable, first declaration wins.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.environment_vars
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }
}

/// The Kubernetes target of a deployment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Kubernetes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_account: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster: String,
}

/// A shell environment variable injected into the deployment environment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct EnvironmentVar {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl EnvironmentVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A secret store entry, mapped into environment variables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretItem {
    /// The path of the entry in the secret store
    pub secret_path: String,
    /// Destination variable name to source field name within the entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub secret_maps: BTreeMap<String, String>,
}

impl SecretItem {
    /// Names of the environment variables this secret will populate.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.secret_maps.keys().map(String::as_str)
    }
}
