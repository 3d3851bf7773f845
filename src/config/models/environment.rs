use super::{EMPTY_ENV_SPEC, EnvSpec, null_as_default};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The instance selector meaning "every instance of the environment".
///
/// Matched case-insensitively, and therefore not allowed as an instance name.
pub const ALL_INSTANCES: &str = "all";

/// Check if a name is the "all instances" selector.
pub fn is_all_instances(name: &str) -> bool {
    name.eq_ignore_ascii_case(ALL_INSTANCES)
}

/// Settings shared by all environments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Global {
    #[serde(default)]
    pub env_spec: Option<EnvSpec>,
}

impl Global {
    pub fn env_spec(&self) -> &EnvSpec {
        self.env_spec.as_ref().unwrap_or(&EMPTY_ENV_SPEC)
    }
}

/// A deployment environment (dev, stage, prod, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub env_spec: Option<EnvSpec>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instances: Vec<Instance>,
}

impl Environment {
    pub fn env_spec(&self) -> &EnvSpec {
        self.env_spec.as_ref().unwrap_or(&EMPTY_ENV_SPEC)
    }
}

/// An instance of a deployment within an environment (e.g. `us-west-2` of `prod`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub env_spec: Option<EnvSpec>,
}

impl Instance {
    pub fn env_spec(&self) -> &EnvSpec {
        self.env_spec.as_ref().unwrap_or(&EMPTY_ENV_SPEC)
    }
}
