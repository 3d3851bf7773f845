use super::{ConfigModel, null_as_default};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTAINER_REPO: &str = "premiereglobal/kube-vault-deploy";
pub const DEFAULT_CONTAINER_TAG: &str = "0.3.1";
pub const DEFAULT_DEPLOY_DIRECTORY: &str = "./";
pub const DEFAULT_DEPLOY_SCRIPT: &str = "deploy.sh";

/// Details about the deployment assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// The directory holding the deployment assets, relative to the configuration file
    /// [default: ./]
    #[serde(default, deserialize_with = "null_as_default")]
    pub directory: String,
    /// The script to run, inside the deployment directory [default: deploy.sh]
    #[serde(default, deserialize_with = "null_as_default")]
    pub script: String,
}

impl ConfigModel for Deployment {
    fn apply_defaults(&mut self) {
        set_default(&mut self.directory, DEFAULT_DEPLOY_DIRECTORY);
        set_default(&mut self.script, DEFAULT_DEPLOY_SCRIPT);
    }
}

/// The container image running the deployment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// The image repository [default: premiereglobal/kube-vault-deploy]
    #[serde(default, deserialize_with = "null_as_default")]
    pub repo: String,
    /// The image tag [default: 0.3.1]
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: String,
}

impl Container {
    /// The full image reference, `repo:tag`.
    pub fn image(&self) -> String {
        format!("{}:{}", self.repo, self.tag)
    }
}

impl ConfigModel for Container {
    fn apply_defaults(&mut self) {
        set_default(&mut self.repo, DEFAULT_CONTAINER_REPO);
        set_default(&mut self.tag, DEFAULT_CONTAINER_TAG);
    }
}

fn set_default(value: &mut String, default: &str) {
    if value.is_empty() {
        *value = default.to_string();
    }
}
