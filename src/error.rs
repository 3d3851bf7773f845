use std::path::PathBuf;

use thiserror::Error;

/// Reasons why resolving a deployment configuration failed.
///
/// Every variant is fatal. The first one encountered aborts the whole resolution.
#[derive(Debug, Error)]
pub enum Error {
    /// no file at the configured path
    #[error("no deployment config file exists at: {}", path.display())]
    ConfigFileMissing { path: PathBuf },

    /// the file exists, but reading it failed
    #[error("deployment config file {} could not be read", path.display())]
    ConfigFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// the content is not YAML at all, or not even text
    #[error("deployment config file ({}) is not valid YAML", path.display())]
    ConfigNotValidYaml {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// the content is YAML, but does not match the document structure
    #[error("error parsing deployment config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("error parsing config, duplicate environment name `{name}` found")]
    DuplicateEnvironmentName { name: String },

    #[error(
        "error parsing config, duplicate instance name `{instance}` for environment `{environment}`"
    )]
    DuplicateInstanceName {
        environment: String,
        instance: String,
    },

    #[error("no instances found for environment: `{environment}`")]
    NoInstancesDefined { environment: String },

    #[error(
        "deployment config cannot have an instance named `{instance}` (environment `{environment}`), it is a reserved name"
    )]
    ReservedInstanceName {
        environment: String,
        instance: String,
    },

    #[error("kubernetes cluster is not set for instance `{instance}` in environment `{environment}`")]
    MissingCluster {
        environment: String,
        instance: String,
    },

    #[error(
        "kubernetes service account required but not provided for instance `{instance}` in environment `{environment}`"
    )]
    MissingServiceAccount {
        environment: String,
        instance: String,
    },

    #[error(
        "reserved environment variable name `{name}` found in config for instance `{instance}` in environment `{environment}`"
    )]
    ReservedNameConflict {
        environment: String,
        instance: String,
        name: String,
    },

    /// the secret store client failed to provide a token or an address
    #[error("unable to get the secret store {what}")]
    SecretStoreUnavailable {
        what: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to encode the secret config for instance `{instance}` in environment `{environment}`")]
    SecretConfigEncoding {
        environment: String,
        instance: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown environment `{name}`")]
    UnknownEnvironment { name: String },

    #[error("unknown instance `{instance}` for environment `{environment}`")]
    UnknownInstance {
        environment: String,
        instance: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
