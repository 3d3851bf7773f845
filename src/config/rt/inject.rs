//! Injection of the variables and secrets every deployment gets.

use crate::{
    config::{EnvSpec, EnvironmentVar, SecretItem},
    error::{Error, Result},
    vault::{SecretStore, VAULT_ADDR, VAULT_TOKEN},
};
use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const SECRET_CONFIG: &str = "SECRET_CONFIG";
pub const DEPLOY_ENVIRONMENT: &str = "DEPLOY_ENVIRONMENT";
pub const DEPLOY_INSTANCE: &str = "DEPLOY_INSTANCE";
pub const DEPLOY_CLUSTER: &str = "DEPLOY_CLUSTER";

/// Variables populated from the kube config secret, and their source fields.
pub const KUBE_CONFIG_MAPS: [(&str, &str); 3] = [
    ("CLUSTER_SERVER", "cluster-server"),
    ("CLUSTER_CA", "cluster-ca"),
    ("USER_TOKEN", "user-token"),
];

/// The deployment target, used for the injected values and for reporting.
#[derive(Clone, Copy, Debug)]
pub struct Target<'a> {
    pub environment: &'a str,
    pub instance: &'a str,
}

/// Add the reserved variables and secrets to a merged spec.
///
/// Fails if the spec lacks a cluster or a service account, if the secret store can't be
/// reached, or if the user declared any of the reserved names. The merged spec is consumed and
/// the final one returned.
pub fn inject(target: Target<'_>, merged: EnvSpec, store: &dyn SecretStore) -> Result<EnvSpec> {
    let cluster = &merged.kubernetes.cluster;
    if cluster.is_empty() {
        return Err(Error::MissingCluster {
            environment: target.environment.to_string(),
            instance: target.instance.to_string(),
        });
    }

    let token = store
        .token()
        .map_err(|source| Error::SecretStoreUnavailable {
            what: "token",
            source: source.into(),
        })?;
    let address = store
        .address()
        .map_err(|source| Error::SecretStoreUnavailable {
            what: "address",
            source: source.into(),
        })?;
    tracing::trace!(%address, "received secret store details");

    let reserved_vars = vec![
        EnvironmentVar::new(VAULT_ADDR, address),
        EnvironmentVar::new(VAULT_TOKEN, token),
        EnvironmentVar::new(DEPLOY_ENVIRONMENT, target.environment),
        EnvironmentVar::new(DEPLOY_INSTANCE, target.instance),
        EnvironmentVar::new(DEPLOY_CLUSTER, cluster.as_str()),
    ];

    let service_account = &merged.kubernetes.service_account;
    if service_account.is_empty() {
        return Err(Error::MissingServiceAccount {
            environment: target.environment.to_string(),
            instance: target.instance.to_string(),
        });
    }
    let reserved_secrets = vec![kube_config_secret(cluster, service_account)];

    check_reserved_names(target, &merged, &reserved_vars, &reserved_secrets)?;

    let EnvSpec {
        kubernetes,
        mut secrets,
        mut environment_vars,
    } = merged;

    secrets.extend(reserved_secrets);
    let secret_config =
        encode_secret_config(&secrets).map_err(|source| Error::SecretConfigEncoding {
            environment: target.environment.to_string(),
            instance: target.instance.to_string(),
            source,
        })?;

    environment_vars.extend(reserved_vars);
    environment_vars.push(EnvironmentVar::new(SECRET_CONFIG, secret_config));

    Ok(EnvSpec {
        kubernetes,
        secrets,
        environment_vars,
    })
}

/// The secret holding the credentials of the service account for the cluster.
pub fn kube_config_secret(cluster: &str, service_account: &str) -> SecretItem {
    SecretItem {
        secret_path: format!("secret/kubernetes/{cluster}/{service_account}/kube-config"),
        secret_maps: KUBE_CONFIG_MAPS
            .iter()
            .map(|(dest, src)| (dest.to_string(), src.to_string()))
            .collect(),
    }
}

/// Fail if any user declared variable, or any variable populated by a user declared secret,
/// uses a reserved name.
fn check_reserved_names(
    target: Target<'_>,
    spec: &EnvSpec,
    reserved_vars: &[EnvironmentVar],
    reserved_secrets: &[SecretItem],
) -> Result<()> {
    let reserved = std::iter::once(SECRET_CONFIG)
        .chain(reserved_vars.iter().map(|var| var.name.as_str()))
        .chain(reserved_secrets.iter().flat_map(SecretItem::destinations))
        .collect::<HashSet<_>>();

    let declared = spec
        .environment_vars
        .iter()
        .map(|var| var.name.as_str())
        .chain(spec.secrets.iter().flat_map(SecretItem::destinations));

    for name in declared {
        if reserved.contains(name) {
            return Err(Error::ReservedNameConflict {
                environment: target.environment.to_string(),
                instance: target.instance.to_string(),
                name: name.to_string(),
            });
        }
    }

    Ok(())
}

/// A secret, the way the secret injection tool of the deployment container expects it.
#[derive(Debug, Serialize, Deserialize)]
struct WireSecretItem<S, M> {
    secret_path: S,
    secret_maps: M,
}

/// Encode secrets into the `SECRET_CONFIG` value: a base64 encoded JSON array.
pub fn encode_secret_config(secrets: &[SecretItem]) -> serde_json::Result<String> {
    let items = secrets
        .iter()
        .map(|secret| WireSecretItem {
            secret_path: secret.secret_path.as_str(),
            secret_maps: &secret.secret_maps,
        })
        .collect::<Vec<_>>();

    Ok(STANDARD.encode(serde_json::to_vec(&items)?))
}

/// Decode a `SECRET_CONFIG` value.
pub fn decode_secret_config(value: &str) -> anyhow::Result<Vec<SecretItem>> {
    let json = STANDARD
        .decode(value)
        .context("secret config is not valid base64")?;
    let items: Vec<WireSecretItem<String, BTreeMap<String, String>>> =
        serde_json::from_slice(&json).context("secret config is not valid JSON")?;

    Ok(items
        .into_iter()
        .map(|item| SecretItem {
            secret_path: item.secret_path,
            secret_maps: item.secret_maps,
        })
        .collect())
}
