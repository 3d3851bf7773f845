//! Access to the secret store (Vault).
//!
//! Resolution only needs two opaque strings from the secret store: its address and a token.
//! Both are handed to the deployment, which reads the actual secrets itself.

use anyhow::{Context, anyhow, bail};
use std::path::PathBuf;

pub const VAULT_ADDR: &str = "VAULT_ADDR";
pub const VAULT_TOKEN: &str = "VAULT_TOKEN";

/// A client of the secret store
pub trait SecretStore {
    /// The current authentication token.
    fn token(&self) -> anyhow::Result<String>;

    /// The current address of the service.
    fn address(&self) -> anyhow::Result<String>;
}

/// A secret store client configured the same way the Vault CLI is.
///
/// The address is taken from `VAULT_ADDR`, the token from `VAULT_TOKEN`, falling back to the
/// token helper file `~/.vault-token`.
#[derive(Clone, Debug, Default)]
pub struct EnvSecretStore {
    pub address: Option<String>,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl EnvSecretStore {
    /// Take a snapshot of the current process environment.
    pub fn from_env() -> Self {
        Self {
            address: std::env::var(VAULT_ADDR).ok(),
            token: std::env::var(VAULT_TOKEN).ok(),
            token_file: directories::BaseDirs::new()
                .map(|dirs| dirs.home_dir().join(".vault-token")),
        }
    }
}

impl SecretStore for EnvSecretStore {
    fn token(&self) -> anyhow::Result<String> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }

        let Some(file) = &self.token_file else {
            bail!("{VAULT_TOKEN} is not set and there is no token file");
        };
        tracing::trace!("reading vault token from {}", file.display());

        let token = std::fs::read_to_string(file)
            .with_context(|| format!("unable to read vault token file '{}'", file.display()))?;
        let token = token.trim();
        if token.is_empty() {
            bail!("vault token file '{}' is empty", file.display());
        }

        Ok(token.to_string())
    }

    fn address(&self) -> anyhow::Result<String> {
        self.address
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("{VAULT_ADDR} is not set"))
    }
}
