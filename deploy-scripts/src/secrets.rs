//! Access to the signing keys used by the deployer
//!
//! Keys are resolved through a [`SecretProvider`] rather than read from the
//! process environment directly, so that target construction can be exercised
//! without touching global state.

use std::{collections::HashMap, env, fmt};

use clap::ValueEnum;

use crate::constants::{PRODUCTION_KEY_ENV_VAR, TEST_KEY_ENV_VAR};

/// A source of named secrets and settings, such as signing keys
pub trait SecretProvider {
    /// Look up the secret with the given name, returning `None` if it is unset
    fn secret(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSecretProvider;

impl SecretProvider for EnvSecretProvider {
    fn secret(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// Serves secrets from an in-memory table
#[derive(Clone, Debug, Default)]
pub struct StaticSecretProvider {
    /// The secrets, keyed by name
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret to the provider
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl SecretProvider for StaticSecretProvider {
    fn secret(&self, name: &str) -> Option<String> {
        self.secrets.get(name).cloned()
    }
}

/// Which family of credentials a run signs with by default
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CredentialSet {
    /// Mainnet credentials, read from `PRIVATE_KEY`
    #[default]
    Production,
    /// Testnet credentials, read from `EVM_PRIVATE_KEY`
    Test,
}

impl CredentialSet {
    /// The environment variable holding this credential set's signing key
    pub fn key_env_var(&self) -> &'static str {
        match self {
            CredentialSet::Production => PRODUCTION_KEY_ENV_VAR,
            CredentialSet::Test => TEST_KEY_ENV_VAR,
        }
    }
}

/// A hex-encoded private key
///
/// The key is never printed; its `Debug` representation is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(String);

impl SigningKey {
    /// Wrap a raw key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for handing to a signer
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}
