//! Loading of the per-network deployment configuration
//!
//! The configuration is a JSON document naming the contract to deploy and
//! mapping each network name to its endpoint, chain id and constructor
//! addresses. Networks are deployed to in the order they appear in the file.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    dyn_abi::DynSolValue, primitives::Address, signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    constants::{DEFAULT_EVM_VERSION, DEFAULT_OPTIMIZER_RUNS, DEFAULT_SOLC_VERSION},
    errors::DeployError,
    secrets::{SecretProvider, SigningKey},
    types::NetworkTarget,
};

/// The compiler settings the contract artifact was built with
///
/// These are recorded alongside each deployment; the scripts do not compile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    /// The Solidity compiler version
    pub version: String,
    /// The EVM version targeted by the compiler
    pub evm_version: String,
    /// The number of optimizer runs
    pub optimizer_runs: u32,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_SOLC_VERSION.to_string(),
            evm_version: DEFAULT_EVM_VERSION.to_string(),
            optimizer_runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// The configuration of a single network, as written in the config file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The JSON-RPC endpoint
    pub rpc_url: String,
    /// The expected chain id
    pub chain_id: u64,
    /// The environment variable holding this network's signing key.
    ///
    /// Falls back to the run's credential set when absent.
    #[serde(default)]
    pub signing_key_env: Option<String>,
    /// The address of the cross-chain gateway
    pub gateway_address: String,
    /// The address of the gas service
    pub gas_address: String,
    /// The address of the bridged token
    pub token_address: String,
    /// A fixed gas price in wei; automatic pricing when absent
    #[serde(default)]
    pub gas_price: Option<u128>,
}

/// The full deployment configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployConfig {
    /// The name of the contract to deploy
    pub contract: String,
    /// The networks to deploy to, in file order
    pub networks: Vec<(String, NetworkConfig)>,
    /// The compiler settings of the contract artifact
    pub compiler: CompilerSettings,
}

/// The on-disk shape of the configuration
#[derive(Deserialize)]
struct RawDeployConfig {
    /// The name of the contract to deploy
    contract: String,
    /// The networks, kept as raw values so that file order survives parsing
    networks: Map<String, Value>,
    /// The compiler settings
    #[serde(default)]
    compiler: CompilerSettings,
}

impl DeployConfig {
    /// Load the configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DeployError::ReadFile(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Parse the configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, DeployError> {
        let raw: RawDeployConfig = serde_json::from_str(contents)
            .map_err(|e| DeployError::Configuration(format!("malformed config: {}", e)))?;

        let networks = raw
            .networks
            .into_iter()
            .map(|(name, value)| {
                serde_json::from_value::<NetworkConfig>(value)
                    .map(|network| (name.clone(), network))
                    .map_err(|e| {
                        DeployError::Configuration(format!("malformed network `{}`: {}", name, e))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if networks.is_empty() {
            return Err(DeployError::Configuration(
                "config does not define any networks".to_string(),
            ));
        }

        Ok(Self {
            contract: raw.contract,
            networks,
            compiler: raw.compiler,
        })
    }

    /// Restrict the configuration to the named networks.
    ///
    /// File order is kept regardless of the order of `names`; an empty
    /// selection keeps every network.
    pub fn select(mut self, names: &[String]) -> Result<Self, DeployError> {
        if names.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = names.iter().find(|n| self.network(n).is_none()) {
            return Err(DeployError::Configuration(format!(
                "unknown network `{}`",
                unknown
            )));
        }

        self.networks.retain(|(name, _)| names.contains(name));
        Ok(self)
    }

    /// Look up a network by name
    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks
            .iter()
            .find_map(|(n, network)| (n == name).then_some(network))
    }

    /// Build the deployment targets, resolving each network's signing key.
    ///
    /// `default_key_env` names the key variable for networks that do not set
    /// their own.
    pub fn targets(
        &self,
        secrets: &impl SecretProvider,
        default_key_env: &str,
    ) -> Result<Vec<NetworkTarget>, DeployError> {
        self.networks
            .iter()
            .map(|(name, network)| network.to_target(name, secrets, default_key_env))
            .collect()
    }
}

impl NetworkConfig {
    /// Build the deployment target for this network
    pub fn to_target(
        &self,
        name: &str,
        secrets: &impl SecretProvider,
        default_key_env: &str,
    ) -> Result<NetworkTarget, DeployError> {
        let rpc_url = Url::parse(&self.rpc_url).map_err(|e| {
            DeployError::Configuration(format!("invalid rpc url for `{}`: {}", name, e))
        })?;

        let key_env = self.signing_key_env.as_deref().unwrap_or(default_key_env);
        let signing_key = secrets
            .secret(key_env)
            .filter(|key| !key.trim().is_empty())
            .map(SigningKey::new)
            .ok_or_else(|| {
                DeployError::Configuration(format!(
                    "signing key for `{}` not found, set `{}`",
                    name, key_env
                ))
            })?;
        // The key itself is never part of the message
        PrivateKeySigner::from_str(signing_key.expose()).map_err(|e| {
            DeployError::Configuration(format!(
                "`{}` does not hold a valid signing key for `{}`: {}",
                key_env, name, e
            ))
        })?;

        let constructor_args = vec![
            parse_address(name, "gateway_address", &self.gateway_address)?,
            parse_address(name, "gas_address", &self.gas_address)?,
            parse_address(name, "token_address", &self.token_address)?,
        ]
        .into_iter()
        .map(DynSolValue::Address)
        .collect();

        Ok(NetworkTarget {
            name: name.to_string(),
            rpc_url,
            chain_id: self.chain_id,
            signing_key,
            constructor_args,
            gas_price: self.gas_price,
        })
    }
}

/// Parse one of a network's addresses
fn parse_address(network: &str, field: &str, value: &str) -> Result<Address, DeployError> {
    Address::from_str(value).map_err(|e| {
        DeployError::Configuration(format!(
            "invalid `{}` for `{}`: {} ({})",
            field, network, value, e
        ))
    })
}
