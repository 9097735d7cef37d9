//! Fixtures shared by the integration tests

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Once,
};

use deploy_scripts::{cli::DeployArgs, secrets::CredentialSet};
use eyre::Result;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// A compiled bridge contract whose constructor takes the gateway, gas
/// service and token addresses
pub const BRIDGE_ARTIFACT: &str = r#"{
    "contractName": "HibikiBridge",
    "sourceName": "contracts/HibikiBridge.sol",
    "abi": [
        {
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "gateway_", "type": "address", "internalType": "address" },
                { "name": "gasReceiver_", "type": "address", "internalType": "address" },
                { "name": "hibiki_", "type": "address", "internalType": "address" }
            ]
        },
        {
            "type": "function",
            "name": "gateway",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [{ "name": "", "type": "address", "internalType": "address" }]
        }
    ],
    "bytecode": "0x608060405234801561001057600080fd5b50"
}"#;

/// The path of a sample configuration shipped with the deploy scripts
pub fn sample_config_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../deploy-scripts/config")
        .join(name)
}

/// Write the given configuration and the bridge artifact into `dir`,
/// returning arguments for a deployment from those files
pub fn write_fixtures(dir: &Path, config: &str) -> Result<DeployArgs> {
    let config_path = dir.join("config.json");
    let artifact_path = dir.join("HibikiBridge.json");
    fs::write(&config_path, config)?;
    fs::write(&artifact_path, BRIDGE_ARTIFACT)?;

    Ok(DeployArgs {
        config: config_path,
        artifact: Some(artifact_path),
        networks: vec![],
        credentials: CredentialSet::Production,
        fail_fast: false,
        parallel: false,
        confirmations: 1,
        timeout_secs: 5,
        deployments: dir.join("deployments.json"),
    })
}

/// Set up logging for a test, honoring `RUST_LOG`
pub fn setup_logging() {
    TRACING_INIT.call_once(|| {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    });
}
