use std::sync::Arc;

use alloy::{dyn_abi::DynSolValue, primitives::address};
use deploy_scripts::{
    commands::DeploymentPlan,
    config::DeployConfig,
    errors::DeployError,
    orchestrator::{run, RunOptions},
    report::{read_deployment, write_deployments},
    secrets::{CredentialSet, StaticSecretProvider},
};
use eyre::Result;
use test_helpers::{
    misc::{deployed_address, DUMMY_SIGNING_KEY},
    mock::{Behavior, ScriptedResolver},
};
use tests::{sample_config_path, setup_logging, write_fixtures};

fn production_secrets() -> StaticSecretProvider {
    StaticSecretProvider::new().with_secret("PRIVATE_KEY", DUMMY_SIGNING_KEY)
}

fn mainnet_config() -> Result<String> {
    Ok(std::fs::read_to_string(sample_config_path("mainnet.json"))?)
}

#[test]
fn test_sample_configs_load() -> Result<()> {
    let mainnet = DeployConfig::load(&sample_config_path("mainnet.json"))?;
    let testnet = DeployConfig::load(&sample_config_path("testnet.json"))?;

    let chains = |config: &DeployConfig| -> Vec<(String, u64)> {
        config
            .networks
            .iter()
            .map(|(name, network)| (name.clone(), network.chain_id))
            .collect()
    };
    assert_eq!(mainnet.contract, "HibikiBridge");
    assert_eq!(chains(&mainnet), vec![("bsc".to_string(), 56), ("eth".to_string(), 1)]);
    assert_eq!(
        chains(&testnet),
        vec![("bsctest".to_string(), 97), ("moontest".to_string(), 1287)]
    );
    assert!(testnet
        .networks
        .iter()
        .all(|(_, n)| n.signing_key_env.as_deref() == Some("EVM_PRIVATE_KEY")));

    Ok(())
}

/// Deploying to bsc and eth from the shipped config records both addresses
#[tokio::test]
async fn test_bsc_and_eth_deployment() -> Result<()> {
    setup_logging();
    let dir = tempfile::tempdir()?;
    let args = write_fixtures(dir.path(), &mainnet_config()?)?;

    let plan = DeploymentPlan::new(&args, &production_secrets())?;
    assert_eq!(plan.artifact.contract_name, "HibikiBridge");
    assert_eq!(
        plan.targets[1].constructor_args,
        vec![
            DynSolValue::Address(address!("0x4F4495243837681061C4743b74B3eEdf548D56A5")),
            DynSolValue::Address(address!("0x2d5d7d31F671F86C782533cc367F14109a082712")),
            DynSolValue::Address(address!("0xA693032e8cfDB8115c6E72B60Ae77a1A592fe4bD")),
        ]
    );

    let resolver = Arc::new(ScriptedResolver::new());
    let deployment = run(plan.targets, resolver, RunOptions::default()).await?;
    assert_eq!(deployment.exit_code(), 0);

    write_deployments(
        &args.deployments,
        &plan.config.contract,
        &plan.config.compiler,
        &deployment,
    )?;
    let bsc = read_deployment(&args.deployments, "HibikiBridge", "bsc")?;
    let eth = read_deployment(&args.deployments, "HibikiBridge", "eth")?;
    assert_eq!(bsc.address, deployed_address(56));
    assert_eq!(bsc.chain_id, 56);
    assert_eq!(eth.address, deployed_address(1));
    assert_eq!(eth.compiler.evm_version, "london");

    Ok(())
}

#[tokio::test]
async fn test_failed_network_is_not_recorded() -> Result<()> {
    setup_logging();
    let dir = tempfile::tempdir()?;
    let args = write_fixtures(dir.path(), &mainnet_config()?)?;
    let plan = DeploymentPlan::new(&args, &production_secrets())?;

    let resolver = Arc::new(ScriptedResolver::new().with_behavior("eth", Behavior::Revert));
    let deployment = run(plan.targets, resolver, RunOptions::default()).await?;
    assert_eq!(deployment.exit_code(), 1);

    write_deployments(
        &args.deployments,
        &plan.config.contract,
        &plan.config.compiler,
        &deployment,
    )?;
    assert!(read_deployment(&args.deployments, "HibikiBridge", "bsc").is_ok());
    assert!(read_deployment(&args.deployments, "HibikiBridge", "eth").is_err());

    Ok(())
}

#[test]
fn test_missing_signing_key_aborts_plan() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let args = write_fixtures(dir.path(), &mainnet_config()?)?;

    let err = DeploymentPlan::new(&args, &StaticSecretProvider::new()).unwrap_err();

    assert!(matches!(err, DeployError::Configuration(_)));
    assert!(err.detail().contains("PRIVATE_KEY"));

    Ok(())
}

#[test]
fn test_malformed_signing_key_aborts_plan() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let args = write_fixtures(dir.path(), &mainnet_config()?)?;
    let secrets = StaticSecretProvider::new().with_secret("PRIVATE_KEY", "not-a-key");

    let err = DeploymentPlan::new(&args, &secrets).unwrap_err();

    assert!(matches!(err, DeployError::Configuration(_)));
    assert!(err.detail().contains("PRIVATE_KEY"));

    Ok(())
}

#[test]
fn test_testnet_plan_uses_test_key() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = std::fs::read_to_string(sample_config_path("testnet.json"))?;
    let mut args = write_fixtures(dir.path(), &config)?;
    args.credentials = CredentialSet::Test;

    // The production key alone is not enough
    assert!(DeploymentPlan::new(&args, &production_secrets()).is_err());

    let secrets = StaticSecretProvider::new().with_secret("EVM_PRIVATE_KEY", DUMMY_SIGNING_KEY);
    let plan = DeploymentPlan::new(&args, &secrets)?;
    let names: Vec<_> = plan.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["bsctest", "moontest"]);

    Ok(())
}

#[test]
fn test_plan_network_selection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut args = write_fixtures(dir.path(), &mainnet_config()?)?;

    args.networks = vec!["eth".to_string()];
    let plan = DeploymentPlan::new(&args, &production_secrets())?;
    assert_eq!(plan.targets.len(), 1);
    assert_eq!(plan.targets[0].chain_id, 1);

    args.networks = vec!["polygon".to_string()];
    assert!(matches!(
        DeploymentPlan::new(&args, &production_secrets()),
        Err(DeployError::Configuration(_))
    ));

    Ok(())
}

#[test]
fn test_plan_evm_version_override() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let args = write_fixtures(dir.path(), &mainnet_config()?)?;
    let secrets = production_secrets().with_secret("EVM_VERSION", "paris");

    let plan = DeploymentPlan::new(&args, &secrets)?;

    assert_eq!(plan.config.compiler.evm_version, "paris");
    assert_eq!(plan.config.compiler.version, "0.8.19");

    Ok(())
}

#[test]
fn test_plan_rejects_constructor_mismatch() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let args = write_fixtures(dir.path(), &mainnet_config()?)?;

    // Drop the token argument from the artifact's constructor
    let artifact = tests::BRIDGE_ARTIFACT.replace(
        r#",
                { "name": "hibiki_", "type": "address", "internalType": "address" }"#,
        "",
    );
    assert_ne!(artifact, tests::BRIDGE_ARTIFACT);
    std::fs::write(args.artifact.as_ref().unwrap(), artifact)?;

    let res = DeploymentPlan::new(&args, &production_secrets());
    assert!(matches!(res, Err(DeployError::Configuration(_))));

    Ok(())
}

#[test]
fn test_plan_missing_artifact() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut args = write_fixtures(dir.path(), &mainnet_config()?)?;
    args.artifact = Some(dir.path().join("Missing.json"));

    let res = DeploymentPlan::new(&args, &production_secrets());
    assert!(matches!(res, Err(DeployError::ReadFile(_))));

    Ok(())
}
