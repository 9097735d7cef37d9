//! Implementations of the various deploy scripts

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use itertools::Itertools;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    artifact::{hardhat_artifact_path, ContractArtifact},
    cli::{DeployArgs, ListTargetsArgs},
    config::DeployConfig,
    constants::{
        CONFIGURATION_EXIT_CODE, ENV_EXAMPLE_FILE, ENV_FILE, EVM_VERSION_ENV_VAR,
        FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE,
    },
    errors::DeployError,
    factory::{AlloyFactoryResolver, FactoryResolver},
    orchestrator::{self, RunOptions},
    report::{summary_table, write_deployments},
    secrets::{EnvSecretProvider, SecretProvider},
    signal::setup_signal_handler,
    types::NetworkTarget,
};

// ----------
// | Deploy |
// ----------

/// Everything a deployment run needs, validated before any transaction is sent
#[derive(Debug)]
pub struct DeploymentPlan {
    /// The configuration, restricted to the selected networks
    pub config: DeployConfig,
    /// The compiled contract
    pub artifact: ContractArtifact,
    /// One target per selected network, in file order
    pub targets: Vec<NetworkTarget>,
}

impl DeploymentPlan {
    /// Load the configuration and artifact named by `args` and build the targets.
    ///
    /// Any error here is a configuration error: nothing has been submitted yet.
    pub fn new(args: &DeployArgs, secrets: &impl SecretProvider) -> Result<Self, DeployError> {
        let mut config = DeployConfig::load(&args.config)?.select(&args.networks)?;
        if let Some(evm_version) = secrets.secret(EVM_VERSION_ENV_VAR) {
            config.compiler.evm_version = evm_version;
        }

        let artifact_path = args
            .artifact
            .clone()
            .unwrap_or_else(|| hardhat_artifact_path(&config.contract));
        let artifact = ContractArtifact::load(&artifact_path)?;
        if artifact.contract_name != config.contract {
            warn!(
                configured = %config.contract,
                artifact = %artifact.contract_name,
                "artifact does not match the configured contract"
            );
        }

        let targets = config.targets(secrets, args.credentials.key_env_var())?;
        for target in &targets {
            artifact.check_constructor_args(&target.constructor_args)?;
        }

        Ok(Self {
            config,
            artifact,
            targets,
        })
    }
}

/// Deploy the contract to every selected network and report the results.
///
/// Signing keys come from the environment and transactions go through alloy.
/// Returns the process exit code of the run.
pub async fn deploy(args: DeployArgs) -> Result<u8, DeployError> {
    let cancel = CancellationToken::new();
    let signal_handler = setup_signal_handler(cancel.clone());

    let confirmations = args.confirmations;
    let res = deploy_with(&args, &EnvSecretProvider, cancel, |artifact| {
        AlloyFactoryResolver::new(artifact, confirmations)
    })
    .await;

    signal_handler.abort();
    res
}

/// Deploy with the given secrets, binding to networks through the resolver
/// `make_resolver` builds from the loaded artifact.
///
/// Errors are configuration errors raised before any transaction is sent.
/// Otherwise the run's exit code is returned: the summary table is printed
/// and successful deployments are recorded first.
pub async fn deploy_with<R, F>(
    args: &DeployArgs,
    secrets: &impl SecretProvider,
    cancel: CancellationToken,
    make_resolver: F,
) -> Result<u8, DeployError>
where
    R: FactoryResolver,
    F: FnOnce(ContractArtifact) -> R,
{
    let DeploymentPlan {
        config,
        artifact,
        targets,
    } = DeploymentPlan::new(args, secrets)?;

    let options = RunOptions {
        fail_fast: args.fail_fast,
        parallel: args.parallel,
        confirmation_timeout: Duration::from_secs(args.timeout_secs),
        cancel,
    };
    options.validate()?;

    info!(
        contract = %config.contract,
        evm_version = %config.compiler.evm_version,
        "deploying to {}",
        targets.iter().map(|t| t.name.as_str()).join(", ")
    );
    let resolver = Arc::new(make_resolver(artifact));
    let run = orchestrator::run(targets, resolver, options).await?;

    println!("{}", summary_table(&run));

    if run.iter().any(|r| r.outcome.is_success()) {
        let recorded =
            write_deployments(&args.deployments, &config.contract, &config.compiler, &run);
        if let Err(e) = recorded {
            error!("failed to record deployments: {}", e);
            return Ok(FAILURE_EXIT_CODE);
        }
        info!(path = %args.deployments.display(), "recorded deployments");
    }

    Ok(run.exit_code())
}

/// The process exit code for the result of a command
pub fn exit_code(res: &Result<u8, DeployError>) -> u8 {
    match res {
        Ok(code) => *code,
        Err(_) => CONFIGURATION_EXIT_CODE,
    }
}

// ----------------
// | List Targets |
// ----------------

/// Print the networks defined in a configuration file
pub fn list_targets(args: ListTargetsArgs) -> Result<u8, DeployError> {
    let config = DeployConfig::load(&args.config)?;

    println!("{}", config.contract);
    for (name, network) in &config.networks {
        let key_env = network.signing_key_env.as_deref().unwrap_or("<credential set>");
        println!(
            "  {:<12} chain {:<8} key {:<18} {}",
            name, network.chain_id, key_env, network.rpc_url
        );
    }

    Ok(SUCCESS_EXIT_CODE)
}

// ------------
// | Init Env |
// ------------

/// The result of bootstrapping the environment file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitEnvOutcome {
    /// `.env` was created from the template
    Created,
    /// `.env` already existed and was left untouched
    AlreadyExists,
}

/// Copy `.env.example` to `.env` in `dir`, unless `.env` already exists
pub fn init_env(dir: &Path) -> Result<InitEnvOutcome, DeployError> {
    let env_path = dir.join(ENV_FILE);
    if env_path.exists() {
        info!(path = %env_path.display(), "environment file already exists");
        return Ok(InitEnvOutcome::AlreadyExists);
    }

    let example_path = dir.join(ENV_EXAMPLE_FILE);
    let template = fs::read_to_string(&example_path)
        .map_err(|e| DeployError::ReadFile(format!("{}: {}", example_path.display(), e)))?;
    fs::write(&env_path, template)
        .map_err(|e| DeployError::WriteFile(format!("{}: {}", env_path.display(), e)))?;

    info!(path = %env_path.display(), "created environment file, fill in the signing keys");
    Ok(InitEnvOutcome::Created)
}

/// Load `.env` from the working directory into the process environment
pub fn load_env() -> dotenvy::Result<PathBuf> {
    dotenvy::from_filename(ENV_FILE)
}

/// Log the result of [`load_env`]; a missing file is not an error
pub fn log_env_load(res: &dotenvy::Result<PathBuf>) {
    match res {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("failed to load environment file: {}", e),
    }
}
