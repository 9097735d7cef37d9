//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, init_env, list_targets},
    constants::{
        DEFAULT_CONFIRMATIONS, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_DEPLOYMENTS_PATH,
        SUCCESS_EXIT_CODE,
    },
    errors::DeployError,
    secrets::CredentialSet,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level, unless `RUST_LOG` says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy the contract to every selected network
    Deploy(DeployArgs),
    /// Print the networks defined in a configuration file
    ListTargets(ListTargetsArgs),
    /// Create a `.env` file from `.env.example` if none exists
    InitEnv(InitEnvArgs),
}

/// Deploy one instance of the contract per network.
///
/// Networks are deployed to in the order the configuration file lists them.
/// A failure on one network does not stop the others unless `--fail-fast` is
/// given.
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Path to the network configuration file
    #[arg(short, long, env = "DEPLOY_CONFIG")]
    pub config: PathBuf,

    /// Path to the compiled contract artifact.
    ///
    /// Defaults to the Hardhat artifact of the configured contract.
    #[arg(short, long)]
    pub artifact: Option<PathBuf>,

    /// Only deploy to the named network; may be repeated
    #[arg(short, long = "network")]
    pub networks: Vec<String>,

    /// Which signing key to use for networks that do not name their own
    #[arg(long, value_enum, default_value_t = CredentialSet::Production)]
    pub credentials: CredentialSet,

    /// Stop deploying after the first failed network
    #[arg(long, conflicts_with = "parallel")]
    pub fail_fast: bool,

    /// Deploy to all networks concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Number of confirmations to wait for on each network
    #[arg(long, default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Seconds to wait for each deployment to be confirmed
    #[arg(long, default_value_t = DEFAULT_CONFIRMATION_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Path of the file successful deployments are recorded in
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments: PathBuf,
}

/// List the networks of a configuration file, in deployment order.
///
/// Each line shows the network's chain id, the environment variable its
/// signing key is read from and its RPC endpoint.
#[derive(Args, Debug, Clone)]
pub struct ListTargetsArgs {
    /// Path to the network configuration file
    #[arg(short, long, env = "DEPLOY_CONFIG")]
    pub config: PathBuf,
}

/// Create a `.env` file from the `.env.example` template.
///
/// An existing `.env` is never overwritten.
#[derive(Args, Debug, Clone)]
pub struct InitEnvArgs {
    /// The directory holding `.env.example`
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

impl Command {
    /// Run the command, returning the process exit code
    pub async fn run(self) -> Result<u8, DeployError> {
        match self {
            Command::Deploy(args) => deploy(args).await,
            Command::ListTargets(args) => list_targets(args),
            Command::InitEnv(args) => init_env(&args.dir).map(|_| SUCCESS_EXIT_CODE),
        }
    }
}
