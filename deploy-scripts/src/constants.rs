//! Constants used in the deploy scripts

/// The environment variable holding the production (mainnet) signing key
pub const PRODUCTION_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The environment variable holding the test (testnet) signing key
pub const TEST_KEY_ENV_VAR: &str = "EVM_PRIVATE_KEY";

/// The environment variable overriding the EVM version recorded for the compiled contract
pub const EVM_VERSION_ENV_VAR: &str = "EVM_VERSION";

/// The environment variable used to configure log filtering
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// The default number of confirmations to wait for the deployment transaction
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// The default bound on waiting for a deployment to be confirmed, in seconds
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 300;

/// The default Solidity compiler version the contract is built with
pub const DEFAULT_SOLC_VERSION: &str = "0.8.19";

/// The default EVM version the contract is built for
pub const DEFAULT_EVM_VERSION: &str = "london";

/// The default number of optimizer runs the contract is built with
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// The directory Hardhat writes contract artifacts to
pub const HARDHAT_ARTIFACTS_DIR: &str = "artifacts/contracts";

/// The default path of the deployments record
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The name of the dotenv file
pub const ENV_FILE: &str = ".env";

/// The name of the dotenv template file
pub const ENV_EXAMPLE_FILE: &str = ".env.example";

/// The exit code of a run in which every network was deployed to
pub const SUCCESS_EXIT_CODE: u8 = 0;

/// The exit code of a run in which some network failed or was skipped
pub const FAILURE_EXIT_CODE: u8 = 1;

/// The exit code used when a run is aborted before any deployment
pub const CONFIGURATION_EXIT_CODE: u8 = 2;

/// The exit code used when a second interrupt aborts a run in flight
pub const INTERRUPTED_EXIT_CODE: u8 = 130;
