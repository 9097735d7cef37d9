//! Type definitions used throughout the deploy scripts

use std::fmt::{self, Display};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, TxHash},
    transports::http::reqwest::Url,
};

use crate::{
    constants::{FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE},
    errors::DeployError,
    secrets::SigningKey,
};

// -----------
// | Targets |
// -----------

/// A network to which one instance of the contract is deployed
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkTarget {
    /// The name of the network in the configuration, e.g. `bsc`
    pub name: String,
    /// The JSON-RPC endpoint of the network
    pub rpc_url: Url,
    /// The chain id the endpoint is expected to report
    pub chain_id: u64,
    /// The key used to sign the deployment transaction
    pub signing_key: SigningKey,
    /// The constructor arguments, in ABI order
    pub constructor_args: Vec<DynSolValue>,
    /// A fixed legacy gas price in wei, or `None` to let the provider price the transaction
    pub gas_price: Option<u128>,
}

// ------------
// | Outcomes |
// ------------

/// A machine-readable classification of a failed deployment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The target was misconfigured
    Configuration,
    /// The network could not be reached, or did not behave as configured
    Network,
    /// The transaction was rejected or reverted
    Transaction,
    /// The transaction was not confirmed within the configured bound
    Timeout,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Configuration => write!(f, "configuration"),
            FailureKind::Network => write!(f, "network"),
            FailureKind::Transaction => write!(f, "transaction"),
            FailureKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Why a target was never attempted
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// An earlier target failed while running in fail-fast mode
    FailFast,
    /// The run was interrupted before this target was initiated
    Cancelled,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FailFast => write!(f, "an earlier target failed"),
            SkipReason::Cancelled => write!(f, "run cancelled"),
        }
    }
}

/// The terminal outcome of a single target's deployment
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The contract was created on-chain
    Success {
        /// The address of the created contract
        contract_address: Address,
        /// The hash of the deployment transaction
        tx_hash: TxHash,
    },
    /// The deployment attempt failed
    Failure {
        /// The class of the failure
        kind: FailureKind,
        /// The underlying error message
        detail: String,
    },
    /// The deployment was never attempted
    Skipped {
        /// Why the target was skipped
        reason: SkipReason,
    },
}

impl Outcome {
    /// Whether the deployment succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Whether the deployment was attempted and failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    /// The deployed contract's address, if any
    pub fn contract_address(&self) -> Option<Address> {
        match self {
            Outcome::Success {
                contract_address, ..
            } => Some(*contract_address),
            _ => None,
        }
    }
}

impl From<DeployError> for Outcome {
    fn from(err: DeployError) -> Self {
        Outcome::Failure {
            kind: err.kind(),
            detail: err.detail().to_string(),
        }
    }
}

/// The result of deploying to one target
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentResult {
    /// The target the deployment was made to
    pub target: NetworkTarget,
    /// What happened
    pub outcome: Outcome,
}

// --------
// | Runs |
// --------

/// The results of a deployment run, one per input target in input order
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentRun {
    /// The per-target results
    results: Vec<DeploymentResult>,
}

impl DeploymentRun {
    /// Build a run from results already ordered like the input targets
    pub(crate) fn new(results: Vec<DeploymentResult>) -> Self {
        Self { results }
    }

    /// The per-target results, in input order
    pub fn results(&self) -> &[DeploymentResult] {
        &self.results
    }

    /// The number of results in the run
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the run holds no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over the per-target results
    pub fn iter(&self) -> impl Iterator<Item = &DeploymentResult> {
        self.results.iter()
    }

    /// Whether every target was deployed successfully
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }

    /// The number of targets that were attempted and failed
    pub fn num_failures(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failure()).count()
    }

    /// The process exit code for this run: zero only when every target succeeded
    pub fn exit_code(&self) -> u8 {
        if self.all_succeeded() {
            SUCCESS_EXIT_CODE
        } else {
            FAILURE_EXIT_CODE
        }
    }
}

impl IntoIterator for DeploymentRun {
    type Item = DeploymentResult;
    type IntoIter = std::vec::IntoIter<DeploymentResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
