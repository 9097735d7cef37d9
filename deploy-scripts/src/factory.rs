//! Contract factories: the collaborators that submit deployment transactions
//!
//! The orchestrator only sees the traits defined here. The alloy-backed
//! implementation binds a local signer to an HTTP provider per target.

use std::{future::Future, str::FromStr, sync::Arc};

use alloy::{
    dyn_abi::DynSolValue,
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::{
        DynProvider, PendingTransactionBuilder, PendingTransactionError, Provider,
        ProviderBuilder,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::{RpcError, TransportError},
};
use tracing::debug;

use crate::{artifact::ContractArtifact, errors::DeployError, types::NetworkTarget};

// ----------
// | Traits |
// ----------

/// Resolves a factory bound to a target's network and signing identity
pub trait FactoryResolver: Send + Sync + 'static {
    /// The factory type produced by the resolver
    type Factory: ContractFactory + 'static;

    /// Bind a factory to the given target
    fn resolve(
        &self,
        target: &NetworkTarget,
    ) -> impl Future<Output = Result<Self::Factory, DeployError>> + Send;
}

/// Submits deployment transactions for a compiled contract
pub trait ContractFactory: Send + Sync {
    /// The handle to a submitted deployment
    type Pending: PendingDeployment + 'static;

    /// Submit a deployment transaction with the given constructor arguments
    fn deploy(
        &self,
        constructor_args: &[DynSolValue],
    ) -> impl Future<Output = Result<Self::Pending, DeployError>> + Send;
}

/// A deployment transaction that has been broadcast but not yet confirmed
pub trait PendingDeployment: Send {
    /// The hash of the deployment transaction
    fn tx_hash(&self) -> TxHash;

    /// Wait for the transaction to be confirmed, returning the created contract's address
    fn confirm(self) -> impl Future<Output = Result<Address, DeployError>> + Send;
}

// ---------
// | Alloy |
// ---------

/// Resolves alloy-backed factories for a compiled contract artifact
#[derive(Clone, Debug)]
pub struct AlloyFactoryResolver {
    /// The contract to deploy
    artifact: Arc<ContractArtifact>,
    /// The number of confirmations to wait for
    confirmations: u64,
}

impl AlloyFactoryResolver {
    /// Create a resolver for the given artifact
    pub fn new(artifact: ContractArtifact, confirmations: u64) -> Self {
        Self {
            artifact: Arc::new(artifact),
            confirmations,
        }
    }
}

impl FactoryResolver for AlloyFactoryResolver {
    type Factory = AlloyContractFactory;

    async fn resolve(&self, target: &NetworkTarget) -> Result<Self::Factory, DeployError> {
        let signer = PrivateKeySigner::from_str(target.signing_key.expose()).map_err(|e| {
            DeployError::Configuration(format!("invalid signing key for `{}`: {}", target.name, e))
        })?;
        let deployer = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_http(target.rpc_url.clone());
        let provider = DynProvider::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(classify_transport_error)?;
        if chain_id != target.chain_id {
            return Err(DeployError::Network(format!(
                "`{}` reports chain id {}, expected {}",
                target.name, chain_id, target.chain_id
            )));
        }

        debug!(network = %target.name, %deployer, chain_id, "bound deployer to network");
        Ok(AlloyContractFactory {
            provider,
            artifact: self.artifact.clone(),
            confirmations: self.confirmations,
            gas_price: target.gas_price,
        })
    }
}

/// Deploys a compiled contract through an alloy provider with an attached wallet
#[derive(Clone)]
pub struct AlloyContractFactory {
    /// The signing provider
    provider: DynProvider<Ethereum>,
    /// The contract to deploy
    artifact: Arc<ContractArtifact>,
    /// The number of confirmations to wait for
    confirmations: u64,
    /// A fixed gas price, if configured
    gas_price: Option<u128>,
}

impl ContractFactory for AlloyContractFactory {
    type Pending = AlloyPendingDeployment;

    async fn deploy(&self, constructor_args: &[DynSolValue]) -> Result<Self::Pending, DeployError> {
        let code = self.artifact.deploy_code(constructor_args);
        let mut tx = TransactionRequest::default().with_deploy_code(code);
        if let Some(gas_price) = self.gas_price {
            tx = tx.with_gas_price(gas_price);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(classify_transport_error)?
            .with_required_confirmations(self.confirmations);

        Ok(AlloyPendingDeployment { pending })
    }
}

/// A deployment broadcast through an alloy provider
pub struct AlloyPendingDeployment {
    /// The pending transaction
    pending: PendingTransactionBuilder<Ethereum>,
}

impl PendingDeployment for AlloyPendingDeployment {
    fn tx_hash(&self) -> TxHash {
        *self.pending.tx_hash()
    }

    async fn confirm(self) -> Result<Address, DeployError> {
        let receipt = self
            .pending
            .get_receipt()
            .await
            .map_err(classify_pending_error)?;

        if !receipt.status() {
            return Err(DeployError::Transaction(format!(
                "deployment transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        receipt.contract_address.ok_or_else(|| {
            DeployError::Transaction(format!(
                "receipt for {:#x} has no contract address",
                receipt.transaction_hash
            ))
        })
    }
}

// -----------
// | Helpers |
// -----------

/// Classify an RPC error: a JSON-RPC error response means the node rejected
/// the request, anything else means the node could not be talked to
pub fn classify_transport_error(err: TransportError) -> DeployError {
    match err {
        RpcError::ErrorResp(payload) => DeployError::Transaction(payload.to_string()),
        other => DeployError::Network(other.to_string()),
    }
}

/// Classify an error raised while waiting on a pending transaction
fn classify_pending_error(err: PendingTransactionError) -> DeployError {
    match err {
        PendingTransactionError::TransportError(e) => classify_transport_error(e),
        other => DeployError::Transaction(other.to_string()),
    }
}
