//! A scripted stand-in for the chain, driving each network through a
//! predetermined deployment outcome

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, TxHash},
};
use deploy_scripts::{
    errors::DeployError,
    factory::{ContractFactory, FactoryResolver, PendingDeployment},
    types::NetworkTarget,
};

use crate::misc::{deployed_address, deployment_tx_hash};

/// How a network behaves when deployed to
#[derive(Clone, Debug)]
pub enum Behavior {
    /// The deployment confirms immediately at the given address
    Succeed(Address),
    /// The deployment confirms at the given address after a delay
    Delay(Duration, Address),
    /// No factory can be bound to the network
    FailResolve(DeployError),
    /// The network never answers while a factory is being bound
    HangResolve,
    /// The network never answers the deployment transaction's submission
    HangSubmit,
    /// The deployment transaction is rejected on submission
    FailDeploy(DeployError),
    /// The deployment transaction is mined but reverts
    Revert,
    /// The deployment transaction is never confirmed
    Hang,
}

/// A resolver whose networks follow scripted behaviors
///
/// Networks without a script succeed at [`deployed_address`] of their chain id.
#[derive(Clone, Debug, Default)]
pub struct ScriptedResolver {
    /// The scripted behaviors, keyed by network name
    behaviors: HashMap<String, Behavior>,
    /// The networks a factory was requested for, in request order
    resolved: Arc<Mutex<Vec<String>>>,
    /// The constructor arguments submitted, keyed by network name
    submitted: Arc<Mutex<HashMap<String, Vec<DynSolValue>>>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the behavior of the named network
    pub fn with_behavior(mut self, network: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(network.to_string(), behavior);
        self
    }

    /// The networks a factory was requested for, in request order
    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    /// The constructor arguments submitted to the named network, if any
    pub fn submitted_args(&self, network: &str) -> Option<Vec<DynSolValue>> {
        self.submitted.lock().unwrap().get(network).cloned()
    }
}

impl FactoryResolver for ScriptedResolver {
    type Factory = ScriptedFactory;

    async fn resolve(&self, target: &NetworkTarget) -> Result<Self::Factory, DeployError> {
        self.resolved.lock().unwrap().push(target.name.clone());

        let behavior = self
            .behaviors
            .get(&target.name)
            .cloned()
            .unwrap_or_else(|| Behavior::Succeed(deployed_address(target.chain_id)));
        match &behavior {
            Behavior::FailResolve(e) => return Err(e.clone()),
            Behavior::HangResolve => std::future::pending::<()>().await,
            _ => {}
        }

        Ok(ScriptedFactory {
            network: target.name.clone(),
            tx_hash: deployment_tx_hash(target.chain_id),
            behavior,
            submitted: self.submitted.clone(),
        })
    }
}

/// A factory bound to one scripted network
pub struct ScriptedFactory {
    network: String,
    tx_hash: TxHash,
    behavior: Behavior,
    submitted: Arc<Mutex<HashMap<String, Vec<DynSolValue>>>>,
}

impl ContractFactory for ScriptedFactory {
    type Pending = ScriptedPending;

    async fn deploy(&self, constructor_args: &[DynSolValue]) -> Result<Self::Pending, DeployError> {
        match &self.behavior {
            Behavior::FailDeploy(e) => return Err(e.clone()),
            Behavior::HangSubmit => std::future::pending::<()>().await,
            _ => {}
        }

        self.submitted
            .lock()
            .unwrap()
            .insert(self.network.clone(), constructor_args.to_vec());
        Ok(ScriptedPending {
            tx_hash: self.tx_hash,
            behavior: self.behavior.clone(),
        })
    }
}

/// A scripted deployment awaiting confirmation
pub struct ScriptedPending {
    tx_hash: TxHash,
    behavior: Behavior,
}

impl PendingDeployment for ScriptedPending {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn confirm(self) -> Result<Address, DeployError> {
        match self.behavior {
            Behavior::Succeed(address) => Ok(address),
            Behavior::Delay(delay, address) => {
                tokio::time::sleep(delay).await;
                Ok(address)
            }
            Behavior::Revert => Err(DeployError::Transaction(format!(
                "deployment transaction {:#x} reverted",
                self.tx_hash
            ))),
            Behavior::Hang | Behavior::HangResolve | Behavior::HangSubmit => {
                std::future::pending().await
            }
            Behavior::FailResolve(e) | Behavior::FailDeploy(e) => Err(e),
        }
    }
}
