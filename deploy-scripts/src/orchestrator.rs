//! Deployment of one contract instance per target network
//!
//! Each target is a single linear attempt: resolve a factory, submit the
//! deployment, wait for confirmation. Every step is held to the same time
//! bound. A failed target never aborts the run unless fail-fast mode is
//! requested; the run always yields exactly one result per input target, in
//! input order.

use std::{future::Future, sync::Arc, time::Duration};

use alloy::primitives::{Address, TxHash};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    constants::DEFAULT_CONFIRMATION_TIMEOUT_SECS,
    errors::DeployError,
    factory::{ContractFactory, FactoryResolver, PendingDeployment},
    types::{DeploymentResult, DeploymentRun, NetworkTarget, Outcome, SkipReason},
};

/// Options controlling a deployment run
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Stop initiating targets after the first failure
    pub fail_fast: bool,
    /// Deploy to all targets concurrently
    pub parallel: bool,
    /// The bound on waiting for each deployment to be confirmed.
    ///
    /// Binding a factory and submitting the transaction are each held to the
    /// same bound.
    pub confirmation_timeout: Duration,
    /// Cancelled to stop initiating further targets; transactions already
    /// broadcast are not affected
    pub cancel: CancellationToken,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            parallel: false,
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
            cancel: CancellationToken::new(),
        }
    }
}

impl RunOptions {
    /// Check that the options can be honored together
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.fail_fast && self.parallel {
            return Err(DeployError::Configuration(
                "fail-fast cannot be combined with parallel deployment".to_string(),
            ));
        }

        if self.confirmation_timeout.is_zero() {
            return Err(DeployError::Configuration(
                "confirmation timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Deploy one contract instance to each target.
///
/// Fails only on a configuration error, before any target is attempted.
/// Per-target errors are recorded in the returned run.
pub async fn run<R: FactoryResolver>(
    targets: Vec<NetworkTarget>,
    resolver: Arc<R>,
    options: RunOptions,
) -> Result<DeploymentRun, DeployError> {
    if targets.is_empty() {
        return Err(DeployError::Configuration(
            "no deployment targets given".to_string(),
        ));
    }
    options.validate()?;

    info!(
        num_targets = targets.len(),
        parallel = options.parallel,
        "starting deployment run"
    );
    let results = if options.parallel {
        run_parallel(targets, resolver, &options).await
    } else {
        run_sequential(targets, resolver.as_ref(), &options).await
    };

    Ok(DeploymentRun::new(results))
}

/// Deploy to each target in turn
async fn run_sequential<R: FactoryResolver>(
    targets: Vec<NetworkTarget>,
    resolver: &R,
    options: &RunOptions,
) -> Vec<DeploymentResult> {
    let mut results = Vec::with_capacity(targets.len());
    let mut halted: Option<SkipReason> = None;

    for target in targets {
        if halted.is_none() && options.cancel.is_cancelled() {
            warn!("run cancelled, skipping remaining targets");
            halted = Some(SkipReason::Cancelled);
        }

        let outcome = match halted {
            Some(reason) => Outcome::Skipped { reason },
            None => attempt(resolver, &target, options.confirmation_timeout).await,
        };

        if options.fail_fast && outcome.is_failure() {
            warn!(network = %target.name, "fail-fast enabled, skipping remaining targets");
            halted = Some(SkipReason::FailFast);
        }

        results.push(DeploymentResult { target, outcome });
    }

    results
}

/// Deploy to every target concurrently, assembling results in input order
async fn run_parallel<R: FactoryResolver>(
    targets: Vec<NetworkTarget>,
    resolver: Arc<R>,
    options: &RunOptions,
) -> Vec<DeploymentResult> {
    let timeout = options.confirmation_timeout;
    let handles = targets
        .into_iter()
        .map(|target| {
            let handle = (!options.cancel.is_cancelled()).then(|| {
                let resolver = resolver.clone();
                let task_target = target.clone();
                tokio::spawn(
                    async move { attempt(resolver.as_ref(), &task_target, timeout).await },
                )
            });
            (target, handle)
        })
        .collect::<Vec<_>>();

    let mut results = Vec::with_capacity(handles.len());
    for (target, handle) in handles {
        let outcome = match handle {
            None => Outcome::Skipped {
                reason: SkipReason::Cancelled,
            },
            Some(handle) => handle.await.unwrap_or_else(|e| {
                error!(network = %target.name, "deployment task failed: {}", e);
                DeployError::Transaction(format!("deployment task failed: {}", e)).into()
            }),
        };

        results.push(DeploymentResult { target, outcome });
    }

    results
}

/// Attempt a single target's deployment, logging its outcome
async fn attempt<R: FactoryResolver>(
    resolver: &R,
    target: &NetworkTarget,
    timeout: Duration,
) -> Outcome {
    match deploy_target(resolver, target, timeout).await {
        Ok((contract_address, tx_hash)) => {
            info!(
                network = %target.name,
                %contract_address,
                %tx_hash,
                "contract deployed"
            );
            Outcome::Success {
                contract_address,
                tx_hash,
            }
        }
        Err(e) => {
            error!(network = %target.name, "deployment failed: {}", e);
            e.into()
        }
    }
}

/// Resolve a factory for the target, submit the deployment and wait for it
///
/// Each step is bounded by `timeout` on its own.
async fn deploy_target<R: FactoryResolver>(
    resolver: &R,
    target: &NetworkTarget,
    timeout: Duration,
) -> Result<(Address, TxHash), DeployError> {
    info!(network = %target.name, chain_id = target.chain_id, "deploying");
    let factory = bounded(timeout, "binding to the network", resolver.resolve(target)).await?;
    let pending = bounded(
        timeout,
        "submitting the deployment",
        factory.deploy(&target.constructor_args),
    )
    .await?;

    let tx_hash = pending.tx_hash();
    info!(network = %target.name, %tx_hash, "deployment submitted, awaiting confirmation");

    let step = format!("confirming {:#x}", tx_hash);
    let contract_address = bounded(timeout, &step, pending.confirm()).await?;

    Ok((contract_address, tx_hash))
}

/// Await one step of a deployment, failing with a timeout error once the bound expires
async fn bounded<T>(
    timeout: Duration,
    step: &str,
    fut: impl Future<Output = Result<T, DeployError>>,
) -> Result<T, DeployError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        DeployError::Timeout(format!(
            "{} did not complete within {}s",
            step,
            timeout.as_secs_f64()
        ))
    })?
}
