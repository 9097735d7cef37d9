//! Presentation and persistence of a deployment run's results

use std::{fs, path::Path};

use alloy::primitives::{Address, TxHash};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::CompilerSettings,
    errors::DeployError,
    types::{DeploymentRun, Outcome},
};

/// The header row of the summary table
const SUMMARY_HEADER: [&str; 4] = ["NETWORK", "CHAIN ID", "STATUS", "ADDRESS / DETAIL"];

/// A successful deployment, as recorded in the deployments file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: TxHash,
    /// The chain the contract was deployed to
    pub chain_id: u64,
    /// The compiler settings of the deployed artifact
    pub compiler: CompilerSettings,
}

/// Render a table with one line per target of the run
pub fn summary_table(run: &DeploymentRun) -> String {
    let rows = run
        .iter()
        .map(|result| {
            let (status, detail) = match &result.outcome {
                Outcome::Success {
                    contract_address, ..
                } => ("success".to_string(), format!("{:#x}", contract_address)),
                Outcome::Failure { kind, detail } => (format!("failed ({})", kind), detail.clone()),
                Outcome::Skipped { reason } => ("skipped".to_string(), reason.to_string()),
            };

            [
                result.target.name.clone(),
                result.target.chain_id.to_string(),
                status,
                detail,
            ]
        })
        .collect_vec();

    // The last column is left unpadded
    let widths: Vec<usize> = (0..SUMMARY_HEADER.len() - 1)
        .map(|col| {
            rows.iter()
                .map(|row| row[col].len())
                .chain([SUMMARY_HEADER[col].len()])
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_row = |cells: [&str; 4]| {
        cells
            .iter()
            .enumerate()
            .map(|(col, cell)| match widths.get(col) {
                Some(width) => format!("{:<width$}", cell, width = width),
                None => cell.to_string(),
            })
            .join("  ")
    };

    let succeeded = run.iter().filter(|r| r.outcome.is_success()).count();
    std::iter::once(format_row(SUMMARY_HEADER))
        .chain(rows.iter().map(|row| {
            format_row([
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str(),
            ])
        }))
        .chain([format!("{} of {} targets deployed", succeeded, run.len())])
        .join("\n")
}

/// Record every successful deployment of the run in the deployments file.
///
/// The file maps contract name to network name to [`DeploymentRecord`].
/// Records of other contracts and networks already in the file are kept.
pub fn write_deployments(
    path: &Path,
    contract: &str,
    compiler: &CompilerSettings,
    run: &DeploymentRun,
) -> Result<(), DeployError> {
    let mut deployments: Map<String, Value> = if path.exists() {
        let contents = fs::read_to_string(path)
            .map_err(|e| DeployError::ReadFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| DeployError::ReadFile(format!("{}: {}", path.display(), e)))?
    } else {
        Map::new()
    };

    let entry = deployments
        .entry(contract.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(networks) = entry else {
        return Err(DeployError::WriteFile(format!(
            "`{}` in {} is not an object",
            contract,
            path.display()
        )));
    };

    for result in run.iter() {
        if let Outcome::Success {
            contract_address,
            tx_hash,
        } = &result.outcome
        {
            let record = DeploymentRecord {
                address: *contract_address,
                tx_hash: *tx_hash,
                chain_id: result.target.chain_id,
                compiler: compiler.clone(),
            };
            let record = serde_json::to_value(record)
                .map_err(|e| DeployError::WriteFile(e.to_string()))?;
            networks.insert(result.target.name.clone(), record);
        }
    }

    let contents = serde_json::to_string_pretty(&deployments)
        .map_err(|e| DeployError::WriteFile(e.to_string()))?;
    fs::write(path, contents)
        .map_err(|e| DeployError::WriteFile(format!("{}: {}", path.display(), e)))
}

/// Read a single deployment record back from the deployments file
pub fn read_deployment(
    path: &Path,
    contract: &str,
    network: &str,
) -> Result<DeploymentRecord, DeployError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DeployError::ReadFile(format!("{}: {}", path.display(), e)))?;
    let json: Value =
        serde_json::from_str(&contents).map_err(|e| DeployError::ReadFile(e.to_string()))?;

    let record = json
        .get(contract)
        .and_then(|c| c.get(network))
        .ok_or_else(|| {
            DeployError::ReadFile(format!(
                "no `{}` deployment for `{}` in {}",
                contract,
                network,
                path.display()
            ))
        })?;

    serde_json::from_value(record.clone()).map_err(|e| DeployError::ReadFile(e.to_string()))
}
