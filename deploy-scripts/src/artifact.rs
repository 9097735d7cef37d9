//! Loading of compiled contract artifacts
//!
//! Artifacts are the JSON files Hardhat writes under
//! `artifacts/contracts/<Name>.sol/<Name>.json`, holding the contract's ABI
//! and creation bytecode.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolValue, Specifier},
    json_abi::JsonAbi,
    primitives::Bytes,
};
use serde::Deserialize;

use crate::{constants::HARDHAT_ARTIFACTS_DIR, errors::DeployError};

/// A compiled contract, ready to be deployed
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract's ABI
    pub abi: JsonAbi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

/// The path Hardhat writes the artifact of the given contract to
pub fn hardhat_artifact_path(contract: &str) -> PathBuf {
    PathBuf::from(HARDHAT_ARTIFACTS_DIR)
        .join(format!("{contract}.sol"))
        .join(format!("{contract}.json"))
}

impl ContractArtifact {
    /// Load an artifact from a file
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DeployError::ReadFile(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Parse an artifact from its JSON representation
    pub fn from_json(contents: &str) -> Result<Self, DeployError> {
        let artifact: Self = serde_json::from_str(contents)
            .map_err(|e| DeployError::ArtifactParsing(e.to_string()))?;

        // Interfaces and abstract contracts compile to empty bytecode
        if artifact.bytecode.is_empty() {
            return Err(DeployError::ArtifactParsing(format!(
                "`{}` has no creation bytecode",
                artifact.contract_name
            )));
        }

        Ok(artifact)
    }

    /// Check that the given constructor arguments match the ABI's constructor
    pub fn check_constructor_args(&self, args: &[DynSolValue]) -> Result<(), DeployError> {
        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default();

        if inputs.len() != args.len() {
            return Err(DeployError::Configuration(format!(
                "`{}` takes {} constructor arguments, {} given",
                self.contract_name,
                inputs.len(),
                args.len()
            )));
        }

        for (param, arg) in inputs.iter().zip(args) {
            let ty = param
                .resolve()
                .map_err(|e| DeployError::ArtifactParsing(e.to_string()))?;
            if !ty.matches(arg) {
                return Err(DeployError::Configuration(format!(
                    "constructor argument `{}` of `{}` must be of type {}",
                    param.name, self.contract_name, param.ty
                )));
            }
        }

        Ok(())
    }

    /// The creation code for a deployment: the bytecode followed by the encoded
    /// constructor arguments
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Bytes {
        let mut code = self.bytecode.to_vec();
        if !args.is_empty() {
            code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }

        code.into()
    }
}
