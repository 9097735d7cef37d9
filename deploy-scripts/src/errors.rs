//! Definitions of errors that can occur during deployment of the contracts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::types::FailureKind;

/// Errors that can occur while configuring or executing a deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// A missing or malformed network descriptor, secret, or run option.
    ///
    /// Always fatal before any transaction is submitted.
    Configuration(String),
    /// The RPC endpoint is unreachable or misbehaving
    Network(String),
    /// The deployment transaction was rejected, reverted, or produced no contract
    Transaction(String),
    /// The deployment transaction was not confirmed in time
    Timeout(String),
    /// Error reading a file from disk
    ReadFile(String),
    /// Error writing a file to disk
    WriteFile(String),
    /// Error parsing a compiled contract artifact
    ArtifactParsing(String),
}

impl DeployError {
    /// The failure kind recorded in a target's outcome for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            DeployError::Network(_) => FailureKind::Network,
            DeployError::Transaction(_) => FailureKind::Transaction,
            DeployError::Timeout(_) => FailureKind::Timeout,
            DeployError::Configuration(_)
            | DeployError::ReadFile(_)
            | DeployError::WriteFile(_)
            | DeployError::ArtifactParsing(_) => FailureKind::Configuration,
        }
    }

    /// The human-readable detail carried by the error
    pub fn detail(&self) -> &str {
        match self {
            DeployError::Configuration(s)
            | DeployError::Network(s)
            | DeployError::Transaction(s)
            | DeployError::Timeout(s)
            | DeployError::ReadFile(s)
            | DeployError::WriteFile(s)
            | DeployError::ArtifactParsing(s) => s,
        }
    }
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::Configuration(s) => write!(f, "configuration error: {}", s),
            DeployError::Network(s) => write!(f, "network error: {}", s),
            DeployError::Transaction(s) => write!(f, "transaction error: {}", s),
            DeployError::Timeout(s) => write!(f, "timeout: {}", s),
            DeployError::ReadFile(s) => write!(f, "error reading file: {}", s),
            DeployError::WriteFile(s) => write!(f, "error writing file: {}", s),
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
        }
    }
}

impl Error for DeployError {}
