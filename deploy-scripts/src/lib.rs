//! Scripts for deploying the HibikiBridge contract to several EVM networks.
//!
//! A run deploys one instance of the contract per configured network, keeping
//! going past per-network failures and reporting a result for every network.

pub mod artifact;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod factory;
pub mod orchestrator;
pub mod report;
pub mod secrets;
pub mod signal;
pub mod types;
