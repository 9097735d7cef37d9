//! Miscellaneous test helpers

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, FixedBytes, TxHash},
    transports::http::reqwest::Url,
};
use deploy_scripts::{secrets::SigningKey, types::NetworkTarget};

/// A well-formed key that is never used against a live network
pub const DUMMY_SIGNING_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Build a target for the named network with distinct constructor addresses
pub fn mock_target(name: &str, chain_id: u64) -> NetworkTarget {
    let tag = chain_id as u8;
    NetworkTarget {
        name: name.to_string(),
        rpc_url: Url::parse(&format!("http://{name}.invalid:8545")).unwrap(),
        chain_id,
        signing_key: SigningKey::new(DUMMY_SIGNING_KEY),
        constructor_args: vec![
            DynSolValue::Address(Address::repeat_byte(tag)),
            DynSolValue::Address(Address::repeat_byte(tag.wrapping_add(1))),
            DynSolValue::Address(Address::repeat_byte(tag.wrapping_add(2))),
        ],
        gas_price: None,
    }
}

/// Build one target per `(name, chain_id)` pair, in order
pub fn mock_targets(networks: &[(&str, u64)]) -> Vec<NetworkTarget> {
    networks
        .iter()
        .map(|(name, chain_id)| mock_target(name, *chain_id))
        .collect()
}

/// The address a scripted deployment on the given chain reports by default
pub fn deployed_address(chain_id: u64) -> Address {
    Address::from(FixedBytes::<20>::left_padding_from(&chain_id.to_be_bytes()))
}

/// The transaction hash a scripted deployment on the given chain reports
pub fn deployment_tx_hash(chain_id: u64) -> TxHash {
    TxHash::left_padding_from(&chain_id.to_be_bytes())
}
