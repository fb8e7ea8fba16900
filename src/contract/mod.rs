// Typed clients for the protocol contracts the modules drive
pub mod gateway;
pub mod pump;
pub mod rewards;
pub mod staker;

use serde::{Deserialize, Serialize};

pub use gateway::ContractGateway;

/// Registration state of a contract-owned interchain account, as reported by
/// the contract's `{"ica":{}}` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IcaState {
    None,
    InProgress {},
    Registered { ica_address: String },
}

impl IcaState {
    pub fn address(&self) -> Option<&str> {
        match self {
            IcaState::Registered { ica_address } if !ica_address.is_empty() => {
                Some(ica_address.as_str())
            }
            _ => None,
        }
    }
}
