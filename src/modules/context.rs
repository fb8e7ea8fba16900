use std::sync::Arc;

use crate::chain::{models::Coin, ChainQueryPort, ContractPort};

/// Everything a module needs from the outside world. Built once at startup
/// and shared read-only by every module.
pub struct Context {
    pub controller: Arc<dyn ChainQueryPort>,
    pub remote: Arc<dyn ChainQueryPort>,
    pub contracts: Arc<dyn ContractPort>,
    /// Denom custodied on the remote chain
    pub target_denom: String,
    /// Fee-paying denom on the controller chain
    pub gas_denom: String,
    /// Fixed amount of `gas_denom` attached when a contract needs fee coins
    pub ica_fee: u64,
}

impl Context {
    /// The self-funding fee coin attached to executes
    pub fn fee_coin(&self) -> Coin {
        Coin::new(self.ica_fee, self.gas_denom.clone())
    }
}
