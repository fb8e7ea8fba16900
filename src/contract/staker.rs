use serde::Serialize;
use std::sync::Arc;

use crate::{
    chain::{
        models::{Coin, TxResult},
        ContractPort,
    },
    error::AppResult,
};

/// Assumed execute interface: no staker schema is vendored in this repo, so
/// check it against the deployed contract before enabling the module
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakerExecuteMsg {
    IbcTransfer {},
}

/// Client for the staker contract, which forwards deposits collected on the
/// controller chain to its remote ICA for delegation
pub struct StakerContract {
    address: String,
    port: Arc<dyn ContractPort>,
}

impl StakerContract {
    pub fn new(address: String, port: Arc<dyn ContractPort>) -> Self {
        Self { address, port }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn ibc_transfer(&self, funds: &[Coin]) -> AppResult<TxResult> {
        let msg = serde_json::to_value(StakerExecuteMsg::IbcTransfer {})?;
        self.port.execute(&self.address, &msg, funds).await
    }
}
