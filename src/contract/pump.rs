use serde::Serialize;
use std::sync::Arc;

use crate::{
    chain::{
        models::{Coin, TxResult},
        ContractPort,
    },
    contract::IcaState,
    error::AppResult,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpQueryMsg {
    Ica {},
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpExecuteMsg {
    Push { coins: Vec<Coin> },
}

/// Client for the pump contract, which moves funds from its remote ICA back
/// to the controller chain
pub struct PumpContract {
    address: String,
    port: Arc<dyn ContractPort>,
}

impl PumpContract {
    pub fn new(address: String, port: Arc<dyn ContractPort>) -> Self {
        Self { address, port }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn query_ica(&self) -> AppResult<IcaState> {
        let msg = serde_json::to_value(PumpQueryMsg::Ica {})?;
        let data = self.port.query_smart(&self.address, &msg).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Push `coins` from the ICA home, paying `funds` as attached fee coins
    pub async fn push(&self, coins: Vec<Coin>, funds: &[Coin]) -> AppResult<TxResult> {
        let msg = serde_json::to_value(PumpExecuteMsg::Push { coins })?;
        self.port.execute(&self.address, &msg, funds).await
    }
}
