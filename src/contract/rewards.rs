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
pub enum RewardsQueryMsg {
    Ica {},
}

/// Assumed execute interface: no rewards schema is vendored in this repo.
/// The `Ica` query is assumed to match the pump's.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardsExecuteMsg {
    ClaimRewards {},
}

/// Client for the rewards contract, whose ICA withdraws delegation rewards on
/// the remote chain
pub struct RewardsContract {
    address: String,
    port: Arc<dyn ContractPort>,
}

impl RewardsContract {
    pub fn new(address: String, port: Arc<dyn ContractPort>) -> Self {
        Self { address, port }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn query_ica(&self) -> AppResult<IcaState> {
        let msg = serde_json::to_value(RewardsQueryMsg::Ica {})?;
        let data = self.port.query_smart(&self.address, &msg).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn claim_rewards(&self, funds: &[Coin]) -> AppResult<TxResult> {
        let msg = serde_json::to_value(RewardsExecuteMsg::ClaimRewards {})?;
        self.port.execute(&self.address, &msg, funds).await
    }
}
