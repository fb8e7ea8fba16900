use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    chain::{
        lcd::LcdClient,
        models::{Coin, TxResult},
        signer::SignerClient,
        ContractPort,
    },
    error::AppResult,
};

/// Reads go to the controller LCD, writes go through the signer
pub struct ContractGateway {
    lcd: Arc<LcdClient>,
    signer: SignerClient,
}

impl ContractGateway {
    pub fn new(lcd: Arc<LcdClient>, signer: SignerClient) -> Self {
        Self { lcd, signer }
    }
}

#[async_trait]
impl ContractPort for ContractGateway {
    async fn query_smart(
        &self,
        contract: &str,
        msg: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        self.lcd.query_smart(contract, msg).await
    }

    async fn execute(
        &self,
        contract: &str,
        msg: &serde_json::Value,
        funds: &[Coin],
    ) -> AppResult<TxResult> {
        self.signer.execute(contract, msg, funds).await
    }
}
