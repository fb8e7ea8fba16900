// Transaction broadcast through an external signer service.
//
// Key material never enters this process: the signer holds the wallet, signs
// the execute message, broadcasts it and answers once the tx is in a block.

use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    chain::models::{Coin, TxResult},
    error::{AppError, AppResult, BroadcastError},
};

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    sender: &'a str,
    contract: &'a str,
    msg: &'a serde_json::Value,
    funds: &'a [Coin],
    gas_adjustment: f64,
}

pub struct SignerClient {
    execute_url: Url,
    sender: String,
    gas_adjustment: f64,
    http: Client,
}

impl SignerClient {
    pub fn new(
        signer_url: &str,
        sender: String,
        gas_adjustment: f64,
        timeout: Duration,
    ) -> AppResult<Self> {
        let mut execute_url = Url::parse(signer_url)
            .map_err(|e| AppError::Config(format!("Invalid signer url {:?}: {}", signer_url, e)))?;
        execute_url
            .path_segments_mut()
            .map_err(|_| AppError::Config("Signer url cannot be a base".to_string()))?
            .pop_if_empty()
            .push("execute");

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            execute_url,
            sender,
            gas_adjustment,
            http,
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub async fn execute(
        &self,
        contract: &str,
        msg: &serde_json::Value,
        funds: &[Coin],
    ) -> AppResult<TxResult> {
        let request = ExecuteRequest {
            sender: &self.sender,
            contract,
            msg,
            funds,
            gas_adjustment: self.gas_adjustment,
        };

        debug!("Submitting execute on {}: {}", contract, msg);

        let response = self
            .http
            .post(self.execute_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| BroadcastError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BroadcastError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let tx: TxResult = response
            .json()
            .await
            .map_err(|e| BroadcastError::InvalidResponse(e.to_string()))?;

        check_tx(tx).map(|tx| {
            info!("✓ Tx {} included at height {}", tx.txhash, tx.height);
            tx
        })
    }
}

/// A non-zero code means the chain accepted the bytes but the tx failed
fn check_tx(tx: TxResult) -> AppResult<TxResult> {
    if tx.code != 0 {
        return Err(BroadcastError::Rejected {
            txhash: tx.txhash,
            code: tx.code,
            raw_log: tx.raw_log,
        }
        .into());
    }
    Ok(tx)
}
