use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    chain::{
        models::{BalanceSnapshot, Chain, Coin},
        ChainQueryPort,
    },
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Option<Coin>,
}

#[derive(Debug, Deserialize)]
struct SmartQueryResponse {
    data: serde_json::Value,
}

/// Cosmos LCD (REST) client for one chain
pub struct LcdClient {
    chain: Chain,
    base_url: Url,
    http: Client,
}

impl LcdClient {
    pub fn new(chain: Chain, base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Config(format!("Invalid {} LCD url {:?}: {}", chain, base_url, e))
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            chain,
            base_url,
            http,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!("{} LCD url cannot be a base", self.chain))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn balance_url(&self, address: &str, denom: &str) -> AppResult<Url> {
        let mut url = self.endpoint(&[
            "cosmos", "bank", "v1beta1", "balances", address, "by_denom",
        ])?;
        url.query_pairs_mut().append_pair("denom", denom);
        Ok(url)
    }

    fn smart_query_url(&self, contract: &str, msg: &serde_json::Value) -> AppResult<Url> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(serde_json::to_vec(msg)?);
        self.endpoint(&["cosmwasm", "wasm", "v1", "contract", contract, "smart", &encoded])
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::query(self.chain, format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::query(
                self.chain,
                format!("HTTP {} from {}: {}", status.as_u16(), url, body),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::query(self.chain, format!("malformed response from {}: {}", url, e)))
    }

    /// Run a contract smart query and return its `data` payload
    pub async fn query_smart(
        &self,
        contract: &str,
        msg: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        let url = self.smart_query_url(contract, msg)?;
        let response: SmartQueryResponse = self.get_json(url).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl ChainQueryPort for LcdClient {
    async fn balance(&self, address: &str, denom: &str) -> AppResult<BalanceSnapshot> {
        let url = self.balance_url(address, denom)?;
        let response: BalanceResponse = self.get_json(url).await?;

        // An account that never held the denom has no balance entry
        let amount = response.balance.map(|coin| coin.amount).unwrap_or(0);

        Ok(BalanceSnapshot {
            chain: self.chain,
            denom: denom.to_string(),
            amount,
        })
    }
}
