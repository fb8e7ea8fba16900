pub mod amount;
pub mod lcd;
pub mod models;
pub mod signer;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

use crate::error::AppResult;
use models::{BalanceSnapshot, Coin, TxResult};

/// Read-only balance queries against one ledger
///
/// Results are eventually consistent; callers must not assume a balance read
/// reflects a transaction broadcast moments earlier.
#[async_trait]
pub trait ChainQueryPort: Send + Sync {
    /// Bank balance of `address` in `denom`
    async fn balance(&self, address: &str, denom: &str) -> AppResult<BalanceSnapshot>;
}

/// Smart-query / execute access to contracts on the controller chain
///
/// Messages are untyped JSON here; typed clients in `contract` build them.
#[async_trait]
pub trait ContractPort: Send + Sync {
    async fn query_smart(
        &self,
        contract: &str,
        msg: &serde_json::Value,
    ) -> AppResult<serde_json::Value>;

    /// Submit an execute transaction and wait for the broadcast result
    async fn execute(
        &self,
        contract: &str,
        msg: &serde_json::Value,
        funds: &[Coin],
    ) -> AppResult<TxResult>;
}
