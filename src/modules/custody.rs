use std::future::Future;
use tracing::info;

use crate::{contract::IcaState, error::AppResult};

/// Discovery state of a contract's custody ICA
///
/// Registration is permanent for the lifetime of the account, so once an
/// address is seen it is cached and the contract is never asked again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CustodyAccount {
    #[default]
    Unregistered,
    Registered(String),
}

impl CustodyAccount {
    #[cfg(test)]
    pub fn address(&self) -> Option<&str> {
        match self {
            CustodyAccount::Registered(address) => Some(address),
            CustodyAccount::Unregistered => None,
        }
    }

    /// Return the cached address, or run `query` and cache its answer.
    /// `None` means the ICA is not registered yet.
    pub async fn discover<F, Fut>(&mut self, query: F) -> AppResult<Option<String>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<IcaState>>,
    {
        if let CustodyAccount::Registered(address) = self {
            return Ok(Some(address.clone()));
        }

        let state = query().await?;
        match state.address() {
            Some(address) => {
                info!("🔗 Custody ICA registered at {}", address);
                *self = CustodyAccount::Registered(address.to_string());
                Ok(Some(address.to_string()))
            }
            None => Ok(None),
        }
    }
}
