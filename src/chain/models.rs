use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chain::amount;

/// The two ledgers the coordinator reconciles between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Hosts the protocol contracts and pays gas in the controller denom
    Controller,
    /// Hosts the interchain account that custodies staked funds
    Remote,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Controller => "controller",
            Chain::Remote => "remote",
        }
    }
}

/// A single denom/amount pair. Amounts go over the wire as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount::as_string")]
    pub amount: u64,
}

impl Coin {
    pub fn new(amount: u64, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Balance observed on one chain during a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub chain: Chain,
    pub denom: String,
    pub amount: u64,
}

impl fmt::Display for BalanceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} on {}", self.amount, self.denom, self.chain)
    }
}

/// Confirmed transaction returned by the broadcast primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub txhash: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
}
