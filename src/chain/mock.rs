// In-memory ports for tests. Both record every call so tests can assert on
// call counts and submitted payloads.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    chain::{
        models::{BalanceSnapshot, Chain, Coin, TxResult},
        ChainQueryPort, ContractPort,
    },
    error::{AppError, AppResult, BroadcastError},
};

pub struct MockChain {
    chain: Chain,
    balances: Mutex<HashMap<(String, String), u64>>,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockChain {
    pub fn new(chain: Chain) -> Arc<Self> {
        Arc::new(Self {
            chain,
            balances: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn set_balance(&self, address: &str, denom: &str, amount: u64) {
        self.balances
            .lock()
            .insert((address.to_string(), denom.to_string()), amount);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every balance query take `delay`
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of balance queries that were ever running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainQueryPort for MockChain {
    async fn balance(&self, address: &str, denom: &str) -> AppResult<BalanceSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::query(self.chain, "connection refused"));
        }

        let amount = self
            .balances
            .lock()
            .get(&(address.to_string(), denom.to_string()))
            .copied()
            .unwrap_or(0);

        Ok(BalanceSnapshot {
            chain: self.chain,
            denom: denom.to_string(),
            amount,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExecuteCall {
    pub contract: String,
    pub msg: serde_json::Value,
    pub funds: Vec<Coin>,
}

/// Moves the swept coins out of the custody account once a push lands
struct Drain {
    chain: Arc<MockChain>,
    address: String,
}

pub struct MockContracts {
    query_responses: Mutex<HashMap<String, serde_json::Value>>,
    queries: Mutex<Vec<(String, serde_json::Value)>>,
    executes: Mutex<Vec<ExecuteCall>>,
    reject_executes: AtomicBool,
    drain: Mutex<Option<Drain>>,
}

impl MockContracts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            query_responses: Mutex::new(HashMap::new()),
            queries: Mutex::new(Vec::new()),
            executes: Mutex::new(Vec::new()),
            reject_executes: AtomicBool::new(false),
            drain: Mutex::new(None),
        })
    }

    /// Answer every smart query on `contract` with `response`
    pub fn respond(&self, contract: &str, response: serde_json::Value) {
        self.query_responses
            .lock()
            .insert(contract.to_string(), response);
    }

    pub fn set_ica_registered(&self, contract: &str, ica_address: &str) {
        self.respond(
            contract,
            serde_json::json!({"registered": {"ica_address": ica_address}}),
        );
    }

    pub fn set_reject_executes(&self, reject: bool) {
        self.reject_executes.store(reject, Ordering::SeqCst);
    }

    /// Zero the pushed denom balances of `address` on `chain` after each execute
    pub fn drain_on_execute(&self, chain: Arc<MockChain>, address: &str) {
        *self.drain.lock() = Some(Drain {
            chain,
            address: address.to_string(),
        });
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn executes(&self) -> Vec<ExecuteCall> {
        self.executes.lock().clone()
    }
}

#[async_trait]
impl ContractPort for MockContracts {
    async fn query_smart(
        &self,
        contract: &str,
        msg: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        self.queries
            .lock()
            .push((contract.to_string(), msg.clone()));

        self.query_responses
            .lock()
            .get(contract)
            .cloned()
            .ok_or_else(|| AppError::query(Chain::Controller, format!("no such contract {}", contract)))
    }

    async fn execute(
        &self,
        contract: &str,
        msg: &serde_json::Value,
        funds: &[Coin],
    ) -> AppResult<TxResult> {
        self.executes.lock().push(ExecuteCall {
            contract: contract.to_string(),
            msg: msg.clone(),
            funds: funds.to_vec(),
        });

        if self.reject_executes.load(Ordering::SeqCst) {
            return Err(BroadcastError::Rejected {
                txhash: "REJECTED".to_string(),
                code: 5,
                raw_log: "insufficient funds".to_string(),
            }
            .into());
        }

        if let Some(drain) = self.drain.lock().as_ref() {
            if let Some(coins) = msg.pointer("/push/coins").and_then(|c| c.as_array()) {
                for coin in coins {
                    if let Some(denom) = coin.get("denom").and_then(|d| d.as_str()) {
                        drain.chain.set_balance(&drain.address, denom, 0);
                    }
                }
            }
        }

        let height = self.executes.lock().len() as u64;
        Ok(TxResult {
            txhash: format!("TX{}", height),
            height,
            code: 0,
            raw_log: String::new(),
        })
    }
}
