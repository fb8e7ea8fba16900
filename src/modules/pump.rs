// Pump: sweeps the custody ICA balance on the remote chain back to the
// controller chain once it grows past the configured ceiling.
//
// Tick flow:
// 1. Discover the ICA address (once, then cached)
// 2. Read the ICA's target-denom balance on the remote chain
// 3. Read its gas-denom balance on the controller chain
// 4. Above threshold: push the full balance, self-funding the fee if needed

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{
    chain::models::Coin,
    contract::pump::PumpContract,
    error::AppResult,
    modules::{
        custody::CustodyAccount, decision::PushDecision, Context, Module, ModuleConfig,
        ModuleKind, RawModuleConfig, TickOutcome,
    },
};

pub struct PumpModule {
    config: ModuleConfig,
    ctx: Arc<Context>,
    contract: PumpContract,
    custody: CustodyAccount,
}

impl PumpModule {
    pub fn new(raw: &RawModuleConfig, ctx: &Arc<Context>) -> AppResult<Self> {
        let config = ModuleConfig::prepare(ModuleKind::Pump, raw)?;
        let contract = PumpContract::new(config.contract_address.clone(), ctx.contracts.clone());

        Ok(Self {
            config,
            ctx: ctx.clone(),
            contract,
            custody: CustodyAccount::Unregistered,
        })
    }

    #[cfg(test)]
    pub fn custody(&self) -> &CustodyAccount {
        &self.custody
    }
}

#[async_trait]
impl Module for PumpModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Pump
    }

    fn verify_config(raw: &RawModuleConfig) -> AppResult<()> {
        ModuleConfig::verify(ModuleKind::Pump, raw)
    }

    async fn tick(&mut self) -> AppResult<TickOutcome> {
        let contract = &self.contract;
        let Some(ica) = self.custody.discover(move || contract.query_ica()).await? else {
            info!("ICA of pump contract {} is not registered yet", contract.address());
            return Ok(TickOutcome::not_ready(format!(
                "pump ICA of {} not registered",
                contract.address()
            )));
        };

        let target = self.ctx.remote.balance(&ica, &self.ctx.target_denom).await?;
        let gas = self.ctx.controller.balance(&ica, &self.ctx.gas_denom).await?;

        info!("📊 Custody balances: {}, {}", gas, target);

        let decision =
            PushDecision::evaluate(target.amount, gas.amount, &self.config, self.ctx.fee_coin());

        if !decision.should_push {
            return Ok(TickOutcome::idle(format!(
                "{} at or below threshold {}; gas {}",
                target, self.config.threshold_amount, gas
            )));
        }

        info!(
            "🔄 Pushing {}{} to controller chain (fee coins: {:?})",
            decision.sweep_amount, self.ctx.target_denom, decision.fee_coins
        );

        let coins = vec![Coin::new(decision.sweep_amount, self.ctx.target_denom.clone())];
        let response = self.contract.push(coins, &decision.fee_coins).await?;

        info!("Push response: {:?}", response);

        Ok(TickOutcome::executed(format!(
            "pushed {}{} in tx {}",
            decision.sweep_amount, self.ctx.target_denom, response.txhash
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::{MockChain, MockContracts};
    use crate::chain::models::Chain;
    use crate::error::{AppError, BroadcastError};
    use crate::modules::TickStatus;

    const PUMP: &str = "neutron1pump";
    const ICA: &str = "cosmos1ica";

    struct Harness {
        controller: Arc<MockChain>,
        remote: Arc<MockChain>,
        contracts: Arc<MockContracts>,
        module: PumpModule,
    }

    fn harness(threshold: &str, fee_buffer: &str) -> Harness {
        let controller = MockChain::new(Chain::Controller);
        let remote = MockChain::new(Chain::Remote);
        let contracts = MockContracts::new();

        let ctx = Arc::new(Context {
            controller: controller.clone(),
            remote: remote.clone(),
            contracts: contracts.clone(),
            target_denom: "uatom".to_string(),
            gas_denom: "untrn".to_string(),
            ica_fee: 250_000,
        });

        let raw = RawModuleConfig {
            contract_address: Some(PUMP.to_string()),
            min_balance: Some(threshold.to_string()),
            fee_buffer: Some(fee_buffer.to_string()),
            denom: None,
        };

        Harness {
            controller,
            remote,
            contracts,
            module: PumpModule::new(&raw, &ctx).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_sweep_with_fee_coin() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.remote.set_balance(ICA, "uatom", 1500);
        h.controller.set_balance(ICA, "untrn", 0);

        let outcome = h.module.tick().await.unwrap();
        assert_eq!(outcome.status, TickStatus::Executed);

        let executes = h.contracts.executes();
        assert_eq!(executes.len(), 1);
        assert_eq!(executes[0].contract, PUMP);
        assert_eq!(
            executes[0].msg,
            serde_json::json!({"push": {"coins": [{"denom": "uatom", "amount": "1500"}]}})
        );
        assert_eq!(executes[0].funds, vec![Coin::new(250_000, "untrn")]);
    }

    #[tokio::test]
    async fn test_confirmed_push_reports_tx_hash() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.remote.set_balance(ICA, "uatom", 1001);

        let outcome = h.module.tick().await.unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.detail, "pushed 1001uatom in tx TX1");
    }

    #[tokio::test]
    async fn test_sweep_without_fee_coin_when_gas_covers_buffer() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.remote.set_balance(ICA, "uatom", 1500);
        h.controller.set_balance(ICA, "untrn", 500);

        h.module.tick().await.unwrap();

        let executes = h.contracts.executes();
        assert_eq!(executes.len(), 1);
        assert!(executes[0].funds.is_empty());
    }

    #[tokio::test]
    async fn test_balance_at_threshold_does_nothing() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.remote.set_balance(ICA, "uatom", 1000);

        for gas in [0, 499, 500, 10_000_000] {
            h.controller.set_balance(ICA, "untrn", gas);
            let outcome = h.module.tick().await.unwrap();
            assert_eq!(outcome.status, TickStatus::Idle);
            assert!(outcome.detail.contains("1000uatom on remote"));
        }

        assert!(h.contracts.executes().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_ica_is_not_ready() {
        let mut h = harness("1000", "500");
        h.contracts.respond(PUMP, serde_json::json!("none"));
        h.remote.set_balance(ICA, "uatom", 1500);

        let outcome = h.module.tick().await.unwrap();

        assert_eq!(outcome.status, TickStatus::NotReady);
        assert!(outcome.success());
        assert_eq!(h.contracts.query_count(), 1);
        assert_eq!(h.remote.calls(), 0);
        assert_eq!(h.controller.calls(), 0);
        assert!(h.contracts.executes().is_empty());
        assert_eq!(h.module.custody(), &CustodyAccount::Unregistered);
    }

    #[tokio::test]
    async fn test_discovery_query_runs_once() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);

        for _ in 0..4 {
            h.module.tick().await.unwrap();
        }

        assert_eq!(h.contracts.query_count(), 1);
        assert_eq!(h.remote.calls(), 4);
        assert_eq!(h.module.custody().address(), Some(ICA));
    }

    #[tokio::test]
    async fn test_registration_picked_up_on_later_tick() {
        let mut h = harness("1000", "500");
        h.contracts.respond(PUMP, serde_json::json!({"in_progress": {}}));

        let first = h.module.tick().await.unwrap();
        assert_eq!(first.status, TickStatus::NotReady);

        h.contracts.set_ica_registered(PUMP, ICA);
        h.remote.set_balance(ICA, "uatom", 5000);

        let second = h.module.tick().await.unwrap();
        assert_eq!(second.status, TickStatus::Executed);
        assert_eq!(h.contracts.query_count(), 2);
    }

    #[tokio::test]
    async fn test_second_tick_does_not_sweep_again() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.contracts.drain_on_execute(h.remote.clone(), ICA);
        h.remote.set_balance(ICA, "uatom", 1500);

        let first = h.module.tick().await.unwrap();
        let second = h.module.tick().await.unwrap();

        assert_eq!(first.status, TickStatus::Executed);
        assert_eq!(second.status, TickStatus::Idle);
        assert_eq!(h.contracts.executes().len(), 1);
    }

    #[tokio::test]
    async fn test_query_failure_surfaces_as_error() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.remote.set_failing(true);

        let err = h.module.tick().await.unwrap_err();
        assert!(matches!(err, AppError::Query { chain: Chain::Remote, .. }));
        assert!(h.contracts.executes().is_empty());

        // Cached discovery survives the failed tick
        assert_eq!(h.module.custody().address(), Some(ICA));
    }

    #[tokio::test]
    async fn test_broadcast_failure_is_not_retried_within_tick() {
        let mut h = harness("1000", "500");
        h.contracts.set_ica_registered(PUMP, ICA);
        h.contracts.set_reject_executes(true);
        h.remote.set_balance(ICA, "uatom", 2000);

        let err = h.module.tick().await.unwrap_err();
        assert!(matches!(err, AppError::Broadcast(BroadcastError::Rejected { .. })));
        assert_eq!(h.contracts.executes().len(), 1);

        // Next tick re-evaluates from fresh state and tries again
        h.contracts.set_reject_executes(false);
        let outcome = h.module.tick().await.unwrap();
        assert_eq!(outcome.status, TickStatus::Executed);
        assert_eq!(h.contracts.executes().len(), 2);
    }

    #[test]
    fn test_verify_config_requires_contract_address() {
        assert!(PumpModule::verify_config(&RawModuleConfig::default()).is_err());
        assert!(PumpModule::verify_config(&RawModuleConfig {
            contract_address: Some(PUMP.to_string()),
            ..Default::default()
        })
        .is_ok());
    }
}
