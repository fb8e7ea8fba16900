use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{
    contract::rewards::RewardsContract,
    error::AppResult,
    modules::{
        custody::CustodyAccount, decision::PushDecision, Context, Module, ModuleConfig,
        ModuleKind, RawModuleConfig, TickOutcome,
    },
};

/// Claims delegation rewards once the rewards ICA has accumulated enough of
/// the reward denom on the remote chain
pub struct RewardsModule {
    config: ModuleConfig,
    denom: String,
    ctx: Arc<Context>,
    contract: RewardsContract,
    custody: CustodyAccount,
}

impl RewardsModule {
    pub fn new(raw: &RawModuleConfig, ctx: &Arc<Context>) -> AppResult<Self> {
        let config = ModuleConfig::prepare(ModuleKind::Rewards, raw)?;
        let denom = raw
            .denom
            .clone()
            .unwrap_or_else(|| ctx.target_denom.clone());
        let contract = RewardsContract::new(config.contract_address.clone(), ctx.contracts.clone());

        Ok(Self {
            config,
            denom,
            ctx: ctx.clone(),
            contract,
            custody: CustodyAccount::Unregistered,
        })
    }
}

#[async_trait]
impl Module for RewardsModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Rewards
    }

    fn verify_config(raw: &RawModuleConfig) -> AppResult<()> {
        ModuleConfig::verify(ModuleKind::Rewards, raw)
    }

    async fn tick(&mut self) -> AppResult<TickOutcome> {
        let contract = &self.contract;
        let Some(ica) = self.custody.discover(move || contract.query_ica()).await? else {
            info!("ICA of rewards contract {} is not registered yet", contract.address());
            return Ok(TickOutcome::not_ready(format!(
                "rewards ICA of {} not registered",
                contract.address()
            )));
        };

        let rewards = self.ctx.remote.balance(&ica, &self.denom).await?;
        let gas = self.ctx.controller.balance(&ica, &self.ctx.gas_denom).await?;

        let decision =
            PushDecision::evaluate(rewards.amount, gas.amount, &self.config, self.ctx.fee_coin());

        if !decision.should_push {
            return Ok(TickOutcome::idle(format!(
                "{} at or below threshold {}",
                rewards, self.config.threshold_amount
            )));
        }

        info!("🔄 Claiming {}{} of rewards", decision.sweep_amount, self.denom);

        let response = self.contract.claim_rewards(&decision.fee_coins).await?;

        Ok(TickOutcome::executed(format!(
            "claimed {}{} in tx {}",
            decision.sweep_amount, self.denom, response.txhash
        )))
    }
}
