use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{
    contract::staker::StakerContract,
    error::{AppError, AppResult},
    modules::{
        decision::PushDecision, Context, Module, ModuleConfig, ModuleKind, RawModuleConfig,
        TickOutcome,
    },
};

/// Forwards deposits that pile up in the staker contract on the controller
/// chain to the remote ICA, where they get delegated
pub struct StakerModule {
    config: ModuleConfig,
    /// Controller-side (IBC) denom of the staked asset
    denom: String,
    ctx: Arc<Context>,
    contract: StakerContract,
}

impl StakerModule {
    pub fn new(raw: &RawModuleConfig, ctx: &Arc<Context>) -> AppResult<Self> {
        let config = ModuleConfig::prepare(ModuleKind::Staker, raw)?;
        let denom = raw
            .denom
            .clone()
            .ok_or_else(|| AppError::Config("staker denom is not provided".to_string()))?;
        let contract = StakerContract::new(config.contract_address.clone(), ctx.contracts.clone());

        Ok(Self {
            config,
            denom,
            ctx: ctx.clone(),
            contract,
        })
    }
}

#[async_trait]
impl Module for StakerModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Staker
    }

    fn verify_config(raw: &RawModuleConfig) -> AppResult<()> {
        ModuleConfig::verify(ModuleKind::Staker, raw)?;

        match raw.denom.as_deref() {
            Some(denom) if !denom.trim().is_empty() => Ok(()),
            _ => Err(AppError::Config("staker denom is not provided".to_string())),
        }
    }

    async fn tick(&mut self) -> AppResult<TickOutcome> {
        let address = self.contract.address();

        let pending = self.ctx.controller.balance(address, &self.denom).await?;
        let gas = self.ctx.controller.balance(address, &self.ctx.gas_denom).await?;

        info!("📊 Staker contract balances: {}, {}", gas, pending);

        let decision =
            PushDecision::evaluate(pending.amount, gas.amount, &self.config, self.ctx.fee_coin());

        if !decision.should_push {
            return Ok(TickOutcome::idle(format!(
                "{} at or below threshold {}",
                pending, self.config.threshold_amount
            )));
        }

        info!(
            "🔄 Transferring {}{} to the staking ICA",
            decision.sweep_amount, self.denom
        );

        let response = self.contract.ibc_transfer(&decision.fee_coins).await?;

        info!("IBC transfer response: {:?}", response);

        Ok(TickOutcome::executed(format!(
            "transferred {}{} in tx {}",
            decision.sweep_amount, self.denom, response.txhash
        )))
    }
}
