use std::sync::Arc;
use tracing::info;

use crate::{
    chain::{lcd::LcdClient, models::Chain, signer::SignerClient},
    config::Config,
    contract::ContractGateway,
    error::AppResult,
    modules::Context,
    scheduler::ModuleScheduler,
};

/// Build the chain clients, the shared module context and a scheduler with
/// every enabled module registered. Fails on the first invalid module.
pub fn initialize_scheduler(config: &Config) -> AppResult<ModuleScheduler> {
    info!("Initializing coordinator components ...");

    let controller = Arc::new(LcdClient::new(
        Chain::Controller,
        &config.controller_lcd_url,
        config.request_timeout,
    )?);
    info!("✅ Controller LCD: {}", config.controller_lcd_url);

    let remote = Arc::new(LcdClient::new(
        Chain::Remote,
        &config.remote_lcd_url,
        config.request_timeout,
    )?);
    info!("✅ Remote LCD: {}", config.remote_lcd_url);

    let signer = SignerClient::new(
        &config.signer_url,
        config.wallet_address.clone(),
        config.gas_adjustment,
        config.request_timeout,
    )?;
    info!("✅ Signer for {} at {}", signer.sender(), config.signer_url);

    let contracts = Arc::new(ContractGateway::new(controller.clone(), signer));

    let ctx = Arc::new(Context {
        controller,
        remote,
        contracts,
        target_denom: config.target_denom.clone(),
        gas_denom: config.gas_denom.clone(),
        ica_fee: config.ica_fee,
    });

    let mut scheduler = ModuleScheduler::new(ctx);
    for definition in &config.modules {
        scheduler.register(definition.clone())?;
    }

    info!("✅ {} module(s) registered", scheduler.module_count());
    Ok(scheduler)
}
