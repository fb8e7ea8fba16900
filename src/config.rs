use config::ConfigError;
use std::time::Duration;

use crate::{
    chain::amount::parse_amount_or,
    modules::{ModuleKind, RawModuleConfig, DEFAULT_ICA_FEE_BUFFER},
    scheduler::ModuleDefinition,
};

pub const DEFAULT_GAS_DENOM: &str = "untrn";
pub const DEFAULT_ICA_FEE: u64 = 1_000_000;
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub controller_lcd_url: String,
    pub remote_lcd_url: String,
    pub signer_url: String,
    pub wallet_address: String,
    pub target_denom: String,
    pub gas_denom: String,
    pub ica_fee: u64,
    pub gas_adjustment: f64,
    pub request_timeout: Duration,
    /// Enabled modules, in the order they were listed
    pub modules: Vec<ModuleDefinition>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Self::from_settings(&settings)
    }

    /// Extract the coordinator settings. Keys are the lowercased variable
    /// names. Module contract addresses are not checked here; an invalid
    /// module is rejected when it is registered.
    pub fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        let fee_buffer = opt(settings, "ica_fee_coins_buffer")?;
        parse_amount_or(fee_buffer.as_deref(), DEFAULT_ICA_FEE_BUFFER)
            .map_err(|e| ConfigError::Message(format!("ICA_FEE_COINS_BUFFER: {}", e)))?;

        let enabled = opt(settings, "coordinator_modules")?.unwrap_or_else(|| "pump".to_string());

        let mut modules = Vec::new();
        for name in enabled.split(',').filter(|n| !n.trim().is_empty()) {
            let kind: ModuleKind = name
                .parse()
                .map_err(|e| ConfigError::Message(format!("COORDINATOR_MODULES: {}", e)))?;
            let prefix = kind.as_str();

            let raw = RawModuleConfig {
                contract_address: opt(settings, &format!("{}_contract_address", prefix))?,
                min_balance: opt(settings, &format!("{}_min_balance", prefix))?,
                fee_buffer: fee_buffer.clone(),
                denom: opt(settings, &format!("{}_denom", prefix))?,
            };

            let interval_secs = match opt(settings, &format!("{}_interval_secs", prefix))? {
                Some(value) => value.trim().parse::<u64>().map_err(|e| {
                    ConfigError::Message(format!(
                        "{}_INTERVAL_SECS {:?}: {}",
                        prefix.to_uppercase(),
                        value,
                        e
                    ))
                })?,
                None => DEFAULT_INTERVAL_SECS,
            };

            modules.push(ModuleDefinition::new(
                kind,
                raw,
                Duration::from_secs(interval_secs),
            ));
        }

        let ica_fee = parse_amount_or(opt(settings, "ica_fee")?.as_deref(), DEFAULT_ICA_FEE)
            .map_err(|e| ConfigError::Message(format!("ICA_FEE: {}", e)))?;

        let gas_adjustment = match opt(settings, "gas_adjustment")? {
            Some(value) => value.trim().parse::<f64>().map_err(|e| {
                ConfigError::Message(format!("GAS_ADJUSTMENT {:?}: {}", value, e))
            })?,
            None => DEFAULT_GAS_ADJUSTMENT,
        };

        let timeout_secs = match opt(settings, "request_timeout_secs")? {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                ConfigError::Message(format!("REQUEST_TIMEOUT_SECS {:?}: {}", value, e))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            controller_lcd_url: opt(settings, "controller_lcd_url")?
                .unwrap_or_else(|| "http://127.0.0.1:1317".to_string()),
            remote_lcd_url: opt(settings, "remote_lcd_url")?
                .unwrap_or_else(|| "http://127.0.0.1:1318".to_string()),
            signer_url: opt(settings, "signer_url")?
                .unwrap_or_else(|| "http://127.0.0.1:8090".to_string()),
            wallet_address: required(settings, "wallet_address")?,
            target_denom: required(settings, "target_denom")?,
            gas_denom: opt(settings, "controller_gas_denom")?
                .unwrap_or_else(|| DEFAULT_GAS_DENOM.to_string()),
            ica_fee,
            gas_adjustment,
            request_timeout: Duration::from_secs(timeout_secs),
            modules,
        })
    }
}

// Unset and blank values both count as missing
fn opt(settings: &config::Config, key: &str) -> Result<Option<String>, ConfigError> {
    match settings.get_string(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn required(settings: &config::Config, key: &str) -> Result<String, ConfigError> {
    opt(settings, key)?
        .ok_or_else(|| ConfigError::Message(format!("{} must be set", key.to_uppercase())))
}
