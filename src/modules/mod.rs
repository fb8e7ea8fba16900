// Reconciliation modules. Each one is an independent routine with a single
// `tick`; the scheduler decides when ticks happen.
pub mod context;
pub mod custody;
pub mod decision;
pub mod pump;
pub mod rewards;
pub mod staker;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use crate::{
    chain::amount::parse_amount_or,
    error::{describe_validation, AppError, AppResult},
};

pub use context::Context;
pub use pump::PumpModule;
pub use rewards::RewardsModule;
pub use staker::StakerModule;

/// Threshold used when a module has no `min_balance` configured
pub const DEFAULT_MIN_BALANCE: u64 = 1_000;
/// Fee buffer used when `ICA_FEE_COINS_BUFFER` is unset
pub const DEFAULT_ICA_FEE_BUFFER: u64 = 1_000_000;

/// Module settings as read from the environment, before validation
#[derive(Debug, Clone, Default, Validate)]
pub struct RawModuleConfig {
    #[validate(
        required(message = "contract address is not provided"),
        length(min = 1, message = "contract address is empty")
    )]
    pub contract_address: Option<String>,
    pub min_balance: Option<String>,
    pub fee_buffer: Option<String>,
    pub denom: Option<String>,
}

/// Validated, immutable module settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    pub contract_address: String,
    pub threshold_amount: u64,
    pub fee_buffer_amount: u64,
}

impl ModuleConfig {
    /// Checks shared by every module kind. Never touches the network.
    pub fn verify(kind: ModuleKind, raw: &RawModuleConfig) -> AppResult<()> {
        raw.validate()
            .map_err(|e| AppError::Config(format!("{} module: {}", kind, describe_validation(&e))))?;

        if raw.contract_address.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(AppError::Config(format!("{} module: contract address is empty", kind)));
        }

        parse_amount_or(raw.min_balance.as_deref(), DEFAULT_MIN_BALANCE)
            .map_err(|e| AppError::Config(format!("{} module min balance: {}", kind, e)))?;
        parse_amount_or(raw.fee_buffer.as_deref(), DEFAULT_ICA_FEE_BUFFER)
            .map_err(|e| AppError::Config(format!("{} module fee buffer: {}", kind, e)))?;

        Ok(())
    }

    pub fn prepare(kind: ModuleKind, raw: &RawModuleConfig) -> AppResult<Self> {
        Self::verify(kind, raw)?;

        let contract_address = raw
            .contract_address
            .clone()
            .ok_or_else(|| AppError::Config(format!("{} contract address is not provided", kind)))?;

        Ok(Self {
            contract_address,
            threshold_amount: parse_amount_or(raw.min_balance.as_deref(), DEFAULT_MIN_BALANCE)?,
            fee_buffer_amount: parse_amount_or(raw.fee_buffer.as_deref(), DEFAULT_ICA_FEE_BUFFER)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// A transaction was submitted and confirmed
    Executed,
    /// Balances observed, nothing to do
    Idle,
    /// Preconditions not met yet (e.g. ICA not registered)
    NotReady,
    Failed,
}

/// Result of one tick, for logs and the status board only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub status: TickStatus,
    pub detail: String,
}

impl TickOutcome {
    pub fn executed(detail: impl Into<String>) -> Self {
        Self { status: TickStatus::Executed, detail: detail.into() }
    }

    pub fn idle(detail: impl Into<String>) -> Self {
        Self { status: TickStatus::Idle, detail: detail.into() }
    }

    pub fn not_ready(detail: impl Into<String>) -> Self {
        Self { status: TickStatus::NotReady, detail: detail.into() }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self { status: TickStatus::Failed, detail: detail.into() }
    }

    pub fn success(&self) -> bool {
        self.status != TickStatus::Failed
    }
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.status, self.detail)
    }
}

/// Capability every reconciliation routine provides
///
/// INVARIANTS:
/// - `tick` is idempotent: without an on-chain change in between, a second
///   tick must not move funds again
/// - `verify_config` is pure and runs before the module is ever scheduled
#[async_trait]
pub trait Module: Send {
    fn kind(&self) -> ModuleKind;

    fn verify_config(raw: &RawModuleConfig) -> AppResult<()>
    where
        Self: Sized;

    async fn tick(&mut self) -> AppResult<TickOutcome>;
}

/// Registry tag for the available routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Pump,
    Staker,
    Rewards,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Pump => "pump",
            ModuleKind::Staker => "staker",
            ModuleKind::Rewards => "rewards",
        }
    }

    pub fn all() -> Vec<ModuleKind> {
        vec![ModuleKind::Pump, ModuleKind::Staker, ModuleKind::Rewards]
    }

    pub fn verify_config(&self, raw: &RawModuleConfig) -> AppResult<()> {
        match self {
            ModuleKind::Pump => PumpModule::verify_config(raw),
            ModuleKind::Staker => StakerModule::verify_config(raw),
            ModuleKind::Rewards => RewardsModule::verify_config(raw),
        }
    }

    /// Verify `raw` and construct the matching module
    pub fn build(&self, raw: &RawModuleConfig, ctx: &Arc<Context>) -> AppResult<AnyModule> {
        self.verify_config(raw)?;

        let module = match self {
            ModuleKind::Pump => AnyModule::Pump(PumpModule::new(raw, ctx)?),
            ModuleKind::Staker => AnyModule::Staker(StakerModule::new(raw, ctx)?),
            ModuleKind::Rewards => AnyModule::Rewards(RewardsModule::new(raw, ctx)?),
        };
        Ok(module)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pump" => Ok(ModuleKind::Pump),
            "staker" => Ok(ModuleKind::Staker),
            "rewards" => Ok(ModuleKind::Rewards),
            other => {
                let known: Vec<&str> = ModuleKind::all().iter().map(ModuleKind::as_str).collect();
                Err(AppError::Config(format!(
                    "Unknown module {:?}, expected one of: {}",
                    other,
                    known.join(", ")
                )))
            }
        }
    }
}

/// A constructed module of any kind
pub enum AnyModule {
    Pump(PumpModule),
    Staker(StakerModule),
    Rewards(RewardsModule),
}

impl AnyModule {
    pub fn kind(&self) -> ModuleKind {
        match self {
            AnyModule::Pump(m) => m.kind(),
            AnyModule::Staker(m) => m.kind(),
            AnyModule::Rewards(m) => m.kind(),
        }
    }

    pub async fn tick(&mut self) -> AppResult<TickOutcome> {
        match self {
            AnyModule::Pump(m) => m.tick().await,
            AnyModule::Staker(m) => m.tick().await,
            AnyModule::Rewards(m) => m.tick().await,
        }
    }
}
