// Module scheduler - drives every registered module on its own timer
//
// - One tokio task per module, each with an independent interval
// - A module's ticks never overlap: the tick is awaited inside its own loop
//   and ticks missed while a slow tick runs are skipped, not queued
// - Errors and panics inside a tick are caught here, logged and recorded;
//   the module keeps its timer and the other modules never notice
// - stop() lets in-flight ticks finish before returning

pub mod status;

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    modules::{AnyModule, Context, ModuleKind, RawModuleConfig, TickOutcome, TickStatus},
};
pub use status::{ModuleStatus, StatusBoard};

/// A module waiting to be registered: which routine, its raw settings and
/// how often it should tick
#[derive(Debug, Clone)]
pub struct ModuleDefinition {
    pub name: String,
    pub kind: ModuleKind,
    pub raw: RawModuleConfig,
    pub interval: Duration,
}

impl ModuleDefinition {
    pub fn new(kind: ModuleKind, raw: RawModuleConfig, interval: Duration) -> Self {
        Self {
            name: kind.as_str().to_string(),
            kind,
            raw,
            interval,
        }
    }

    #[cfg(test)]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

struct Scheduled {
    name: String,
    module: AnyModule,
    interval: Duration,
}

pub struct ModuleScheduler {
    ctx: Arc<Context>,
    pending: Vec<Scheduled>,
    board: StatusBoard,
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
    running: bool,
}

impl ModuleScheduler {
    pub fn new(ctx: Arc<Context>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            ctx,
            pending: Vec::new(),
            board: StatusBoard::new(),
            shutdown,
            handles: Vec::new(),
            running: false,
        }
    }

    /// Validate and add a module. An invalid module is never scheduled.
    /// While the scheduler is running the module starts ticking right away.
    pub fn register(&mut self, definition: ModuleDefinition) -> AppResult<()> {
        let ModuleDefinition {
            name,
            kind,
            raw,
            interval,
        } = definition;

        if let Err(e) = kind.verify_config(&raw) {
            error!("❌ Module {} rejected: {}", name, e);
            return Err(e);
        }

        if interval.is_zero() {
            return Err(AppError::Config(format!(
                "Module {} needs a non-zero interval",
                name
            )));
        }

        if self.board.contains(&name) {
            return Err(AppError::Config(format!(
                "Module {} is already registered",
                name
            )));
        }

        let module = kind.build(&raw, &self.ctx)?;

        self.board.insert(&name, ModuleStatus::new(kind, interval));
        info!("✅ Module {} registered ({} every {:?})", name, kind, interval);

        self.pending.push(Scheduled {
            name,
            module,
            interval,
        });

        if self.running {
            self.spawn_pending();
        }
        Ok(())
    }

    /// Start a timer task for every registered module
    pub fn start(&mut self) {
        if !self.running {
            self.shutdown.send_replace(false);
            self.running = true;
        }

        self.spawn_pending();
        info!("🚀 Scheduler running {} module(s)", self.handles.len());
    }

    fn spawn_pending(&mut self) {
        for Scheduled {
            name,
            module,
            interval,
        } in self.pending.drain(..)
        {
            let shutdown = self.shutdown.subscribe();
            let board = self.board.clone();
            self.handles
                .push(tokio::spawn(run_module(name, module, interval, shutdown, board)));
        }
    }

    /// Cancel all timers and wait for in-flight ticks to finish
    pub async fn stop(&mut self) {
        self.running = false;
        self.shutdown.send_replace(true);

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Module task ended abnormally: {}", e);
            }
        }

        let mut statuses: Vec<_> = self.statuses().into_iter().collect();
        statuses.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, status) in statuses {
            info!("📊 Module {}: {}", name, status);
        }

        info!("✓ Scheduler stopped");
    }

    #[cfg(test)]
    pub fn status(&self, name: &str) -> Option<ModuleStatus> {
        self.board.get(name)
    }

    pub fn statuses(&self) -> HashMap<String, ModuleStatus> {
        self.board.snapshot()
    }

    pub fn module_count(&self) -> usize {
        self.board.snapshot().len()
    }
}

async fn run_module(
    name: String,
    mut module: AnyModule,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    board: StatusBoard,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("⏰ Module {} ({}) ticking every {:?}", name, module.kind(), period);

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let started_at = Utc::now();
        let outcome = run_tick(&name, &mut module).await;
        board.record(&name, started_at, outcome);
    }

    info!("Module {} stopped", name);
}

/// Run one tick, turning errors and panics into a failed outcome
async fn run_tick(name: &str, module: &mut AnyModule) -> TickOutcome {
    let span = info_span!("tick", module = %name, run_id = %Uuid::new_v4());

    let result = AssertUnwindSafe(module.tick())
        .catch_unwind()
        .instrument(span.clone())
        .await;

    span.in_scope(|| match result {
        Ok(Ok(outcome)) => {
            match outcome.status {
                TickStatus::NotReady => info!("⏳ Module {} not ready: {}", name, outcome.detail),
                _ => info!("✓ Module {}: {}", name, outcome),
            }
            outcome
        }
        Ok(Err(e)) => {
            error!("❌ Module {} tick failed: {}", name, e);
            TickOutcome::failed(e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("❌ Module {} tick panicked: {}", name, message);
            TickOutcome::failed(format!("panicked: {}", message))
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
