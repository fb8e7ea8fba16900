use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::modules::{ModuleKind, TickOutcome};

/// Bookkeeping for one scheduled module
#[derive(Debug, Clone)]
pub struct ModuleStatus {
    pub kind: ModuleKind,
    pub interval: Duration,
    pub last_run: Option<DateTime<Utc>>,
    pub last_outcome: Option<TickOutcome>,
    pub runs: u64,
    pub failures: u64,
}

impl ModuleStatus {
    pub fn new(kind: ModuleKind, interval: Duration) -> Self {
        Self {
            kind,
            interval,
            last_run: None,
            last_outcome: None,
            runs: 0,
            failures: 0,
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} every {:?}, {} run(s), {} failure(s)",
            self.kind, self.interval, self.runs, self.failures
        )?;
        match (&self.last_run, &self.last_outcome) {
            (Some(at), Some(outcome)) => write!(f, ", last run {} ({})", at.to_rfc3339(), outcome),
            _ => write!(f, ", never ran"),
        }
    }
}

/// Shared table of module statuses, written by the module tasks
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<RwLock<HashMap<String, ModuleStatus>>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    pub fn insert(&self, name: &str, status: ModuleStatus) {
        self.inner.write().insert(name.to_string(), status);
    }

    /// Store the outcome of a tick that started at `started_at`
    pub fn record(&self, name: &str, started_at: DateTime<Utc>, outcome: TickOutcome) {
        let mut table = self.inner.write();
        if let Some(status) = table.get_mut(name) {
            status.last_run = Some(started_at);
            status.runs += 1;
            if !outcome.success() {
                status.failures += 1;
            }
            status.last_outcome = Some(outcome);
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<ModuleStatus> {
        self.inner.read().get(name).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, ModuleStatus> {
        self.inner.read().clone()
    }
}
