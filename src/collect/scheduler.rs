// src/collect/scheduler.rs
//! Drives the collector: one cycle immediately at startup, then a fixed
//! interval, plus a manual refresh trigger. Cycles are serialized behind a
//! mutex; a manual refresh racing a running cycle is dropped and reported as
//! `AlreadyRunning` (the in-flight cycle's result supersedes it).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::collect::Collector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    Completed,
    AlreadyRunning,
}

#[derive(Clone)]
pub struct Scheduler {
    collector: Arc<Collector>,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl Scheduler {
    pub fn new(collector: Arc<Collector>) -> Self {
        Self {
            collector,
            gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Spawn the periodic loop. The first tick fires immediately, so the
    /// cache is populated at startup without waiting a full period. The task
    /// runs until the handle is aborted or dropped at shutdown.
    pub fn spawn(&self, period: Duration) -> JoinHandle<()> {
        let collector = self.collector.clone();
        let gate = self.gate.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let _running = gate.lock().await;
                collector.run_cycle().await;
            }
        })
    }

    /// Run one cycle now, unless one is already in flight.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        match self.gate.try_lock() {
            Ok(_running) => {
                self.collector.run_cycle().await;
                RefreshOutcome::Completed
            }
            Err(_) => {
                tracing::info!("refresh requested while a cycle is running, dropping");
                RefreshOutcome::AlreadyRunning
            }
        }
    }
}
