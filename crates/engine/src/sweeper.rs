//! Periodic invite-code retirement.

use std::{sync::Arc, time::Duration};

use chrono::Utc;

use crate::Engine;

pub struct Sweeper {
    engine: Arc<Engine>,
    period: Duration,
}

impl Sweeper {
    pub fn new(engine: Arc<Engine>, period: Duration) -> Self {
        Self { engine, period }
    }

    /// Sweep every `period` until the task is dropped.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await; // Skip first immediate tick
        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    /// One pass: clear codes, then drop idle event locks.
    pub async fn run_once(&self) {
        match self.engine.sweep_invite_codes(Utc::now()).await {
            Ok(report) if report.cleared > 0 || report.failed > 0 => {
                tracing::info!(
                    cleared = report.cleared,
                    failed = report.failed,
                    "invite code sweep completed"
                );
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "invite code sweep failed");
            }
        }
        let pruned = self.engine.prune_event_locks();
        if pruned > 0 {
            tracing::debug!(pruned, "idle event locks pruned");
        }
    }
}
