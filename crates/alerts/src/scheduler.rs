//! Polling scheduler that evaluates each company on its configured interval.

use std::time::Duration;

use chrono::{Timelike, Utc};
use estoca_core::scheduling::{due_for_check, in_quiet_hours};
use estoca_db::repositories::AlertSettingsRepo;
use estoca_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::engine::AlertEngine;

/// Background service that drives alert evaluation.
///
/// Each tick lists every company's alert settings and evaluates the ones
/// that are due: `last_evaluated_at` is unset or older than the company's
/// check interval, and the current UTC hour falls outside its quiet hours.
/// Per-company failures are logged and do not stop the loop.
pub struct AlertScheduler {
    pool: DbPool,
    tick: Duration,
}

impl AlertScheduler {
    /// Create a scheduler ticking at `tick_secs` second intervals.
    pub fn new(pool: DbPool, tick_secs: u64) -> Self {
        Self {
            pool,
            tick: Duration::from_secs(tick_secs),
        }
    }

    /// Run the scheduler loop until the token is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Alert scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_due_evaluations().await {
                        tracing::error!(error = %e, "Failed to list companies for alert evaluation");
                    }
                }
            }
        }
    }

    /// Evaluate every company that is due this tick.
    async fn run_due_evaluations(&self) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let hour = now.hour() as u8;

        let mut evaluated = 0usize;
        for settings in AlertSettingsRepo::list_all(&self.pool).await? {
            if in_quiet_hours(hour, settings.quiet_hours_start, settings.quiet_hours_end) {
                continue;
            }
            if !due_for_check(settings.last_evaluated_at, settings.check_interval_minutes, now) {
                continue;
            }

            match AlertEngine::evaluate_company(&self.pool, settings.company_id).await {
                Ok(_) => evaluated += 1,
                Err(e) => {
                    // This company's cycle is skipped; its stored
                    // notifications are untouched and the next tick retries.
                    tracing::error!(
                        company_id = settings.company_id,
                        error = %e,
                        "Alert evaluation failed for company"
                    );
                }
            }
        }

        if evaluated > 0 {
            tracing::debug!(evaluated, "Alert scheduler tick complete");
        }

        Ok(())
    }
}
