//! Background job scheduling.
//!
//! Two independent periodic jobs: the check cycle on a fixed interval and a
//! daily retention cleanup. Both run at most one instance at a time and exit
//! on the shutdown signal, letting an in-flight cycle finish first.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::RetentionConfig;
use crate::lifecycle::Shutdown;
use crate::scheduler::cycle::CheckCycle;
use crate::store::CheckStore;

pub struct Scheduler {
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn the check loop and the daily cleanup loop.
    pub fn start(
        cycle: CheckCycle,
        store: Arc<dyn CheckStore>,
        check_interval: Duration,
        retention: RetentionConfig,
        shutdown: &Shutdown,
    ) -> Self {
        tracing::info!(
            interval_secs = check_interval.as_secs(),
            cleanup_hour_utc = retention.cleanup_hour_utc,
            retention_days = retention.days,
            "Scheduler starting with 2 jobs"
        );

        let handles = vec![
            tokio::spawn(run_check_loop(cycle, check_interval, shutdown.subscribe())),
            tokio::spawn(run_cleanup_loop(store, retention, shutdown.subscribe())),
        ];
        Self { handles }
    }

    /// Wait for all jobs to observe shutdown and finish.
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
        tracing::info!("Scheduler stopped");
    }
}

/// Drive check cycles on a fixed interval.
///
/// The cycle runs inline in this loop, so a slow cycle simply delays the
/// next tick rather than overlapping it. Shutdown is only observed between
/// cycles, which is what lets an in-flight cycle complete.
async fn run_check_loop(
    mut cycle: CheckCycle,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                cycle.run().await;
            }
            _ = shutdown.recv() => {
                tracing::info!("Check loop received shutdown signal, exiting");
                break;
            }
        }
    }
}

/// Prune old history once per day at the configured UTC hour.
///
/// The next run time is recomputed from `now` on every pass, so any number
/// of occurrences missed while the process was down coalesce into a single
/// catch-up run.
async fn run_cleanup_loop(
    store: Arc<dyn CheckStore>,
    retention: RetentionConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let wait = until_next_daily(Utc::now(), retention.cleanup_hour_utc);
        tokio::select! {
            _ = time::sleep(wait) => {
                run_cleanup(store.as_ref(), retention.days, false);
            }
            _ = shutdown.recv() => {
                tracing::info!("Cleanup loop received shutdown signal, exiting");
                break;
            }
        }
    }
}

/// Delete (or with `dry_run`, just count) rows older than the retention
/// period. Shared by the daily job and the `cleanup` CLI subcommand.
pub fn run_cleanup(store: &dyn CheckStore, retention_days: u32, dry_run: bool) {
    tracing::info!(retention_days, dry_run, "Starting cleanup job");
    let cutoff = Utc::now() - chrono::Duration::days(i64::from(retention_days));

    if dry_run {
        match store.count_older_than(cutoff) {
            Ok(count) => {
                tracing::info!(would_delete = count, retention_days, "Cleanup dry run complete")
            }
            Err(e) => tracing::error!(error = %e, "Cleanup dry run failed"),
        }
        return;
    }

    match store.prune_older_than(cutoff) {
        Ok(0) => tracing::info!("Cleanup complete: no old records to delete"),
        Ok(deleted) => tracing::info!(deleted, retention_days, "Cleanup complete"),
        Err(e) => tracing::error!(error = %e, "Cleanup job failed"),
    }
}

/// Time until the next daily occurrence of `hour:00:00` UTC.
fn until_next_daily(now: DateTime<Utc>, hour: u32) -> Duration {
    // Hour is range-checked at config load.
    let target_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let today_target = now.date_naive().and_time(target_time).and_utc();

    let next = if today_target > now {
        today_target
    } else {
        today_target + chrono::Duration::days(1)
    };

    (next - now).to_std().unwrap_or(Duration::ZERO)
}
