//! One full check cycle: probe, persist, classify, alert.

use std::sync::Arc;

use crate::alert::SlackAlerter;
use crate::checker::{Checker, CheckResult};
use crate::config::ResolvedConfig;
use crate::state::StateTracker;
use crate::store::CheckStore;

/// Owns everything needed to run one monitoring pass.
pub struct CheckCycle {
    services: Vec<crate::config::ServiceDescriptor>,
    checker: Checker,
    store: Arc<dyn CheckStore>,
    tracker: StateTracker,
    tracker_seeded: bool,
    alerter: SlackAlerter,
}

impl CheckCycle {
    pub fn new(config: &ResolvedConfig, store: Arc<dyn CheckStore>) -> Self {
        Self {
            services: config.services.clone(),
            checker: Checker::new(&config.checks),
            store,
            tracker: StateTracker::new(),
            tracker_seeded: false,
            alerter: SlackAlerter::new(&config.alerting),
        }
    }

    /// Run one cycle. Never fails: every error is logged and contained so
    /// the scheduler's next tick always fires.
    pub async fn run(&mut self) {
        tracing::info!("Starting health check cycle");

        // Seed once, and strictly before this cycle persists new rows:
        // transitions must be computed against pre-cycle state.
        if !self.tracker_seeded {
            match self.tracker.seed(self.store.as_ref()) {
                Ok(()) => self.tracker_seeded = true,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to seed state tracker, skipping cycle");
                    return;
                }
            }
        }

        let mut results: Vec<CheckResult> = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let result = self.checker.check(service).await;
            if let Err(e) = self.store.save(&result) {
                tracing::error!(
                    service = %result.service_name,
                    error = %e,
                    "Failed to persist check result"
                );
            }
            results.push(result);
        }

        let transitions = self.tracker.process_results(&results);
        if !transitions.is_empty() {
            let sent = self.alerter.process_transitions(&transitions).await;
            tracing::info!(alerts_sent = sent, "Dispatched transition alerts");
        }

        let up_count = results.iter().filter(|r| r.is_up()).count();
        tracing::info!(
            up = up_count,
            down = results.len() - up_count,
            transitions = transitions.len(),
            "Health check cycle complete"
        );
    }
}
