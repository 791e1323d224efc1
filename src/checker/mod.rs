//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Standard check:
//!     Probe → compare status code → up, or retry up to max_retries → down
//!
//! Two-phase check (two_phase.rs):
//!     POST submit → extract task_id → poll until SUCCESS/FAILURE/limit
//! ```
//!
//! # Design Decisions
//! - `check()` never fails: every failure mode folds into a down result
//!   carrying a descriptive error string
//! - Each attempt produces a typed outcome inspected by a bounded loop;
//!   the last observed error/code/latency wins when attempts are exhausted
//! - Retries sleep a fixed delay between attempts, not after the final one

pub mod probe;
pub mod two_phase;
pub mod types;

pub use types::{CheckResult, Status};

use std::time::Duration;

use crate::config::{CheckSettings, ServiceDescriptor, ServiceKind};
use probe::{build_client, probe};

/// Runs health checks with a bounded retry policy.
pub struct Checker {
    max_retries: u32,
    retry_delay: Duration,
}

impl Checker {
    pub fn new(settings: &CheckSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            retry_delay: Duration::from_secs(settings.retry_delay_secs),
        }
    }

    /// Check one service, folding every failure mode into a down result.
    pub async fn check(&self, service: &ServiceDescriptor) -> CheckResult {
        match &service.kind {
            ServiceKind::Standard => self.check_standard(service).await,
            ServiceKind::AsyncTwoPhase(spec) => self.check_two_phase(service, spec).await,
        }
    }

    async fn check_standard(&self, service: &ServiceDescriptor) -> CheckResult {
        let client = match build_client(service.follow_redirects) {
            Ok(client) => client,
            Err(e) => {
                return CheckResult::down(
                    &service.name,
                    None,
                    None,
                    format!("Failed to build HTTP client: {e}"),
                )
            }
        };

        let mut last_error = String::new();
        let mut last_status_code = None;
        let mut response_time_ms = None;

        for attempt in 0..self.max_retries {
            match probe(
                &client,
                service.method.clone(),
                service.url.clone(),
                service.timeout,
                service.request_body.as_ref(),
            )
            .await
            {
                Ok(response) => {
                    response_time_ms = Some(response.elapsed.as_millis() as u64);
                    last_status_code = Some(response.status);

                    if response.status == service.expected_status {
                        tracing::info!(
                            service = %service.name,
                            status = response.status,
                            elapsed_ms = response.elapsed.as_millis() as u64,
                            "Health check passed"
                        );
                        return CheckResult::up(
                            &service.name,
                            response.elapsed.as_millis() as u64,
                            response.status,
                        );
                    }

                    last_error =
                        format!("Expected {}, got {}", service.expected_status, response.status);
                    tracing::warn!(
                        service = %service.name,
                        attempt = attempt + 1,
                        error = %last_error,
                        "Health check failed"
                    );
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(
                        service = %service.name,
                        attempt = attempt + 1,
                        error = %last_error,
                        "Health check failed"
                    );
                }
            }

            if attempt + 1 < self.max_retries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        tracing::error!(
            service = %service.name,
            attempts = self.max_retries,
            "Health check failed after all attempts"
        );
        CheckResult::down(&service.name, response_time_ms, last_status_code, last_error)
    }
}
