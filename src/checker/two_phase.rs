//! Two-phase asynchronous verification.
//!
//! Some services accept a job synchronously (e.g. 202 + task id) and complete
//! it out-of-band in background workers. Judging health from the submit
//! response alone would miss failures downstream, so phase 1 submits the job
//! and phase 2 polls its task endpoint until a terminal state.
//!
//! # Design Decisions
//! - Phase 1 failures are terminal: the submit endpoint itself is unhealthy
//! - Phase 2 transport errors and unparsable bodies are swallowed and
//!   retried; only an explicit task state (or the attempt limit) is terminal
//! - A task that succeeds but returns an empty result is reported down:
//!   the infrastructure worked, the application produced nothing usable
//! - Elapsed time spans submit start to terminal judgment

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::checker::probe::{build_client, probe};
use crate::checker::types::CheckResult;
use crate::checker::Checker;
use crate::config::{ServiceDescriptor, TwoPhaseSpec};

impl Checker {
    pub(super) async fn check_two_phase(
        &self,
        service: &ServiceDescriptor,
        spec: &TwoPhaseSpec,
    ) -> CheckResult {
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

        let start = std::time::Instant::now();

        // Phase 1: submit the job.
        let response = match probe(
            &client,
            Method::POST,
            service.url.clone(),
            service.timeout,
            service.request_body.as_ref(),
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(service = %service.name, error = %e, "Phase 1 request failed");
                return CheckResult::down(&service.name, None, None, format!("Phase 1 failed: {e}"));
            }
        };

        let submit_ms = response.elapsed.as_millis() as u64;
        let submit_status = response.status;

        if submit_status != service.expected_status {
            let error = format!(
                "Phase 1 failed: expected {}, got {}",
                service.expected_status, submit_status
            );
            tracing::warn!(service = %service.name, error = %error, "Phase 1 rejected");
            return CheckResult::down(&service.name, Some(submit_ms), Some(submit_status), error);
        }

        let task_id = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|v| v.get("task_id").and_then(Value::as_str).map(str::to_owned));
        let Some(task_id) = task_id else {
            tracing::warn!(service = %service.name, "Phase 1 response carried no task_id");
            return CheckResult::down(
                &service.name,
                Some(submit_ms),
                Some(submit_status),
                "Phase 1 failed: no task_id in response",
            );
        };

        tracing::debug!(service = %service.name, task_id = %task_id, "Phase 1 accepted, polling");

        // Phase 2: poll for the task's terminal state.
        let poll_url = match Url::parse(&format!("{}{}", spec.poll_base_url, task_id)) {
            Ok(url) => url,
            Err(e) => {
                return CheckResult::down(
                    &service.name,
                    Some(submit_ms),
                    Some(submit_status),
                    format!("Phase 2: invalid poll URL: {e}"),
                )
            }
        };

        for attempt in 1..=spec.max_poll_attempts {
            tokio::time::sleep(spec.poll_interval).await;

            let response = match probe(
                &client,
                Method::GET,
                poll_url.clone(),
                service.timeout,
                None,
            )
            .await
            {
                Ok(response) if response.status == 200 => response,
                Ok(response) => {
                    tracing::debug!(
                        service = %service.name,
                        attempt,
                        status = response.status,
                        "Poll returned non-200, retrying"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::debug!(service = %service.name, attempt, error = %e, "Poll failed, retrying");
                    continue;
                }
            };

            let Ok(payload) = serde_json::from_str::<Value>(&response.body) else {
                tracing::debug!(service = %service.name, attempt, "Poll body unparsable, retrying");
                continue;
            };

            match payload.get("state").and_then(Value::as_str) {
                Some("SUCCESS") => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    if non_empty_result(payload.get("result")) {
                        tracing::info!(
                            service = %service.name,
                            elapsed_ms,
                            polls = attempt,
                            "Two-phase check passed"
                        );
                        return CheckResult::up(&service.name, elapsed_ms, submit_status);
                    }
                    return CheckResult::down(
                        &service.name,
                        Some(elapsed_ms),
                        Some(submit_status),
                        "Phase 2: task succeeded but returned empty result",
                    );
                }
                Some("FAILURE") => {
                    let reason = payload
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error");
                    return CheckResult::down(
                        &service.name,
                        Some(start.elapsed().as_millis() as u64),
                        Some(submit_status),
                        format!("Phase 2: task failed - {reason}"),
                    );
                }
                _ => {
                    // PENDING, STARTED, or anything else: keep waiting.
                    continue;
                }
            }
        }

        tracing::error!(
            service = %service.name,
            polls = spec.max_poll_attempts,
            "Two-phase check timed out waiting for task"
        );
        CheckResult::down(
            &service.name,
            Some(start.elapsed().as_millis() as u64),
            Some(submit_status),
            format!(
                "Phase 2: task processing timeout after {} polls",
                spec.max_poll_attempts
            ),
        )
    }
}

/// A usable task result: present and not an empty string/array/object.
fn non_empty_result(result: Option<&Value>) -> bool {
    match result {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}
