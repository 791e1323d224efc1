//! Slack webhook alerter.
//!
//! Builds Block Kit messages for down/recovery transitions and posts them to
//! an incoming webhook.

use chrono::Utc;
use serde_json::{json, Value};

use crate::checker::CheckResult;
use crate::config::AlertConfig;
use crate::state::{Transition, TransitionKind};

const ERROR_PREVIEW_LEN: usize = 100;

pub struct SlackAlerter {
    webhook_url: String,
    status_page_url: String,
    client: reqwest::Client,
}

impl SlackAlerter {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            status_page_url: config.status_page_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Send an alert for one transition. Returns whether dispatch succeeded.
    pub async fn notify_transition(&self, result: &CheckResult, kind: TransitionKind) -> bool {
        if self.webhook_url.is_empty() {
            tracing::warn!(
                service = %result.service_name,
                transition = %kind,
                "Alert webhook not configured, skipping alert"
            );
            return false;
        }

        let (text, blocks) = match kind {
            TransitionKind::WentDown => (
                format!(":red_circle: Service Down: {}", result.service_name),
                self.build_down_blocks(result),
            ),
            TransitionKind::Recovered => (
                format!(":large_green_circle: Service Recovered: {}", result.service_name),
                self.build_recovery_blocks(result),
            ),
        };

        let payload = json!({ "text": text, "blocks": blocks });

        match self.client.post(&self.webhook_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    service = %result.service_name,
                    transition = %kind,
                    "Alert sent"
                );
                true
            }
            Ok(response) => {
                tracing::error!(
                    service = %result.service_name,
                    status = response.status().as_u16(),
                    "Alert dispatch rejected by webhook"
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    service = %result.service_name,
                    error = %e,
                    "Alert dispatch failed"
                );
                false
            }
        }
    }

    /// Dispatch a batch of transitions, returning how many alerts were sent.
    pub async fn process_transitions(&self, transitions: &[Transition]) -> usize {
        let mut sent = 0;
        for transition in transitions {
            if self.notify_transition(&transition.result, transition.kind).await {
                sent += 1;
            }
        }
        sent
    }

    fn build_down_blocks(&self, result: &CheckResult) -> Value {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let code = result
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let error = if result.error_message.is_empty() {
            "N/A".to_string()
        } else {
            truncate(&result.error_message, ERROR_PREVIEW_LEN)
        };

        let mut blocks = vec![
            json!({
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("🔴 Service Down: {}", result.service_name),
                    "emoji": true,
                },
            }),
            json!({
                "type": "section",
                "fields": [
                    { "type": "mrkdwn", "text": "*Status:*\nDOWN" },
                    { "type": "mrkdwn", "text": format!("*Since:*\n{timestamp}") },
                    { "type": "mrkdwn", "text": format!("*HTTP Code:*\n{code}") },
                    { "type": "mrkdwn", "text": format!("*Error:*\n{error}") },
                ],
            }),
        ];
        self.push_status_page_link(&mut blocks);
        Value::Array(blocks)
    }

    fn build_recovery_blocks(&self, result: &CheckResult) -> Value {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let response_time = result
            .response_time_ms
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_else(|| "N/A".to_string());

        let mut blocks = vec![
            json!({
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("🟢 Service Recovered: {}", result.service_name),
                    "emoji": true,
                },
            }),
            json!({
                "type": "section",
                "fields": [
                    { "type": "mrkdwn", "text": "*Status:*\nUP" },
                    { "type": "mrkdwn", "text": format!("*Recovered:*\n{timestamp}") },
                    { "type": "mrkdwn", "text": format!("*Response Time:*\n{response_time}") },
                ],
            }),
        ];
        self.push_status_page_link(&mut blocks);
        Value::Array(blocks)
    }

    fn push_status_page_link(&self, blocks: &mut Vec<Value>) {
        if self.status_page_url.is_empty() {
            return;
        }
        blocks.push(json!({
            "type": "context",
            "elements": [
                { "type": "mrkdwn", "text": format!("<{}|View Status Page>", self.status_page_url) },
            ],
        }));
    }
}

/// Truncate on a char boundary; error strings can carry arbitrary payloads.
fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
