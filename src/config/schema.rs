//! Configuration schema definitions.
//!
//! This module defines both the raw, serde-facing configuration structure
//! (what the TOML file deserializes into) and the resolved descriptor types
//! the rest of the system consumes. Raw types are permissive with defaults;
//! resolution and semantic checks live in `validation.rs`.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for the monitor, as read from disk.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Services to probe each cycle.
    pub services: Vec<ServiceConfig>,

    /// Check loop tunables (interval, retries).
    pub checks: CheckSettings,

    /// Alert dispatch settings.
    pub alerting: AlertConfig,

    /// Historical record retention.
    pub retention: RetentionConfig,

    /// Check-result storage settings.
    pub storage: StorageConfig,
}

/// One monitored service, raw form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique service identifier, used as the persistence key.
    pub name: String,

    /// Health check URL.
    pub url: String,

    /// HTTP method (GET, POST, ...).
    #[serde(default = "default_method")]
    pub method: String,

    /// Status code that counts as a pass.
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Follow HTTP redirects when probing.
    #[serde(default)]
    pub follow_redirects: bool,

    /// Optional JSON request body (sent for POST probes).
    #[serde(default)]
    pub request_body: Option<serde_json::Value>,

    /// Check protocol variant.
    #[serde(default)]
    pub check_type: CheckType,

    /// Poll settings, required when `check_type = "async_two_phase"`.
    #[serde(default)]
    pub async_verification: Option<AsyncVerificationConfig>,
}

/// Check protocol selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Single request, judged from the synchronous response.
    #[default]
    Standard,
    /// Submit a job, then poll for its out-of-band completion.
    AsyncTwoPhase,
}

/// Poll configuration for two-phase checks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AsyncVerificationConfig {
    /// Base URL the task id is appended to when polling.
    pub base_url: String,

    /// Maximum number of polls before giving up.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Seconds to wait before each poll.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Check loop tunables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Seconds between check cycles.
    pub interval_secs: u64,

    /// Attempts per standard check before reporting down.
    pub max_retries: u32,

    /// Seconds to sleep between attempts.
    pub retry_delay_secs: u64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            max_retries: 3,
            retry_delay_secs: 10,
        }
    }
}

/// Alert dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AlertConfig {
    /// Incoming-webhook URL. Empty disables alert dispatch (log-only).
    pub webhook_url: String,

    /// Public status page, linked from alert messages when set.
    pub status_page_url: String,
}

/// Historical record retention.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Age in days past which check records are pruned.
    pub days: u32,

    /// UTC hour of day the daily cleanup job fires.
    pub cleanup_hour_utc: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: 60,
            cleanup_hour_utc: 3,
        }
    }
}

/// Check-result storage settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSONL history file. `None` keeps history in memory only.
    pub path: Option<PathBuf>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_expected_status() -> u16 {
    200
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_poll_attempts() -> u32 {
    10
}

fn default_poll_interval_secs() -> u64 {
    1
}

/// A monitored service after validation and resolution.
///
/// All fields are parsed into their strong forms exactly once at load time;
/// the checker never re-inspects raw strings or probes optional fields.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub name: String,
    pub url: Url,
    pub method: Method,
    pub expected_status: u16,
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub request_body: Option<serde_json::Value>,
    pub kind: ServiceKind,
}

/// Resolved check protocol variant.
#[derive(Debug, Clone)]
pub enum ServiceKind {
    Standard,
    AsyncTwoPhase(TwoPhaseSpec),
}

/// Resolved poll settings for a two-phase service.
#[derive(Debug, Clone)]
pub struct TwoPhaseSpec {
    /// Base URL the task id is appended to, validated at load.
    pub poll_base_url: Url,
    pub max_poll_attempts: u32,
    pub poll_interval: Duration,
}

/// Configuration after load, parse, and semantic validation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub services: Vec<ServiceDescriptor>,
    pub checks: CheckSettings,
    pub alerting: AlertConfig,
    pub retention: RetentionConfig,
    pub storage: StorageConfig,
}
