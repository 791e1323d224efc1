//! Check result value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary service health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Up,
    Down,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Up => write!(f, "up"),
            Status::Down => write!(f, "down"),
        }
    }
}

/// Outcome of one health check for one service.
///
/// Immutable once produced; persisted as history and fed to the state
/// tracker. `response_time_ms` is set whenever at least one network round
/// trip completed, even when the final judgment is down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub service_name: String,
    pub status: Status,
    pub response_time_ms: Option<u64>,
    pub status_code: Option<u16>,
    /// Empty when the service is up.
    pub error_message: String,
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn up(service_name: &str, response_time_ms: u64, status_code: u16) -> Self {
        Self {
            service_name: service_name.to_string(),
            status: Status::Up,
            response_time_ms: Some(response_time_ms),
            status_code: Some(status_code),
            error_message: String::new(),
            checked_at: Utc::now(),
        }
    }

    pub fn down(
        service_name: &str,
        response_time_ms: Option<u64>,
        status_code: Option<u16>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.to_string(),
            status: Status::Down,
            response_time_ms,
            status_code,
            error_message: error_message.into(),
            checked_at: Utc::now(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }
}
