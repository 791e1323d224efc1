//! Single-request HTTP probe.
//!
//! # Responsibilities
//! - Perform exactly one request/response exchange
//! - Classify transport failures (timeout, connect, other)
//! - Measure elapsed time for the exchange
//!
//! # Design Decisions
//! - No retry logic here; bounded retries belong to the checker
//! - The response body is read eagerly so two-phase checks can inspect it

use std::time::{Duration, Instant};

use reqwest::{redirect, Client, Method};
use thiserror::Error;
use url::Url;

/// Transport-level probe failure.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}

/// Response from a completed probe exchange.
#[derive(Debug)]
pub struct ProbeResponse {
    pub status: u16,
    pub elapsed: Duration,
    pub body: String,
}

/// Build a probe client with the service's redirect policy.
pub fn build_client(follow_redirects: bool) -> Result<Client, ProbeError> {
    let policy = if follow_redirects {
        redirect::Policy::limited(10)
    } else {
        redirect::Policy::none()
    };

    Client::builder()
        .redirect(policy)
        .build()
        .map_err(|e| ProbeError::Transport(e.to_string()))
}

/// Perform one HTTP exchange and return status, latency, and body.
///
/// A JSON body is attached only for POST requests, matching the probe
/// contract for submit-style services.
pub async fn probe(
    client: &Client,
    method: Method,
    url: Url,
    timeout: Duration,
    body: Option<&serde_json::Value>,
) -> Result<ProbeResponse, ProbeError> {
    let start = Instant::now();

    let mut request = client.request(method.clone(), url).timeout(timeout);
    if method == Method::POST {
        if let Some(body) = body {
            request = request.json(body);
        }
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    Ok(ProbeResponse {
        status,
        elapsed: start.elapsed(),
        body,
    })
}
