//! Configuration validation and resolution.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check uniqueness of service names
//! - Validate value ranges (timeouts > 0, valid URLs and methods)
//! - Resolve raw entries into strongly-typed [`ServiceDescriptor`]s
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Two-phase services must carry their poll config and a request body;
//!   the checker never falls back to defaults at call time

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Method;
use thiserror::Error;
use url::Url;

use crate::config::schema::{
    CheckType, MonitorConfig, ServiceConfig, ServiceDescriptor, ServiceKind, TwoPhaseSpec,
};

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no services configured")]
    NoServices,

    #[error("duplicate service name: {0}")]
    DuplicateServiceName(String),

    #[error("service {service}: invalid url {url}: {reason}")]
    InvalidUrl {
        service: String,
        url: String,
        reason: String,
    },

    #[error("service {service}: invalid HTTP method {method}")]
    InvalidMethod { service: String, method: String },

    #[error("service {service}: timeout_secs must be greater than zero")]
    ZeroTimeout { service: String },

    #[error("service {service}: async_two_phase check requires async_verification settings")]
    MissingAsyncVerification { service: String },

    #[error("service {service}: async_two_phase check requires a request_body")]
    MissingRequestBody { service: String },

    #[error("service {service}: invalid async_verification.base_url {url}: {reason}")]
    InvalidPollBaseUrl {
        service: String,
        url: String,
        reason: String,
    },

    #[error("service {service}: max_poll_attempts must be greater than zero")]
    ZeroPollAttempts { service: String },

    #[error("checks.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("checks.max_retries must be greater than zero")]
    ZeroRetries,

    #[error("retention.days must be greater than zero")]
    ZeroRetentionDays,

    #[error("retention.cleanup_hour_utc must be in 0..=23, got {0}")]
    InvalidCleanupHour(u32),
}

/// Validate a raw configuration and resolve its service list.
///
/// Collects every problem before reporting, so one config edit fixes a full
/// round of feedback.
pub fn validate_config(
    config: &MonitorConfig,
) -> Result<Vec<ServiceDescriptor>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut descriptors = Vec::new();
    let mut seen_names = HashSet::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    for service in &config.services {
        if !seen_names.insert(service.name.clone()) {
            errors.push(ValidationError::DuplicateServiceName(service.name.clone()));
        }
        match resolve_service(service) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(mut service_errors) => errors.append(&mut service_errors),
        }
    }

    if config.checks.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.checks.max_retries == 0 {
        errors.push(ValidationError::ZeroRetries);
    }
    if config.retention.days == 0 {
        errors.push(ValidationError::ZeroRetentionDays);
    }
    if config.retention.cleanup_hour_utc > 23 {
        errors.push(ValidationError::InvalidCleanupHour(
            config.retention.cleanup_hour_utc,
        ));
    }

    if errors.is_empty() {
        Ok(descriptors)
    } else {
        Err(errors)
    }
}

fn resolve_service(service: &ServiceConfig) -> Result<ServiceDescriptor, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = match Url::parse(&service.url) {
        Ok(url) => Some(url),
        Err(e) => {
            errors.push(ValidationError::InvalidUrl {
                service: service.name.clone(),
                url: service.url.clone(),
                reason: e.to_string(),
            });
            None
        }
    };

    let method = match service.method.to_uppercase().parse::<Method>() {
        Ok(method) => Some(method),
        Err(_) => {
            errors.push(ValidationError::InvalidMethod {
                service: service.name.clone(),
                method: service.method.clone(),
            });
            None
        }
    };

    if service.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            service: service.name.clone(),
        });
    }

    let kind = match service.check_type {
        CheckType::Standard => Some(ServiceKind::Standard),
        CheckType::AsyncTwoPhase => {
            if service.request_body.is_none() {
                errors.push(ValidationError::MissingRequestBody {
                    service: service.name.clone(),
                });
            }
            match &service.async_verification {
                None => {
                    errors.push(ValidationError::MissingAsyncVerification {
                        service: service.name.clone(),
                    });
                    None
                }
                Some(verification) => {
                    if verification.max_poll_attempts == 0 {
                        errors.push(ValidationError::ZeroPollAttempts {
                            service: service.name.clone(),
                        });
                    }
                    match Url::parse(&verification.base_url) {
                        Ok(poll_base_url) => Some(ServiceKind::AsyncTwoPhase(TwoPhaseSpec {
                            poll_base_url,
                            max_poll_attempts: verification.max_poll_attempts,
                            poll_interval: Duration::from_secs(verification.poll_interval_secs),
                        })),
                        Err(e) => {
                            errors.push(ValidationError::InvalidPollBaseUrl {
                                service: service.name.clone(),
                                url: verification.base_url.clone(),
                                reason: e.to_string(),
                            });
                            None
                        }
                    }
                }
            }
        }
    };

    match (url, method, kind) {
        (Some(url), Some(method), Some(kind)) if errors.is_empty() => Ok(ServiceDescriptor {
            name: service.name.clone(),
            url,
            method,
            expected_status: service.expected_status,
            timeout: Duration::from_secs(service.timeout_secs),
            follow_redirects: service.follow_redirects,
            request_body: service.request_body.clone(),
            kind,
        }),
        _ => Err(errors),
    }
}
