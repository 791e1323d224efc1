//! Alert dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Transitions from the state tracker
//!     → build a transition-specific message (slack.rs)
//!     → POST to the configured incoming webhook
//! ```
//!
//! # Design Decisions
//! - Dispatch failures are logged and counted, never raised: a dead webhook
//!   must not break the check cycle
//! - No webhook configured degrades to log-only operation
//! - Each transition dispatches independently; one failure does not block
//!   the rest of the batch

pub mod slack;

pub use slack::SlackAlerter;
