//! Service state tracking.
//!
//! # Data Flow
//! ```text
//! Startup: latest persisted result per service → seed tracked state
//! Each cycle: new results → compare against tracked state → transitions
//! ```
//!
//! # Design Decisions
//! - Transitions fire only on a change between consecutive observations,
//!   preventing alert storms during extended outages
//! - A service's first-ever observation seeds state without a transition,
//!   so cold starts never alert
//! - The tracker is an owned value passed to the cycle orchestrator, not a
//!   process-wide singleton

pub mod tracker;

pub use tracker::{StateTracker, Transition, TransitionKind};
