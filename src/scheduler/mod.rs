//! Scheduling and cycle orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! Interval tick → CheckCycle (cycle.rs)
//!     → Checker for every service (sequential, config order)
//!     → persist each result
//!     → StateTracker classification
//!     → alert dispatch for transitions
//!
//! Daily tick → retention cleanup (runner.rs)
//! ```
//!
//! # Design Decisions
//! - Cycles run inline in the scheduler task: no overlap by construction
//! - One bad cycle never kills the scheduler; errors stop at the cycle
//! - Shutdown is observed between cycles, so a running cycle drains cleanly

pub mod cycle;
pub mod runner;

pub use cycle::CheckCycle;
pub use runner::{run_cleanup, Scheduler};
