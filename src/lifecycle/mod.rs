//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Open store → Start scheduler jobs
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast trigger → jobs drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then background jobs
//! - Shutdown lets the in-flight check cycle finish before exit

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
