//! statuswatch: health-check monitor with state-transition alerting.
//!
//! # Architecture Overview
//!
//! ```text
//!   Scheduler (interval + daily cron)
//!       │
//!       ▼
//!   CheckCycle ──▶ Checker ──▶ Probe(s) ──▶ monitored services
//!       │              │
//!       │              └─ two-phase: submit + poll
//!       ▼
//!   CheckStore (history) ──▶ StateTracker ──▶ transitions ──▶ Alerter ──▶ webhook
//! ```

// Core subsystems
pub mod checker;
pub mod config;
pub mod state;
pub mod store;

// Outbound
pub mod alert;

// Orchestration and cross-cutting concerns
pub mod lifecycle;
pub mod scheduler;

pub use alert::SlackAlerter;
pub use checker::{CheckResult, Checker, Status};
pub use config::{load_config, ResolvedConfig, ServiceDescriptor};
pub use lifecycle::Shutdown;
pub use scheduler::{CheckCycle, Scheduler};
pub use state::{StateTracker, Transition, TransitionKind};
pub use store::{CheckStore, FileStore, MemoryStore};
