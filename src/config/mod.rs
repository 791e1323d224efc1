//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, descriptor resolution)
//!     → ResolvedConfig (validated, immutable)
//!     → shared with the scheduler and checker at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All tunables have defaults so a minimal config is just a service list
//! - Service entries resolve into tagged descriptor variants at load time;
//!   invalid combinations (two-phase without poll settings) never reach the
//!   checker

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AlertConfig, CheckSettings, MonitorConfig, ResolvedConfig, RetentionConfig,
    ServiceDescriptor, ServiceKind, StorageConfig, TwoPhaseSpec,
};
