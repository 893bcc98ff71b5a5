//! # Pool Engine Configuration
//!
//! Centralized configuration for embedding a constant-product pool: which
//! identities own and hold the pool, which two assets it trades, and how the
//! engine logs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pool_config::{init_logging, EngineConfig};
//! use std::path::Path;
//!
//! let config = EngineConfig::load(Some(Path::new("config/pool.toml"))).unwrap();
//! init_logging(&config.logging).unwrap();
//! ```
//!
//! Values from the file are overridden by `AMM_`-prefixed environment
//! variables, with `__` separating nested keys (`AMM_LOGGING__LEVEL=debug`).

pub mod engine_config;
pub mod logging;

pub use engine_config::{EngineConfig, LoggingConfig, PoolConfig};
pub use logging::init_logging;
