//! Engine Configuration Module
//!
//! Loads pool wiring and logging settings from TOML with environment overrides.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use types::{AccountId, AssetId};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "AMM";

/// Main engine configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// Pool identities
    pub pool: PoolConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identities wired into the pool at construction
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// The only identity allowed to run `init_pool`
    pub owner: AccountId,

    /// Custody account whose balances are the pool's holdings
    pub account: AccountId,

    // When both are set the pool is initialized at startup
    pub asset_a: Option<AssetId>,
    pub asset_b: Option<AssetId>,
}

/// Logging settings consumed by [`crate::init_logging`]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `amm=debug,warn`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl PoolConfig {
    /// Asset pair to initialize with, if fully configured
    ///
    /// A half-configured pair is an error rather than silently skipping init.
    pub fn asset_pair(&self) -> Result<Option<(AssetId, AssetId)>> {
        match (self.asset_a, self.asset_b) {
            (Some(a), Some(b)) => Ok(Some((a, b))),
            (None, None) => Ok(None),
            _ => bail!("pool.asset_a and pool.asset_b must be configured together"),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading engine config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(env_source())
            .build()
            .context("Failed to build configuration")?;

        Self::finish(config)
    }

    /// Load configuration from an in-memory TOML document with environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(env_source())
            .build()
            .context("Failed to build configuration")?;

        Self::finish(config)
    }

    fn finish(config: Config) -> Result<Self> {
        let engine: EngineConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        engine.pool.asset_pair()?;
        debug!(
            "Engine config: owner={} account={} logging={}",
            engine.pool.owner, engine.pool.account, engine.logging.level
        );
        Ok(engine)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
