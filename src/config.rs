//! Centralized configuration and builder for SheafDB.
//!
//! Every tunable lives in one struct instead of env lookups spread across
//! the code. StoreConfig::from_env() covers env-driven deployments;
//! StoreBuilder covers programmatic overrides and hands the finished
//! StoreConfig to the store on open.
//!
//! Defaults lean towards throughput:
//! - growth_step = 512 KiB (file grows in coarse steps so inserts stay
//!   a plain memcpy most of the time)
//! - data_fsync = false (no fsync of the data file on growth)
//! Both can be overridden via ENV or the builder.

use std::fmt;

use crate::consts::GROWTH_STEP;

/// Top-level configuration for a document store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// File growth increment in bytes. The data file is extended in
    /// multiples of this step whenever an insert does not fit.
    /// Env: SHEAF_GROWTH_STEP (default 524288; zero is ignored)
    pub growth_step: u64,

    /// Whether to fsync the data file after every growth and flush.
    /// Env: SHEAF_DATA_FSYNC (default false; "1|true|on|yes" => true)
    pub data_fsync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            growth_step: GROWTH_STEP,
            data_fsync: false,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SHEAF_GROWTH_STEP") {
            if let Ok(n) = v.trim().parse::<u64>() {
                if n > 0 {
                    cfg.growth_step = n;
                }
            }
        }

        if let Ok(v) = std::env::var("SHEAF_DATA_FSYNC") {
            let s = v.trim().to_ascii_lowercase();
            cfg.data_fsync = s == "1" || s == "true" || s == "on" || s == "yes";
        }

        cfg
    }

    // Builder-style overrides for individual fields.

    pub fn with_growth_step(mut self, step: u64) -> Self {
        if step > 0 {
            self.growth_step = step;
        }
        self
    }

    pub fn with_data_fsync(mut self, on: bool) -> Self {
        self.data_fsync = on;
        self
    }

    /// No-op terminator so `with_*` chains read the same as StoreBuilder.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StoreConfig {{ growth_step: {}, data_fsync: {} }}",
            self.growth_step, self.data_fsync,
        )
    }
}

/// Lightweight builder that produces a StoreConfig.
/// DocStore exposes `DocStore::builder()` returning this builder.
#[derive(Clone, Debug)]
pub struct StoreBuilder {
    cfg: StoreConfig,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        // Env first; builder methods override on top.
        Self {
            cfg: StoreConfig::from_env(),
        }
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure defaults, env is not consulted.
    pub fn from_default() -> Self {
        Self {
            cfg: StoreConfig::default(),
        }
    }

    pub fn growth_step(mut self, step: u64) -> Self {
        if step > 0 {
            self.cfg.growth_step = step;
        }
        self
    }

    pub fn data_fsync(mut self, on: bool) -> Self {
        self.cfg.data_fsync = on;
        self
    }

    /// Consume the builder and yield the finished config.
    pub fn build(self) -> StoreConfig {
        self.cfg
    }
}
