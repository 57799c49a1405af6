use crate::core::{HookError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine and lifecycle configuration.
///
/// Mirrors the host's small config file. Every field has a default so a partial
/// (or missing) file still yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Master switch; when false the lifecycle never invokes the engine.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Required lower protocol-version bound to widen down to.
    #[serde(default = "default_min_version")]
    pub min_version: i64,

    /// Optional ceiling. Config files may use any non-positive value to
    /// disable it; `normalized` folds that sentinel into None.
    #[serde(default)]
    pub max_version: Option<i64>,

    /// Upper scan limit for list-shaped registries, which carry no
    /// authoritative "latest" version to derive a bound from.
    #[serde(default = "default_scan_ceiling")]
    pub scan_ceiling: i64,

    /// Promote per-attempt diagnostics to info level.
    #[serde(default)]
    pub debug: bool,

    /// How long the lifecycle waits for the bridge to finish its own startup.
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    /// Delay before the single retry after a failed first attempt.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_min_version() -> i64 {
    400
}

fn default_scan_ceiling() -> i64 {
    800
}

fn default_startup_delay_ms() -> u64 {
    5_000
}

fn default_retry_delay_ms() -> u64 {
    10_000
}

impl HookConfig {
    /// Create a configuration with the given lower bound and defaults for the
    /// rest.
    pub fn new(min_version: i64) -> Self {
        Self {
            enabled: default_enabled(),
            min_version,
            max_version: None,
            scan_ceiling: default_scan_ceiling(),
            debug: false,
            startup_delay_ms: default_startup_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    /// Set the upper bound (ceiling)
    pub fn max_version(mut self, version: i64) -> Self {
        self.max_version = Some(version);
        self
    }

    /// Set the list-shape scan ceiling
    pub fn scan_ceiling(mut self, ceiling: i64) -> Self {
        self.scan_ceiling = ceiling;
        self
    }

    /// Enable or disable verbose diagnostics
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable the engine as a whole
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the startup delay in milliseconds
    pub fn startup_delay_ms(mut self, millis: u64) -> Self {
        self.startup_delay_ms = millis;
        self
    }

    /// Set the retry delay in milliseconds
    pub fn retry_delay_ms(mut self, millis: u64) -> Self {
        self.retry_delay_ms = millis;
        self
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Load, normalize and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|err| HookError::ConfigError(err.to_string()))?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Fold the "no ceiling" sentinel (any non-positive max) into None.
    pub fn normalized(mut self) -> Self {
        if matches!(self.max_version, Some(version) if version <= 0) {
            self.max_version = None;
        }
        self
    }

    /// Validate bounds and delays.
    pub fn validate(&self) -> Result<()> {
        if self.min_version <= 0 {
            return Err(HookError::ConfigError(
                "min_version must be > 0".to_string(),
            ));
        }

        if let Some(max) = self.max_version {
            if max < self.min_version {
                return Err(HookError::ConfigError(
                    "max_version cannot be below min_version".to_string(),
                ));
            }
        }

        if self.scan_ceiling <= self.min_version {
            return Err(HookError::ConfigError(
                "scan_ceiling must sit above min_version".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self::new(default_min_version())
    }
}
