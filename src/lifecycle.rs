use crate::core::Result;
use crate::hook::{HookConfig, VersionHook};
use std::path::Path;
use tokio::time::sleep;
use tracing::{info, warn};

/// Host-side enable sequence.
///
/// Loads the config, waits for the bridge to finish its own startup, invokes
/// the engine once, and schedules exactly one delayed retry on failure. The
/// engine itself never retries; this is the only retry-over-time there is.
pub struct Lifecycle {
    config: HookConfig,
}

impl Lifecycle {
    pub fn new(config: HookConfig) -> Self {
        Self { config }
    }

    /// Build a lifecycle from the host's config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(HookConfig::load(path)?))
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Run the full enable sequence against the process-global environment.
    /// Returns the final aggregate outcome.
    pub async fn run(&self) -> bool {
        self.run_with(&VersionHook::new(self.config.clone())).await
    }

    /// Run the enable sequence with a specific engine (used by tests).
    pub async fn run_with(&self, hook: &VersionHook) -> bool {
        if !self.config.enabled {
            info!("version hook is disabled in the configuration");
            return false;
        }

        info!(
            "waiting {:?} for the bridge to finish starting",
            self.config.startup_delay()
        );
        sleep(self.config.startup_delay()).await;

        if hook.apply() {
            info!("version hook applied on the first attempt");
            return true;
        }

        warn!(
            "version hook failed, retrying once in {:?}",
            self.config.retry_delay()
        );
        sleep(self.config.retry_delay()).await;

        let retried = hook.apply();
        if retried {
            info!("version hook applied on retry");
        } else {
            warn!("version hook still failed after the retry");
        }
        retried
    }
}
