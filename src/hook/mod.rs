pub mod config;
pub mod extender;
pub mod matcher;
pub mod mutator;
pub mod resolver;
pub mod sessions;
pub mod strategies;

pub use config::HookConfig;

use crate::bridge::BridgeSlot;
use crate::core::Result;
use crate::reflect::{ObjectRef, TypeSpace};
use std::sync::Arc;
use tracing::{info, warn};

/// One patching approach against the live bridge.
///
/// Strategies are independent: each may fail without affecting the others, and
/// the orchestrator aggregates the outcomes with a logical OR.
pub trait PatchStrategy: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &'static str;

    /// Try to widen the accepted version range. Ok(true) when something
    /// actually changed.
    fn attempt(&self, ctx: &PatchContext<'_>) -> Result<bool>;
}

/// Everything a strategy may probe: the live bridge handle, the loaded types,
/// and the configured bounds.
pub struct PatchContext<'a> {
    pub bridge: ObjectRef,
    pub types: &'a TypeSpace,
    pub config: &'a HookConfig,
}

/// Ordered collection of patch strategies.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn PatchStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn register(&mut self, strategy: Box<dyn PatchStrategy>) {
        self.strategies.push(strategy);
    }

    /// Registry with the built-in strategies in their fixed order.
    pub fn with_default_strategies() -> Self {
        use strategies::*;

        let mut registry = Self::new();
        registry.register(Box::new(ConnectionHandlerStrategy));
        registry.register(Box::new(ConstantPatchStrategy));
        registry.register(Box::new(SessionManagerStrategy));
        registry
    }

    pub fn list_strategies(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}

/// Links the engine to a concrete bridge handle and type space.
pub struct PatchEnv {
    pub types: Arc<TypeSpace>,
    pub bridge: Arc<BridgeSlot>,
}

impl PatchEnv {
    /// The process-global environment the host shim runs against.
    pub fn global() -> Self {
        Self {
            types: Arc::clone(TypeSpace::global()),
            bridge: Arc::clone(BridgeSlot::global()),
        }
    }

    /// A private environment, so tests don't interfere with each other.
    pub fn isolated() -> Self {
        Self {
            types: Arc::new(TypeSpace::new()),
            bridge: Arc::new(BridgeSlot::new()),
        }
    }
}

/// The patching engine.
///
/// Stateless apart from the configured bounds; `apply` is safe to call
/// repeatedly. Mutation happens without locks on the bridge side, which is
/// acceptable only in the startup window before the bridge carries real
/// traffic; the lifecycle is responsible for invoking it there.
pub struct VersionHook {
    config: HookConfig,
    env: PatchEnv,
    strategies: StrategyRegistry,
}

impl VersionHook {
    /// Engine over the process-global bridge handle and type space.
    pub fn new(config: HookConfig) -> Self {
        Self::with_env(config, PatchEnv::global())
    }

    /// Engine over an explicit environment (used by tests).
    pub fn with_env(config: HookConfig, env: PatchEnv) -> Self {
        Self {
            config,
            env,
            strategies: StrategyRegistry::with_default_strategies(),
        }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Run every strategy in order and OR the outcomes.
    ///
    /// Partial failure is the normal case against an uncontrolled third party:
    /// a strategy failing, or erroring, never stops the ones after it. Returns
    /// false without touching anything when the bridge handle is absent.
    pub fn apply(&self) -> bool {
        let bridge = match self.env.bridge.instance() {
            Ok(Some(bridge)) => bridge,
            Ok(None) => {
                warn!("bridge instance is not available, is the bridge loaded?");
                return false;
            }
            Err(err) => {
                warn!("could not read the bridge handle: {}", err);
                return false;
            }
        };

        if self.config.debug {
            info!(
                "applying version hook (min {}, max {})",
                self.config.min_version,
                self.config
                    .max_version
                    .map_or("unlimited".to_string(), |v| v.to_string())
            );
        }

        let ctx = PatchContext {
            bridge,
            types: self.env.types.as_ref(),
            config: &self.config,
        };

        let mut patched = false;
        for strategy in &self.strategies.strategies {
            let outcome = match strategy.attempt(&ctx) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!("strategy '{}' failed: {}", strategy.name(), err);
                    false
                }
            };
            patched = outcome || patched;
        }

        if patched {
            info!("version hook applied");
        } else {
            warn!("version hook made no changes");
        }
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_order() {
        let registry = StrategyRegistry::with_default_strategies();
        assert_eq!(
            registry.list_strategies(),
            vec!["connection-handler", "constant-patch", "session-manager"]
        );
    }

    #[test]
    fn test_absent_bridge_short_circuits() {
        let hook = VersionHook::with_env(HookConfig::new(400), PatchEnv::isolated());
        assert!(!hook.apply());
    }
}
