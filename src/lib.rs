// ============================================================================
// verspan: best-effort version-range widening for an embedded wire bridge
// ============================================================================

pub mod bridge;
pub mod core;
pub mod hook;
pub mod lifecycle;
pub mod reflect;

// Re-export main types for convenience
pub use crate::core::{HookError, Result};
pub use bridge::BridgeSlot;
pub use hook::{HookConfig, PatchContext, PatchEnv, PatchStrategy, StrategyRegistry, VersionHook};
pub use lifecycle::Lifecycle;
pub use reflect::{ConstValue, DynObject, ObjectRef, Slot, StaticType, TypeSpace, VersionCodec};
