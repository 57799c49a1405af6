use crate::core::Result;
use crate::reflect::ObjectRef;
use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};

// Global singleton slot for the live bridge handle
lazy_static! {
    static ref GLOBAL_BRIDGE: Arc<BridgeSlot> = Arc::new(BridgeSlot::new());
}

/// Process-global slot holding the live handle of the opaque bridge component.
///
/// The host installs the handle once the bridge finishes its own startup; the
/// engine only ever reads it. An empty slot means the bridge is not loaded
/// (yet), which every caller must treat as a normal condition.
pub struct BridgeSlot {
    inner: RwLock<Option<ObjectRef>>,
}

impl BridgeSlot {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Get the global bridge slot shared across the process.
    pub fn global() -> &'static Arc<BridgeSlot> {
        &GLOBAL_BRIDGE
    }

    pub fn install(&self, bridge: ObjectRef) -> Result<()> {
        *self.inner.write()? = Some(bridge);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        *self.inner.write()? = None;
        Ok(())
    }

    pub fn instance(&self) -> Result<Option<ObjectRef>> {
        Ok(self.inner.read()?.clone())
    }
}

impl Default for BridgeSlot {
    fn default() -> Self {
        Self::new()
    }
}
