use crate::core::Result;
use crate::hook::{resolver, PatchContext, PatchStrategy};
use crate::reflect::Slot;
use tracing::{info, warn};

const SESSION_MANAGER_PATHS: [&str; 2] = ["session_manager", "connection_manager"];

/// Locates the session manager and reports what it finds.
///
/// Discovery only: the manager's version-acceptance check is compiled code,
/// which cannot be rewritten from here, so this strategy never counts as a
/// success.
pub struct SessionManagerStrategy;

impl PatchStrategy for SessionManagerStrategy {
    fn name(&self) -> &'static str {
        "session-manager"
    }

    fn attempt(&self, ctx: &PatchContext<'_>) -> Result<bool> {
        match resolver::resolve_slot(&ctx.bridge, &SESSION_MANAGER_PATHS)? {
            Some((path, Slot::Object(manager))) => {
                if ctx.config.debug {
                    info!(
                        "found session manager '{}' at '{}'",
                        manager.type_name(),
                        path
                    );
                }
            }
            Some((path, other)) => {
                if ctx.config.debug {
                    info!("'{}' resolved but is not an object ({})", path, other.kind());
                }
            }
            None => warn!(
                "no session manager found on '{}'",
                ctx.bridge.type_name()
            ),
        }
        Ok(false)
    }
}
