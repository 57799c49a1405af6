use crate::core::Result;
use crate::hook::{extender, sessions, PatchContext, PatchStrategy};
use crate::reflect::Slot;
use tracing::{info, warn};

/// Field paths where bridges have kept the global codec registry.
pub const REGISTRY_PATHS: [&str; 5] = [
    "codec_registry",
    "network.codec_registry",
    "network.codecs",
    "connection_handler.codecs",
    "codecs",
];

/// Widens the bridge's global codec registry, then re-patches live sessions.
///
/// The registry determines which versions are structurally usable for every
/// connection accepted after the patch; sessions accepted before it carry
/// their own registry copy and are handled by the session pass.
pub struct ConnectionHandlerStrategy;

impl PatchStrategy for ConnectionHandlerStrategy {
    fn name(&self) -> &'static str {
        "connection-handler"
    }

    fn attempt(&self, ctx: &PatchContext<'_>) -> Result<bool> {
        let mut extended = false;

        // Registry-shaped slots only; a path that resolves to something else
        // falls through, and so does a registry that cannot be extended.
        for path in REGISTRY_PATHS {
            let slot = match ctx.bridge.field_at_path(path)? {
                Some(slot @ (Slot::VersionMap(_) | Slot::CodecList(_))) => slot,
                _ => continue,
            };
            if ctx.config.debug {
                info!("found codec registry at '{}'", path);
            }
            extended = extender::extend_registry(&slot, path, ctx.config, ctx.types)?;
            if extended {
                break;
            }
        }
        if !extended {
            warn!(
                "no extensible codec registry found on '{}'",
                ctx.bridge.type_name()
            );
        }

        let sessions_patched = match sessions::patch_sessions(&ctx.bridge, ctx.config, ctx.types) {
            Ok(patched) => patched,
            Err(err) => {
                warn!("session pass failed: {}", err);
                false
            }
        };

        Ok(extended || sessions_patched)
    }
}
