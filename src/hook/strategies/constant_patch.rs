use crate::core::Result;
use crate::hook::{matcher, resolver, PatchContext, PatchStrategy};
use crate::reflect::{ObjectRef, Slot};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{info, warn};

/// Module paths the protocol bounds type has lived under across bridge builds.
pub const PROTOCOL_TYPE_CANDIDATES: [&str; 3] = [
    "wirebridge::network::WireProtocol",
    "wirebridge::translator::protocol::WireProtocol",
    "wirebridge_core::network::WireProtocol",
];

/// Rewrites the version-bound constants on the bridge's protocol type.
///
/// When none of the known type names is loaded, falls back to scanning every
/// object reachable from the live bridge handle for numeric fields whose names
/// read like version bounds.
pub struct ConstantPatchStrategy;

impl PatchStrategy for ConstantPatchStrategy {
    fn name(&self) -> &'static str {
        "constant-patch"
    }

    fn attempt(&self, ctx: &PatchContext<'_>) -> Result<bool> {
        match resolver::resolve_type(ctx.types, &PROTOCOL_TYPE_CANDIDATES)? {
            Some((name, ty)) => {
                if ctx.config.debug {
                    info!("found protocol type '{}'", name);
                }
                matcher::patch_bounds(
                    &ty,
                    ctx.config.min_version,
                    ctx.config.max_version,
                    ctx.config.debug,
                )
            }
            None => {
                warn!("no known protocol type is loaded, scanning the live instance instead");
                scan_instance_fields(ctx)
            }
        }
    }
}

/// Breadth-first walk over the bridge's object graph, widening any numeric
/// field that classifies as a bound. Instance fields carry no immutability
/// guard, so a plain write suffices. Cycle-safe via a visited set.
fn scan_instance_fields(ctx: &PatchContext<'_>) -> Result<bool> {
    let mut changed = false;
    let mut visited: HashSet<usize> = HashSet::new();
    let mut queue: VecDeque<ObjectRef> = VecDeque::new();
    queue.push_back(Arc::clone(&ctx.bridge));

    while let Some(object) = queue.pop_front() {
        if !visited.insert(Arc::as_ptr(&object) as usize) {
            continue;
        }

        for name in object.field_names()? {
            match object.field(&name)? {
                Some(Slot::Int(current)) => {
                    if matcher::is_lower_bound_name(&name) && current > ctx.config.min_version {
                        object.set_field(&name, Slot::Int(ctx.config.min_version))?;
                        if ctx.config.debug {
                            info!(
                                "'{}.{}' lowered from {} to {}",
                                object.type_name(),
                                name,
                                current,
                                ctx.config.min_version
                            );
                        }
                        changed = true;
                    } else if let Some(max) = ctx.config.max_version {
                        if matcher::is_upper_bound_name(&name) && current < max {
                            object.set_field(&name, Slot::Int(max))?;
                            if ctx.config.debug {
                                info!(
                                    "'{}.{}' raised from {} to {}",
                                    object.type_name(),
                                    name,
                                    current,
                                    max
                                );
                            }
                            changed = true;
                        }
                    }
                }
                Some(Slot::Object(child)) => queue.push_back(child),
                _ => {}
            }
        }
    }

    if !changed {
        warn!("instance scan found no version-bound field to widen");
    }
    Ok(changed)
}
