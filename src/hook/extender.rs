use super::config::HookConfig;
use super::resolver;
use crate::core::Result;
use crate::reflect::{CodecListRef, Slot, TypeSpace, VersionMapRef};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Conventional factory entry-point names probed on a codec's type.
pub const FACTORY_NAMES: [&str; 4] = ["for_version", "with_version", "create", "builder"];

/// Extend a registry slot so every version from the configured lower bound up
/// is structurally usable.
///
/// Entries are only ever added, never removed or replaced, so repeated runs
/// leave an already-covered registry alone. `location` is log context only.
/// Returns true when entries were added.
pub fn extend_registry(
    slot: &Slot,
    location: &str,
    config: &HookConfig,
    types: &TypeSpace,
) -> Result<bool> {
    match slot {
        Slot::VersionMap(map) => extend_map(map, location, config),
        Slot::CodecList(list) => extend_list(list, location, config, types),
        other => {
            warn!(
                "structure at '{}' is not a recognized registry shape ({})",
                location,
                other.kind()
            );
            Ok(false)
        }
    }
}

/// Map-shaped registry: alias every missing version below the highest entry to
/// that entry's codec. Several versions sharing one codec instance is cheap and
/// good enough for a translator that treats them alike.
fn extend_map(map: &VersionMapRef, location: &str, config: &HookConfig) -> Result<bool> {
    let mut entries = map.write()?;

    let (highest, template) = match entries.iter().next_back() {
        Some((&version, codec)) => (version, Arc::clone(codec)),
        None => {
            warn!("registry at '{}' is empty, nothing to derive from", location);
            return Ok(false);
        }
    };

    let mut added = 0usize;
    for version in config.min_version..highest {
        if !entries.contains_key(&version) {
            entries.insert(version, Arc::clone(&template));
            added += 1;
        }
    }

    if added > 0 {
        info!(
            "registry at '{}' gained {} aliased entries down to version {}",
            location, added, config.min_version
        );
    } else if config.debug {
        info!(
            "registry at '{}' already covers {}..{}",
            location, config.min_version, highest
        );
    }
    Ok(added > 0)
}

/// List-shaped registry: synthesize a codec per missing version through a
/// factory discovered on the element type. This path has no authoritative
/// highest version to stop at, hence the configured scan ceiling.
fn extend_list(
    list: &CodecListRef,
    location: &str,
    config: &HookConfig,
    types: &TypeSpace,
) -> Result<bool> {
    let factory = {
        let entries = list.read()?;
        let first = match entries.first() {
            Some(codec) => Arc::clone(codec),
            None => {
                warn!(
                    "registry at '{}' is empty, no element type to probe for a factory",
                    location
                );
                return Ok(false);
            }
        };
        let element_type = match types.resolve(first.type_name())? {
            Some(ty) => ty,
            None => {
                warn!(
                    "codec type '{}' is not loaded, cannot synthesize entries at '{}'",
                    first.type_name(),
                    location
                );
                return Ok(false);
            }
        };
        match resolver::resolve_factory(&element_type, &FACTORY_NAMES)? {
            Some((name, factory)) => {
                if config.debug {
                    info!(
                        "using factory entry point '{}' on '{}'",
                        name,
                        element_type.name()
                    );
                }
                factory
            }
            None => {
                warn!(
                    "no factory entry point on '{}', cannot extend '{}'",
                    element_type.name(),
                    location
                );
                return Ok(false);
            }
        }
    };

    let mut entries = list.write()?;
    let present: HashSet<i64> = entries.iter().map(|codec| codec.version()).collect();

    let mut added = 0usize;
    for version in config.min_version..config.scan_ceiling {
        if !present.contains(&version) {
            entries.push(factory(version));
            added += 1;
        }
    }

    if added > 0 {
        info!(
            "registry at '{}' gained {} synthesized entries in {}..{}",
            location, added, config.min_version, config.scan_ceiling
        );
    } else if config.debug {
        info!(
            "registry at '{}' already covers {}..{}",
            location, config.min_version, config.scan_ceiling
        );
    }
    Ok(added > 0)
}
