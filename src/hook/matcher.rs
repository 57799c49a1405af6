use super::mutator;
use crate::core::Result;
use crate::reflect::StaticType;
use tracing::{info, warn};

/// Constant names observed across bridge builds, bucketed by role.
pub const LOWER_BOUND_NAMES: [&str; 2] = ["MINIMUM_PROTOCOL_VERSION", "MIN_PROTOCOL_VERSION"];
pub const UPPER_BOUND_NAMES: [&str; 2] = ["MAXIMUM_PROTOCOL_VERSION", "MAX_PROTOCOL_VERSION"];

const LOWER_TOKENS: [&str; 3] = ["MIN", "MINIMUM", "LOWEST"];
const UPPER_TOKENS: [&str; 3] = ["MAX", "MAXIMUM", "HIGHEST"];
const SUBJECT_TOKENS: [&str; 4] = ["VERSION", "PROTOCOL", "PROTO", "VER"];

/// Widen the version bounds declared on a resolved type.
///
/// Two passes. The exact-name pass writes the configured bounds into every
/// known constant name that exists on the type. The heuristic pass then runs
/// regardless, to catch renamed fields: every numeric constant whose name reads
/// like a bound is widened, and only widened. A lower bound is never raised and
/// a ceiling is never lowered.
///
/// Returns true when at least one member changed.
pub fn patch_bounds(
    ty: &StaticType,
    min_version: i64,
    max_version: Option<i64>,
    debug: bool,
) -> Result<bool> {
    let mut changed = false;

    for name in LOWER_BOUND_NAMES {
        if ty.lookup(name)?.is_some() {
            changed = mutator::write_verified(ty, name, min_version, debug)? || changed;
        }
    }
    if let Some(max) = max_version {
        for name in UPPER_BOUND_NAMES {
            if ty.lookup(name)?.is_some() {
                changed = mutator::write_verified(ty, name, max, debug)? || changed;
            }
        }
    }

    for name in ty.constant_names()? {
        let constant = match ty.lookup(&name)? {
            Some(constant) => constant,
            None => continue,
        };
        let current = match constant.value().as_int() {
            Some(value) => value,
            None => continue,
        };

        if is_lower_bound_name(&name) && current > min_version {
            if debug {
                info!("'{}' looks like a lower bound (currently {})", name, current);
            }
            changed = mutator::write_verified(ty, &name, min_version, debug)? || changed;
        } else if let Some(max) = max_version {
            if is_upper_bound_name(&name) && current < max {
                if debug {
                    info!("'{}' looks like a ceiling (currently {})", name, current);
                }
                changed = mutator::write_verified(ty, &name, max, debug)? || changed;
            }
        }
    }

    if !changed {
        warn!("no version bound on '{}' could be changed", ty.name());
    }
    Ok(changed)
}

fn has_token(name: &str, tokens: &[&str]) -> bool {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|segment| tokens.iter().any(|token| segment.eq_ignore_ascii_case(token)))
}

/// A lower-bound name carries a bound token and a subject token, so unrelated
/// minimums (say, a compression threshold) stay out of reach.
pub fn is_lower_bound_name(name: &str) -> bool {
    has_token(name, &LOWER_TOKENS) && has_token(name, &SUBJECT_TOKENS)
}

pub fn is_upper_bound_name(name: &str) -> bool {
    has_token(name, &UPPER_TOKENS) && has_token(name, &SUBJECT_TOKENS)
}
