use crate::core::Result;
use crate::reflect::{ConstValue, StaticType};
use tracing::{info, warn};

/// Overwrite a guarded numeric constant and confirm the write stuck.
///
/// The immutability guard is lifted when the runtime allows it; when it
/// refuses, the write is attempted anyway and the read-back decides the
/// outcome. Some runtimes ignore such writes silently, so a structurally
/// successful write is not trusted without the re-read.
pub fn write_verified(ty: &StaticType, member: &str, value: i64, debug: bool) -> Result<bool> {
    let constant = match ty.lookup(member)? {
        Some(constant) => constant,
        None => {
            warn!("member '{}' disappeared from '{}'", member, ty.name());
            return Ok(false);
        }
    };
    let previous = constant.value().clone();

    if constant.is_frozen() && !ty.unfreeze(member)? && debug {
        info!(
            "could not lift write protection on '{}.{}', writing anyway",
            ty.name(),
            member
        );
    }

    ty.write(member, ConstValue::Int(value))?;

    let confirmed = ty.read(member)? == Some(ConstValue::Int(value));
    if confirmed {
        if debug {
            info!(
                "'{}.{}' changed from {:?} to {}",
                ty.name(),
                member,
                previous,
                value
            );
        }
    } else {
        warn!(
            "write to '{}.{}' was not applied (still {:?})",
            ty.name(),
            member,
            previous
        );
    }
    Ok(confirmed)
}
