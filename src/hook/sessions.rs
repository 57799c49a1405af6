use super::config::HookConfig;
use super::{extender, resolver};
use crate::core::Result;
use crate::reflect::{DynObject, ObjectRef, Slot, TypeSpace};
use tracing::{debug, info, warn};

/// Field paths where bridges keep their live session directory.
pub const SESSION_DIRECTORY_PATHS: [&str; 4] = [
    "session_manager.sessions",
    "session_manager.active_sessions",
    "sessions",
    "active_sessions",
];

/// Field paths where a session keeps its private registry copy.
pub const SESSION_REGISTRY_PATHS: [&str; 4] = [
    "codec_registry",
    "codecs",
    "supported_codecs",
    "protocol.codecs",
];

/// Re-extend the private registry of every already-constructed session.
///
/// A session built before the global registry was widened captured the narrow
/// registry at construction time and is not reached by the global patch, so
/// each one is patched in place. A session whose internals match no known
/// shape is skipped; the ones after it are still patched.
pub fn patch_sessions(bridge: &DynObject, config: &HookConfig, types: &TypeSpace) -> Result<bool> {
    let directory = match resolver::resolve_slot(bridge, &SESSION_DIRECTORY_PATHS)? {
        Some((path, Slot::SessionList(list))) => {
            if config.debug {
                info!("found session directory at '{}'", path);
            }
            list
        }
        Some((path, other)) => {
            warn!("'{}' is not a session directory ({})", path, other.kind());
            return Ok(false);
        }
        None => {
            warn!("no session directory found on '{}'", bridge.type_name());
            return Ok(false);
        }
    };

    let sessions: Vec<ObjectRef> = directory.read()?.iter().cloned().collect();
    if sessions.is_empty() {
        if config.debug {
            info!("session directory is empty, nothing to patch");
        }
        return Ok(false);
    }

    let mut patched = false;
    for session in &sessions {
        match patch_one(session, config, types) {
            Ok(done) => patched = done || patched,
            Err(err) => warn!(
                "session '{}' could not be patched: {}",
                session.type_name(),
                err
            ),
        }
    }
    Ok(patched)
}

fn patch_one(session: &ObjectRef, config: &HookConfig, types: &TypeSpace) -> Result<bool> {
    match resolver::resolve_slot(session, &SESSION_REGISTRY_PATHS)? {
        Some((path, slot)) => {
            let location = format!("{}.{}", session.type_name(), path);
            extender::extend_registry(&slot, &location, config, types)
        }
        None => {
            debug!(
                "session '{}' has no recognizable registry, skipping",
                session.type_name()
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{CodecRef, SessionListRef, VersionCodec, VersionMapRef};
    use std::collections::BTreeMap;
    use std::sync::{Arc, RwLock};

    struct TestCodec(i64);

    impl VersionCodec for TestCodec {
        fn version(&self) -> i64 {
            self.0
        }

        fn type_name(&self) -> &str {
            "test::Codec"
        }
    }

    fn session_with_map(map: &VersionMapRef) -> ObjectRef {
        DynObject::new("test::Session")
            .with_field("codec_registry", Slot::VersionMap(Arc::clone(map)))
            .into_ref()
    }

    fn map_with_version(version: i64) -> VersionMapRef {
        let codec: CodecRef = Arc::new(TestCodec(version));
        Arc::new(RwLock::new(BTreeMap::from([(version, codec)])))
    }

    #[test]
    fn test_sessions_are_patched_individually() {
        let first = map_with_version(700);
        let second = map_with_version(650);
        let sessions: SessionListRef = Arc::new(RwLock::new(vec![
            session_with_map(&first),
            session_with_map(&second),
        ]));
        let bridge = DynObject::new("test::Bridge")
            .with_field("sessions", Slot::SessionList(sessions));

        let config = HookConfig::new(640);
        assert!(patch_sessions(&bridge, &config, &TypeSpace::new()).unwrap());

        assert_eq!(first.read().unwrap().len(), 61);
        assert_eq!(second.read().unwrap().len(), 11);
    }

    #[test]
    fn test_unrecognized_session_does_not_abort_the_rest() {
        let map = map_with_version(700);
        let odd = DynObject::new("test::OddSession")
            .with_field("something_else", Slot::Int(1))
            .into_ref();
        let sessions: SessionListRef =
            Arc::new(RwLock::new(vec![odd, session_with_map(&map)]));
        let bridge = DynObject::new("test::Bridge")
            .with_field("sessions", Slot::SessionList(sessions));

        let config = HookConfig::new(695);
        assert!(patch_sessions(&bridge, &config, &TypeSpace::new()).unwrap());
        assert_eq!(map.read().unwrap().len(), 6);
    }

    #[test]
    fn test_missing_directory_reports_false() {
        let bridge = DynObject::new("test::Bridge");
        let config = HookConfig::new(400);
        assert!(!patch_sessions(&bridge, &config, &TypeSpace::new()).unwrap());
    }

    #[test]
    fn test_empty_directory_reports_false() {
        let sessions: SessionListRef = Arc::new(RwLock::new(Vec::new()));
        let bridge = DynObject::new("test::Bridge")
            .with_field("sessions", Slot::SessionList(sessions));

        let config = HookConfig::new(400);
        assert!(!patch_sessions(&bridge, &config, &TypeSpace::new()).unwrap());
    }
}
