use crate::core::Result;
use crate::reflect::{CodecFactory, DynObject, Slot, StaticType, TypeSpace};
use std::sync::Arc;
use tracing::debug;

/// Try candidates in priority order; the first one the probe resolves wins.
///
/// The candidate order encodes likelihood across dependency versions. There are
/// no retries here: a candidate either resolves now or it does not, and
/// retry-over-time belongs to the lifecycle.
pub fn resolve_first<T, F>(candidates: &[&str], mut probe: F) -> Result<Option<(String, T)>>
where
    F: FnMut(&str) -> Result<Option<T>>,
{
    for candidate in candidates {
        match probe(candidate)? {
            Some(found) => {
                debug!("candidate '{}' resolved", candidate);
                return Ok(Some(((*candidate).to_string(), found)));
            }
            None => debug!("candidate '{}' did not resolve", candidate),
        }
    }
    Ok(None)
}

/// Resolve the first loaded type among candidate fully-qualified names.
pub fn resolve_type(
    space: &TypeSpace,
    candidates: &[&str],
) -> Result<Option<(String, Arc<StaticType>)>> {
    resolve_first(candidates, |name| space.resolve(name))
}

/// Resolve the first populated slot among candidate dotted field paths.
pub fn resolve_slot(root: &DynObject, paths: &[&str]) -> Result<Option<(String, Slot)>> {
    resolve_first(paths, |path| root.field_at_path(path))
}

/// Resolve the first conventionally-named factory entry point on a type.
pub fn resolve_factory(
    ty: &StaticType,
    candidates: &[&str],
) -> Result<Option<(String, CodecFactory)>> {
    resolve_first(candidates, |name| ty.factory(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HookError;

    #[test]
    fn test_first_resolving_candidate_wins() {
        let space = TypeSpace::new();
        space
            .register(StaticType::new("new::path::Widget").into_ref())
            .unwrap();
        space
            .register(StaticType::new("old::path::Widget").into_ref())
            .unwrap();

        let (name, _) = resolve_type(&space, &["new::path::Widget", "old::path::Widget"])
            .unwrap()
            .unwrap();
        assert_eq!(name, "new::path::Widget");
    }

    #[test]
    fn test_later_candidates_are_tried() {
        let space = TypeSpace::new();
        space
            .register(StaticType::new("old::path::Widget").into_ref())
            .unwrap();

        let (name, _) = resolve_type(&space, &["new::path::Widget", "old::path::Widget"])
            .unwrap()
            .unwrap();
        assert_eq!(name, "old::path::Widget");
    }

    #[test]
    fn test_no_candidate_resolves() {
        let space = TypeSpace::new();
        assert!(resolve_type(&space, &["a::A", "b::B"]).unwrap().is_none());
    }

    #[test]
    fn test_resolve_slot_uses_dotted_paths() {
        let inner = DynObject::new("test::Inner")
            .with_field("limit", Slot::Int(5))
            .into_ref();
        let root = DynObject::new("test::Root").with_field("inner", Slot::Object(inner));

        let (path, slot) = resolve_slot(&root, &["missing", "inner.limit"])
            .unwrap()
            .unwrap();
        assert_eq!(path, "inner.limit");
        assert!(matches!(slot, Slot::Int(5)));
    }

    #[test]
    fn test_probe_errors_propagate() {
        let result: Result<Option<(String, ())>> = resolve_first(&["A"], |_| {
            Err(HookError::ConfigError("probe blew up".to_string()))
        });
        assert!(result.is_err());
    }
}
