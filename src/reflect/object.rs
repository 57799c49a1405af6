use crate::core::Result;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Opaque per-version codec owned by the bridge.
///
/// The patcher never looks inside a codec. It only reads the version the codec
/// reports and the type name under which a factory for more of them may be
/// discoverable.
pub trait VersionCodec: Send + Sync {
    /// Protocol version this codec encodes/decodes.
    fn version(&self) -> i64;

    /// Fully-qualified name of the codec's concrete type.
    fn type_name(&self) -> &str;
}

pub type CodecRef = Arc<dyn VersionCodec>;
pub type ObjectRef = Arc<DynObject>;

/// Shared handle to a map-shaped version registry (version -> codec).
pub type VersionMapRef = Arc<RwLock<BTreeMap<i64, CodecRef>>>;
/// Shared handle to a list-shaped version registry.
pub type CodecListRef = Arc<RwLock<Vec<CodecRef>>>;
/// Shared handle to a live session directory.
pub type SessionListRef = Arc<RwLock<Vec<ObjectRef>>>;

/// A single named field on a dynamic object.
#[derive(Clone)]
pub enum Slot {
    Int(i64),
    Text(String),
    Bool(bool),
    Object(ObjectRef),
    VersionMap(VersionMapRef),
    CodecList(CodecListRef),
    SessionList(SessionListRef),
}

impl Slot {
    /// Short shape name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Object(_) => "object",
            Self::VersionMap(_) => "version map",
            Self::CodecList(_) => "codec list",
            Self::SessionList(_) => "session list",
        }
    }
}

/// A dynamic, name-addressed object inside the opaque bridge.
///
/// The bridge's internal layout is not known at compile time; everything the
/// patcher reaches, it reaches by probing fields by name.
pub struct DynObject {
    type_name: String,
    fields: RwLock<HashMap<String, Slot>>,
}

impl DynObject {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            fields: RwLock::new(HashMap::new()),
        }
    }

    /// Add a field (builder, used while the object is still unshared).
    pub fn with_field(mut self, name: &str, slot: Slot) -> Self {
        if let Ok(fields) = self.fields.get_mut() {
            fields.insert(name.to_string(), slot);
        }
        self
    }

    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field(&self, name: &str) -> Result<Option<Slot>> {
        Ok(self.fields.read()?.get(name).cloned())
    }

    pub fn set_field(&self, name: &str, slot: Slot) -> Result<()> {
        self.fields.write()?.insert(name.to_string(), slot);
        Ok(())
    }

    pub fn field_names(&self) -> Result<Vec<String>> {
        Ok(self.fields.read()?.keys().cloned().collect())
    }

    /// Walk a dotted path ("network.codec_registry") through nested objects.
    ///
    /// Returns None as soon as a segment is missing or an intermediate segment
    /// is not an object.
    pub fn field_at_path(&self, path: &str) -> Result<Option<Slot>> {
        let mut segments = path.split('.');
        let first = match segments.next() {
            Some(segment) => segment,
            None => return Ok(None),
        };
        let mut slot = match self.field(first)? {
            Some(slot) => slot,
            None => return Ok(None),
        };
        for segment in segments {
            let object = match slot {
                Slot::Object(object) => object,
                _ => return Ok(None),
            };
            slot = match object.field(segment)? {
                Some(slot) => slot,
                None => return Ok(None),
            };
        }
        Ok(Some(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCodec(i64);

    impl VersionCodec for TestCodec {
        fn version(&self) -> i64 {
            self.0
        }

        fn type_name(&self) -> &str {
            "test::Codec"
        }
    }

    #[test]
    fn test_field_roundtrip() {
        let object = DynObject::new("test::Widget").with_field("count", Slot::Int(3));

        assert_eq!(object.type_name(), "test::Widget");
        assert!(matches!(object.field("count").unwrap(), Some(Slot::Int(3))));
        assert!(object.field("missing").unwrap().is_none());

        object.set_field("count", Slot::Int(4)).unwrap();
        assert!(matches!(object.field("count").unwrap(), Some(Slot::Int(4))));
    }

    #[test]
    fn test_field_at_path_walks_nested_objects() {
        let inner = DynObject::new("test::Inner")
            .with_field("limit", Slot::Int(9))
            .into_ref();
        let outer = DynObject::new("test::Outer").with_field("inner", Slot::Object(inner));

        assert!(matches!(
            outer.field_at_path("inner.limit").unwrap(),
            Some(Slot::Int(9))
        ));
        assert!(outer.field_at_path("inner.missing").unwrap().is_none());
        assert!(outer.field_at_path("missing.limit").unwrap().is_none());
        // An intermediate segment that is not an object terminates the walk.
        assert!(outer.field_at_path("inner.limit.deeper").unwrap().is_none());
    }

    #[test]
    fn test_slot_kind_names() {
        let codec: CodecRef = Arc::new(TestCodec(700));
        let map: VersionMapRef = Arc::new(RwLock::new(BTreeMap::from([(700, codec)])));

        assert_eq!(Slot::Int(1).kind(), "int");
        assert_eq!(Slot::VersionMap(map).kind(), "version map");
    }
}
