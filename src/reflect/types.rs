use super::object::CodecRef;
use crate::core::{HookError, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Value of a declared constant member.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl ConstValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// A named constant member together with its write-protection state.
///
/// `frozen` is the immutability guard. `hardened` means the runtime refuses to
/// lift the guard; a write to a still-frozen member is silently ignored, which
/// is exactly what the mutator's read-back check exists to catch.
#[derive(Clone)]
pub struct Constant {
    value: ConstValue,
    frozen: bool,
    hardened: bool,
}

impl Constant {
    pub fn value(&self) -> &ConstValue {
        &self.value
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }
}

/// Factory entry point that synthesizes a codec for a given version.
pub type CodecFactory = Arc<dyn Fn(i64) -> CodecRef + Send + Sync>;

/// A dynamically-resolved type: declared constants plus factory entry points.
pub struct StaticType {
    name: String,
    constants: RwLock<HashMap<String, Constant>>,
    factories: RwLock<HashMap<String, CodecFactory>>,
}

impl StaticType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constants: RwLock::new(HashMap::new()),
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Declare a plain, writable constant.
    pub fn with_constant(self, name: &str, value: ConstValue) -> Self {
        self.declare(name, value, false, false)
    }

    /// Declare a constant behind the immutability guard.
    pub fn with_frozen_constant(self, name: &str, value: ConstValue) -> Self {
        self.declare(name, value, true, false)
    }

    /// Declare a frozen constant whose guard the runtime refuses to lift.
    pub fn with_hardened_constant(self, name: &str, value: ConstValue) -> Self {
        self.declare(name, value, true, true)
    }

    fn declare(mut self, name: &str, value: ConstValue, frozen: bool, hardened: bool) -> Self {
        if let Ok(constants) = self.constants.get_mut() {
            constants.insert(
                name.to_string(),
                Constant {
                    value,
                    frozen,
                    hardened,
                },
            );
        }
        self
    }

    /// Expose a conventionally-named factory entry point.
    pub fn with_factory(mut self, name: &str, factory: CodecFactory) -> Self {
        if let Ok(factories) = self.factories.get_mut() {
            factories.insert(name.to_string(), factory);
        }
        self
    }

    pub fn into_ref(self) -> Arc<StaticType> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of a declared constant, protection state included.
    pub fn lookup(&self, member: &str) -> Result<Option<Constant>> {
        Ok(self.constants.read()?.get(member).cloned())
    }

    pub fn constant_names(&self) -> Result<Vec<String>> {
        Ok(self.constants.read()?.keys().cloned().collect())
    }

    pub fn read(&self, member: &str) -> Result<Option<ConstValue>> {
        Ok(self
            .constants
            .read()?
            .get(member)
            .map(|constant| constant.value.clone()))
    }

    /// Attempt to lift the write protection on a member.
    ///
    /// Ok(true) when the member is writable afterwards. Hardened members keep
    /// their guard and report false.
    pub fn unfreeze(&self, member: &str) -> Result<bool> {
        let mut constants = self.constants.write()?;
        match constants.get_mut(member) {
            Some(constant) if constant.hardened => Ok(false),
            Some(constant) => {
                constant.frozen = false;
                Ok(true)
            }
            None => Err(HookError::MemberNotFound(
                member.to_string(),
                self.name.clone(),
            )),
        }
    }

    /// Write a member. A write to a still-frozen member is silently ignored.
    pub fn write(&self, member: &str, value: ConstValue) -> Result<()> {
        let mut constants = self.constants.write()?;
        match constants.get_mut(member) {
            Some(constant) => {
                if !constant.frozen {
                    constant.value = value;
                }
                Ok(())
            }
            None => Err(HookError::MemberNotFound(
                member.to_string(),
                self.name.clone(),
            )),
        }
    }

    pub fn factory(&self, name: &str) -> Result<Option<CodecFactory>> {
        Ok(self.factories.read()?.get(name).cloned())
    }
}

// Global type space shared with the host process
lazy_static! {
    static ref GLOBAL_TYPES: Arc<TypeSpace> = Arc::new(TypeSpace::new());
}

/// Registry of loaded types, keyed by fully-qualified name.
///
/// Which names are present depends entirely on the dependency build the host
/// happens to ship; resolution failure is an expected outcome, not an error.
pub struct TypeSpace {
    types: RwLock<HashMap<String, Arc<StaticType>>>,
}

impl TypeSpace {
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Get the global type space shared across the process.
    pub fn global() -> &'static Arc<TypeSpace> {
        &GLOBAL_TYPES
    }

    pub fn register(&self, ty: Arc<StaticType>) -> Result<()> {
        self.types.write()?.insert(ty.name().to_string(), ty);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<Option<Arc<StaticType>>> {
        Ok(self.types.read()?.get(name).cloned())
    }

    pub fn clear(&self) -> Result<()> {
        self.types.write()?.clear();
        Ok(())
    }
}

impl Default for TypeSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writable_constant() {
        let ty = StaticType::new("test::Limits").with_constant("CEILING", ConstValue::Int(10));

        ty.write("CEILING", ConstValue::Int(20)).unwrap();
        assert_eq!(ty.read("CEILING").unwrap(), Some(ConstValue::Int(20)));
    }

    #[test]
    fn test_frozen_constant_ignores_writes_until_unfrozen() {
        let ty =
            StaticType::new("test::Limits").with_frozen_constant("CEILING", ConstValue::Int(10));

        ty.write("CEILING", ConstValue::Int(20)).unwrap();
        assert_eq!(ty.read("CEILING").unwrap(), Some(ConstValue::Int(10)));

        assert!(ty.unfreeze("CEILING").unwrap());
        ty.write("CEILING", ConstValue::Int(20)).unwrap();
        assert_eq!(ty.read("CEILING").unwrap(), Some(ConstValue::Int(20)));
    }

    #[test]
    fn test_hardened_constant_never_unfreezes() {
        let ty =
            StaticType::new("test::Limits").with_hardened_constant("CEILING", ConstValue::Int(10));

        let snapshot = ty.lookup("CEILING").unwrap().unwrap();
        assert!(snapshot.is_frozen());
        assert!(snapshot.is_hardened());
        assert_eq!(snapshot.value(), &ConstValue::Int(10));

        assert!(!ty.unfreeze("CEILING").unwrap());
        ty.write("CEILING", ConstValue::Int(20)).unwrap();
        assert_eq!(ty.read("CEILING").unwrap(), Some(ConstValue::Int(10)));
    }

    #[test]
    fn test_missing_member_is_an_error() {
        let ty = StaticType::new("test::Limits");
        assert!(ty.write("CEILING", ConstValue::Int(1)).is_err());
        assert!(ty.unfreeze("CEILING").is_err());
        assert!(ty.read("CEILING").unwrap().is_none());
    }

    #[test]
    fn test_type_space_resolution() {
        let space = TypeSpace::new();
        space
            .register(StaticType::new("a::b::Widget").into_ref())
            .unwrap();

        assert!(space.resolve("a::b::Widget").unwrap().is_some());
        assert!(space.resolve("a::b::Missing").unwrap().is_none());

        space.clear().unwrap();
        assert!(space.resolve("a::b::Widget").unwrap().is_none());
    }
}
