//! Dynamic object model the patcher probes the bridge through.
//!
//! The bridge component is an opaque third party: no stable API, no guaranteed
//! layout across versions. Everything the engine touches, it reaches by
//! name-based lookup against this seam, which the host process populates when
//! it loads the bridge.

pub mod object;
pub mod types;

pub use object::{
    CodecListRef, CodecRef, DynObject, ObjectRef, SessionListRef, Slot, VersionCodec,
    VersionMapRef,
};
pub use types::{CodecFactory, ConstValue, Constant, StaticType, TypeSpace};
