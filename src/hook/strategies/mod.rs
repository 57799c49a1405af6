pub mod connection_handler;
pub mod constant_patch;
pub mod session_manager;

pub use connection_handler::ConnectionHandlerStrategy;
pub use constant_patch::ConstantPatchStrategy;
pub use session_manager::SessionManagerStrategy;
