mod role_registry;
mod session_registry;

pub use role_registry::*;
pub use session_registry::*;
