mod observer;
mod peer_command;
mod peer_manager;
mod session;

pub use observer::*;
pub use peer_command::*;
pub use peer_manager::*;
pub use session::*;
