pub use livecast_core::model::{ParticipantId, Role, RoomId};

pub mod model {
    pub use livecast_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use livecast_client::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use livecast_server::*;
}
