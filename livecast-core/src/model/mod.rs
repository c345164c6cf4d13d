mod ice;
mod participant;
mod role;
mod room;
mod sdp;
mod signaling;

pub use ice::{IceConfig, IceServerConfig};
pub use participant::ParticipantId;
pub use role::Role;
pub use room::RoomId;
pub use sdp::{IceCandidate, SdpKind, SessionDescription};
pub use signaling::{ClientSignal, RelaySignal};
