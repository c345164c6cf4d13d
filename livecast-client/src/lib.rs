mod config;
mod error;
pub mod ice;
pub mod library;
pub mod media;
pub mod peer;
pub mod room;
pub mod signaling;
mod stream_client;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, SignalingError};
pub use ice::IceConfigProvider;
pub use library::{LibraryError, MediaLibrary, SnapshotContext, SnapshotUpload};
pub use media::{
    AcquisitionError, AcquisitionErrorKind, LocalTrack, MediaDevices, MediaKind, MediaSource,
    MediaSourceAdapter, VirtualDevices,
};
pub use peer::{LoggingObserver, PeerCommand, PeerManager, SessionObserver, SessionStatus};
pub use room::{RoleAssignment, RoleRegistry, SessionView, determine_role};
pub use signaling::{SignalingClient, SignalingOutput};
pub use stream_client::{ClientParts, StreamClient};
pub use transport::{PeerTransport, RemoteTrack, TransportFactory, WebRtcTransportFactory};
