use crate::media::AcquisitionError;
use livecast_core::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("failed to connect to signaling server: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("signaling channel closed")]
    Closed,

    #[error("no welcome from signaling server within {0:?}")]
    NoWelcome(std::time::Duration),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Signaling(#[from] SignalingError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("operation requires the {expected} role, this client is a {actual}")]
    WrongRole { expected: Role, actual: Role },

    #[error("no room to join yet")]
    NoRoom,

    #[error("peer manager is no longer running")]
    ManagerStopped,
}
