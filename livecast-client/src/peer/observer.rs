use crate::peer::SessionStatus;
use crate::transport::RemoteTrack;
use async_trait::async_trait;
use livecast_core::ParticipantId;
use tracing::{info, warn};

/// Display-layer hooks for session lifecycle. Called from the peer
/// manager task, so implementations should return quickly.
#[async_trait]
pub trait SessionObserver: Send + Sync + 'static {
    async fn on_status(&self, participant: &ParticipantId, status: SessionStatus);

    async fn on_track(&self, participant: &ParticipantId, track: RemoteTrack);

    async fn on_closed(&self, participant: &ParticipantId);

    async fn on_signaling_lost(&self) {}
}

/// Observer that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

#[async_trait]
impl SessionObserver for LoggingObserver {
    async fn on_status(&self, participant: &ParticipantId, status: SessionStatus) {
        info!("Session {} is {}", participant, status);
    }

    async fn on_track(&self, participant: &ParticipantId, track: RemoteTrack) {
        info!(
            "Receiving {:?} track '{}' from {}",
            track.kind, track.id, participant
        );
    }

    async fn on_closed(&self, participant: &ParticipantId) {
        info!("Session {} closed", participant);
    }

    async fn on_signaling_lost(&self) {
        warn!("Signaling channel lost");
    }
}
