use async_trait::async_trait;
use livecast_core::{ClientSignal, IceCandidate, ParticipantId, RoomId, SessionDescription};

/// Outbound half of the signaling channel.
///
/// Sends never fail from the caller's point of view: a closed channel is
/// logged by the implementation and reported through the inbound side.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_signal(&self, signal: ClientSignal);

    async fn send_join(&self, room: RoomId, broadcaster: bool) {
        self.send_signal(ClientSignal::Join { room, broadcaster })
            .await;
    }

    async fn send_viewer_ready(&self, room: RoomId) {
        self.send_signal(ClientSignal::ViewerReady { room }).await;
    }

    async fn send_offer(&self, to: ParticipantId, offer: SessionDescription) {
        self.send_signal(ClientSignal::Offer { to, offer }).await;
    }

    async fn send_answer(&self, to: ParticipantId, answer: SessionDescription) {
        self.send_signal(ClientSignal::Answer { to, answer }).await;
    }

    async fn send_candidate(&self, to: ParticipantId, candidate: IceCandidate) {
        self.send_signal(ClientSignal::Candidate { to, candidate })
            .await;
    }
}
