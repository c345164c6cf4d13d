use crate::media::LocalTrack;
use crate::transport::{SessionKey, TransportConfig, TransportEvent};
use anyhow::Result;
use async_trait::async_trait;
use livecast_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

/// One peer-to-peer media connection, as seen by a negotiation session.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn add_track(&self, track: &LocalTrack) -> Result<()>;

    /// Create an offer and apply it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription>;

    /// Create an answer and apply it as the local description.
    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Builds transports for the peer manager.
///
/// Every event of the created transport must be tagged with `key` and sent to
/// `event_tx`.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        key: SessionKey,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>>;
}
