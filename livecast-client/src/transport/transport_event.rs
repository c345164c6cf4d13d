use crate::media::MediaKind;
use livecast_core::{IceCandidate, ParticipantId};
use std::fmt;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// Identifies one transport instance. The generation changes whenever the
/// session for a participant is replaced, so late events from a closed
/// transport can be told apart from the current one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub participant: ParticipantId,
    pub generation: u64,
}

impl SessionKey {
    pub fn new(participant: ParticipantId, generation: u64) -> Self {
        Self {
            participant,
            generation,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.participant, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Media arriving from the remote side.
#[derive(Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: MediaKind,
    /// RTP reader, absent for transports that don't carry real media.
    pub reader: Option<Arc<TrackRemote>>,
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Events a transport reports back to the peer manager.
#[derive(Debug)]
pub enum TransportEvent {
    StateChanged(SessionKey, TransportState),

    /// A local ICE candidate that has to be trickled to the remote side.
    CandidateGenerated(SessionKey, IceCandidate),

    TrackReceived(SessionKey, RemoteTrack),
}

impl TransportEvent {
    pub fn key(&self) -> &SessionKey {
        match self {
            TransportEvent::StateChanged(key, _)
            | TransportEvent::CandidateGenerated(key, _)
            | TransportEvent::TrackReceived(key, _) => key,
        }
    }
}
