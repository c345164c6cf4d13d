use crate::media::LocalTrack;
use livecast_core::{IceCandidate, ParticipantId, RelaySignal, SessionDescription};

#[derive(Debug)]
pub enum PeerCommand {
    Offer {
        from: ParticipantId,
        offer: SessionDescription,
    },
    Answer {
        from: ParticipantId,
        answer: SessionDescription,
    },
    Candidate {
        from: ParticipantId,
        candidate: IceCandidate,
    },
    ViewerReady {
        viewer_id: ParticipantId,
    },
    AttachSource {
        tracks: Vec<LocalTrack>,
    },
    DetachSource,
    Close {
        participant: ParticipantId,
    },
    CloseAll,
    SignalingLost,
}

impl PeerCommand {
    /// Negotiation commands carried by a relay event. `welcome` has none.
    pub fn from_signal(signal: RelaySignal) -> Option<Self> {
        match signal {
            RelaySignal::Welcome { .. } => None,
            RelaySignal::ViewerReady { viewer_id } => Some(PeerCommand::ViewerReady { viewer_id }),
            RelaySignal::Offer { from, offer } => Some(PeerCommand::Offer { from, offer }),
            RelaySignal::Answer { from, answer } => Some(PeerCommand::Answer { from, answer }),
            RelaySignal::Candidate { from, candidate } => {
                Some(PeerCommand::Candidate { from, candidate })
            }
        }
    }
}
