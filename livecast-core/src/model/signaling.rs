use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use crate::model::sdp::{IceCandidate, SessionDescription};
use serde::{Deserialize, Serialize};

/// Events a participant sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ClientSignal {
    Join {
        room: RoomId,
        broadcaster: bool,
    },
    #[serde(alias = "viewer-ready")]
    ViewerReady {
        room: RoomId,
    },
    Offer {
        to: ParticipantId,
        offer: SessionDescription,
    },
    Answer {
        to: ParticipantId,
        answer: SessionDescription,
    },
    Candidate {
        to: ParticipantId,
        candidate: IceCandidate,
    },
}

/// Events the relay delivers to a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum RelaySignal {
    Welcome {
        participant_id: ParticipantId,
    },
    #[serde(rename = "viewer-ready", alias = "viewer_ready")]
    ViewerReady {
        viewer_id: ParticipantId,
    },
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
}

impl ClientSignal {
    pub fn name(&self) -> &'static str {
        match self {
            ClientSignal::Join { .. } => "join",
            ClientSignal::ViewerReady { .. } => "viewer_ready",
            ClientSignal::Offer { .. } => "offer",
            ClientSignal::Answer { .. } => "answer",
            ClientSignal::Candidate { .. } => "candidate",
        }
    }
}

impl RelaySignal {
    pub fn name(&self) -> &'static str {
        match self {
            RelaySignal::Welcome { .. } => "welcome",
            RelaySignal::ViewerReady { .. } => "viewer-ready",
            RelaySignal::Offer { .. } => "offer",
            RelaySignal::Answer { .. } => "answer",
            RelaySignal::Candidate { .. } => "candidate",
        }
    }
}
