use crate::media::LocalTrack;
use crate::transport::{PeerTransport, SessionKey};
use anyhow::Result;
use livecast_core::{IceCandidate, SessionDescription};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    New,
    Negotiating,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Failed | SessionStatus::Closed)
    }

    /// `Closed` is final and `Failed` may only close. A disconnected
    /// session may come back.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;

        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Failed, _) => false,
            (New, Negotiating) => true,
            (Negotiating | Disconnected, Connected) => true,
            (New | Negotiating | Connected, Disconnected) => true,
            (New | Negotiating | Connected | Disconnected, Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::New => "new",
            SessionStatus::Negotiating => "negotiating",
            SessionStatus::Connected => "connected",
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Failed => "failed",
            SessionStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    Applied,
    /// Held until the remote description arrives.
    Queued,
}

/// Negotiation state with one remote participant.
pub struct NegotiationSession {
    key: SessionKey,
    transport: Box<dyn PeerTransport>,
    local_description: Option<SessionDescription>,
    remote_description: Option<SessionDescription>,
    pending_candidates: Vec<IceCandidate>,
    status: SessionStatus,
}

impl NegotiationSession {
    pub fn new(key: SessionKey, transport: Box<dyn PeerTransport>) -> Self {
        Self {
            key,
            transport,
            local_description: None,
            remote_description: None,
            pending_candidates: Vec::new(),
            status: SessionStatus::New,
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote_description.as_ref()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) -> bool {
        if self.status == status || !self.status.can_transition_to(status) {
            return false;
        }
        self.status = status;
        true
    }

    pub async fn attach_tracks(&self, tracks: &[LocalTrack]) -> Result<()> {
        for track in tracks {
            self.transport.add_track(track).await?;
        }
        Ok(())
    }

    pub async fn create_offer(&mut self) -> Result<SessionDescription> {
        let offer = self.transport.create_offer().await?;
        self.local_description = Some(offer.clone());
        Ok(offer)
    }

    pub async fn create_answer(&mut self) -> Result<SessionDescription> {
        let answer = self.transport.create_answer().await?;
        self.local_description = Some(answer.clone());
        Ok(answer)
    }

    /// Apply the remote description, then every candidate that arrived
    /// before it, in arrival order.
    pub async fn apply_remote_description(&mut self, description: SessionDescription) -> Result<()> {
        self.transport
            .set_remote_description(description.clone())
            .await?;
        self.remote_description = Some(description);

        let pending = std::mem::take(&mut self.pending_candidates);
        if !pending.is_empty() {
            debug!("Flushing {} queued candidate(s) for {}", pending.len(), self.key);
        }
        for candidate in pending {
            if let Err(e) = self.transport.add_ice_candidate(candidate).await {
                warn!("Queued candidate rejected for {}: {:#}", self.key, e);
            }
        }
        Ok(())
    }

    pub async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> Result<CandidateOutcome> {
        if self.remote_description.is_none() {
            self.pending_candidates.push(candidate);
            return Ok(CandidateOutcome::Queued);
        }
        self.transport.add_ice_candidate(candidate).await?;
        Ok(CandidateOutcome::Applied)
    }

    pub async fn close(&mut self) {
        self.set_status(SessionStatus::Closed);
        self.pending_candidates.clear();
        if let Err(e) = self.transport.close().await {
            warn!("Error closing transport {}: {:#}", self.key, e);
        }
    }
}

impl fmt::Debug for NegotiationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NegotiationSession")
            .field("key", &self.key)
            .field("status", &self.status)
            .field("has_local", &self.local_description.is_some())
            .field("has_remote", &self.remote_description.is_some())
            .field("pending_candidates", &self.pending_candidates.len())
            .finish()
    }
}
