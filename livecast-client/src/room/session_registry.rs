use crate::peer::{NegotiationSession, SessionStatus};
use dashmap::DashMap;
use livecast_core::ParticipantId;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only view of the session map, shared with the display layer.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    statuses: Arc<DashMap<ParticipantId, SessionStatus>>,
}

impl SessionView {
    pub fn status(&self, participant: &ParticipantId) -> Option<SessionStatus> {
        self.statuses.get(participant).map(|s| *s)
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        self.statuses.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.statuses.contains_key(participant)
    }
}

/// At most one negotiation session per remote participant.
///
/// Owned by the peer manager task; every mutation is mirrored to the
/// [`SessionView`].
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<ParticipantId, NegotiationSession>,
    view: SessionView,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionView {
        self.view.clone()
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&NegotiationSession> {
        self.sessions.get(participant)
    }

    pub fn get_mut(&mut self, participant: &ParticipantId) -> Option<&mut NegotiationSession> {
        self.sessions.get_mut(participant)
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.sessions.contains_key(participant)
    }

    /// Store `session`, handing back whatever it replaced.
    pub fn replace(&mut self, session: NegotiationSession) -> Option<NegotiationSession> {
        let participant = session.key().participant.clone();
        self.view.statuses.insert(participant.clone(), session.status());
        self.sessions.insert(participant, session)
    }

    pub fn remove(&mut self, participant: &ParticipantId) -> Option<NegotiationSession> {
        self.view.statuses.remove(participant);
        self.sessions.remove(participant)
    }

    /// Apply a status change if the session exists and the transition is
    /// allowed. Returns whether anything changed.
    pub fn set_status(&mut self, participant: &ParticipantId, status: SessionStatus) -> bool {
        let Some(session) = self.sessions.get_mut(participant) else {
            return false;
        };
        if !session.set_status(status) {
            return false;
        }
        self.view.statuses.insert(participant.clone(), status);
        true
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        self.sessions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
