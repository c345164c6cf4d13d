use async_trait::async_trait;
use livecast_client::media::MediaKind;
use livecast_client::transport::RemoteTrack;
use livecast_client::{SessionObserver, SessionStatus};
use livecast_core::ParticipantId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    Status {
        participant: ParticipantId,
        status: SessionStatus,
    },
    Track {
        participant: ParticipantId,
        kind: MediaKind,
    },
    Closed {
        participant: ParticipantId,
    },
    SignalingLost,
}

/// A SessionObserver that records every callback.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObserverEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_events(&self) -> Vec<ObserverEvent> {
        self.events.lock().await.clone()
    }

    pub async fn statuses_for(&self, participant: &ParticipantId) -> Vec<SessionStatus> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::Status {
                    participant: p,
                    status,
                } if p == participant => Some(*status),
                _ => None,
            })
            .collect()
    }

    pub async fn has_closed(&self, participant: &ParticipantId) -> bool {
        self.events
            .lock()
            .await
            .iter()
            .any(|e| matches!(e, ObserverEvent::Closed { participant: p } if p == participant))
    }

    /// Wait until `participant` has reported `status`.
    pub async fn wait_for_status(
        &self,
        participant: &ParticipantId,
        status: SessionStatus,
        timeout_ms: u64,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.statuses_for(participant).await.contains(&status) {
                return true;
            }
            if Instant::now() > deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Wait until `participant` has reported at least `count` statuses and
    /// return them.
    pub async fn wait_for_statuses(
        &self,
        participant: &ParticipantId,
        count: usize,
        timeout_ms: u64,
    ) -> Vec<SessionStatus> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let statuses = self.statuses_for(participant).await;
            if statuses.len() >= count || Instant::now() > deadline {
                return statuses;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub async fn wait_for_event(&self, event: &ObserverEvent, timeout_ms: u64) -> bool {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.events.lock().await.contains(event) {
                return true;
            }
            if Instant::now() > deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl SessionObserver for RecordingObserver {
    async fn on_status(&self, participant: &ParticipantId, status: SessionStatus) {
        tracing::info!("[TestObserver] {} -> {}", participant, status);
        self.events.lock().await.push(ObserverEvent::Status {
            participant: participant.clone(),
            status,
        });
    }

    async fn on_track(&self, participant: &ParticipantId, track: RemoteTrack) {
        self.events.lock().await.push(ObserverEvent::Track {
            participant: participant.clone(),
            kind: track.kind,
        });
    }

    async fn on_closed(&self, participant: &ParticipantId) {
        self.events.lock().await.push(ObserverEvent::Closed {
            participant: participant.clone(),
        });
    }

    async fn on_signaling_lost(&self) {
        self.events.lock().await.push(ObserverEvent::SignalingLost);
    }
}
