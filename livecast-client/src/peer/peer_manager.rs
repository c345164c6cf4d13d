use crate::ice::IceConfigProvider;
use crate::media::LocalTrack;
use crate::peer::{CandidateOutcome, NegotiationSession, PeerCommand, SessionObserver, SessionStatus};
use crate::room::{SessionRegistry, SessionView};
use crate::signaling::SignalingOutput;
use crate::transport::{SessionKey, TransportEvent, TransportFactory, TransportState};
use anyhow::{Context, Result};
use livecast_core::{IceCandidate, ParticipantId, Role, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Owns every negotiation session of this client.
///
/// Runs as a single task: relay events and local commands arrive on the
/// command channel, transport callbacks on the transport channel, and all
/// session state is mutated here only.
pub struct PeerManager {
    role: Role,
    sessions: SessionRegistry,
    local_tracks: Option<Vec<LocalTrack>>,
    next_generation: u64,
    command_rx: mpsc::Receiver<PeerCommand>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
    signaling: Arc<dyn SignalingOutput>,
    factory: Arc<dyn TransportFactory>,
    ice: Arc<IceConfigProvider>,
    observer: Box<dyn SessionObserver>,
}

impl PeerManager {
    pub fn new(
        role: Role,
        command_rx: mpsc::Receiver<PeerCommand>,
        signaling: Arc<dyn SignalingOutput>,
        factory: Arc<dyn TransportFactory>,
        ice: Arc<IceConfigProvider>,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        let (transport_tx, transport_rx) = mpsc::channel(256);

        Self {
            role,
            sessions: SessionRegistry::new(),
            local_tracks: None,
            next_generation: 0,
            command_rx,
            transport_rx,
            transport_tx,
            signaling,
            factory,
            ice,
            observer,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn view(&self) -> SessionView {
        self.sessions.view()
    }

    pub async fn run(mut self) {
        info!("Peer manager started as {}", self.role);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Closing all sessions.");
                            self.close_all().await;
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_transport_event(e).await,
                        None => {
                            warn!("Transport channel closed unexpectedly");
                            break;
                        }
                    }
                }
            }
        }

        info!("Peer manager finished");
    }

    async fn handle_command(&mut self, cmd: PeerCommand) {
        match cmd {
            PeerCommand::Offer { from, offer } => self.on_offer(from, offer).await,

            PeerCommand::Answer { from, answer } => self.on_answer(from, answer).await,

            PeerCommand::Candidate { from, candidate } => {
                self.on_candidate(from, candidate).await
            }

            PeerCommand::ViewerReady { viewer_id } => self.on_viewer_ready(viewer_id).await,

            PeerCommand::AttachSource { tracks } => {
                info!("Local source attached with {} track(s)", tracks.len());
                self.local_tracks = Some(tracks);
            }

            PeerCommand::DetachSource => {
                if self.local_tracks.take().is_some() {
                    info!("Local source detached");
                }
            }

            PeerCommand::Close { participant } => self.remove_session(&participant).await,

            PeerCommand::CloseAll => self.close_all().await,

            PeerCommand::SignalingLost => {
                warn!(
                    "Signaling lost with {} session(s) open; no further negotiation possible",
                    self.sessions.len()
                );
                self.observer.on_signaling_lost().await;
            }
        }
    }

    async fn on_offer(&mut self, from: ParticipantId, offer: SessionDescription) {
        if self.role != Role::Viewer {
            warn!("Ignoring offer from {}: broadcasters don't accept offers", from);
            return;
        }
        if offer.kind != SdpKind::Offer {
            warn!("Ignoring offer from {}: description is an {:?}", from, offer.kind);
            return;
        }

        // 1. One session per broadcaster: a new offer replaces the old one
        if self.sessions.contains(&from) {
            info!("Replacing existing session with {}", from);
            self.remove_session(&from).await;
        }

        // 2. Fresh transport for this offer
        if !self.open_session(&from).await {
            return;
        }

        // 3. Apply the offer, answer it, and send the answer back
        match self.answer_offer(&from, offer).await {
            Ok(answer) => self.signaling.send_answer(from, answer).await,
            Err(e) => {
                error!("Failed to answer offer from {}: {:#}", from, e);
                self.remove_session(&from).await;
            }
        }
    }

    async fn answer_offer(
        &mut self,
        from: &ParticipantId,
        offer: SessionDescription,
    ) -> Result<SessionDescription> {
        let session = self.sessions.get_mut(from).context("session missing")?;
        session
            .apply_remote_description(offer)
            .await
            .context("offer rejected")?;

        self.set_status(from, SessionStatus::Negotiating).await;

        let session = self.sessions.get_mut(from).context("session missing")?;
        session.create_answer().await.context("answer creation failed")
    }

    async fn on_viewer_ready(&mut self, viewer_id: ParticipantId) {
        if !self.role.is_broadcaster() {
            warn!("Ignoring viewer-ready from {}: not broadcasting", viewer_id);
            return;
        }
        let Some(tracks) = self.local_tracks.clone() else {
            info!("Ignoring viewer-ready from {}: no local source", viewer_id);
            return;
        };

        // 1. A viewer that asks again gets a new session
        if self.sessions.contains(&viewer_id) {
            info!("Viewer {} is ready again, restarting its session", viewer_id);
            self.remove_session(&viewer_id).await;
        }

        // 2. Fresh transport for this viewer
        if !self.open_session(&viewer_id).await {
            return;
        }

        // 3. Attach local tracks, create the offer, and send it
        match self.make_offer(&viewer_id, &tracks).await {
            Ok(offer) => self.signaling.send_offer(viewer_id, offer).await,
            Err(e) => {
                error!("Failed to offer to {}: {:#}", viewer_id, e);
                self.remove_session(&viewer_id).await;
            }
        }
    }

    async fn make_offer(
        &mut self,
        viewer_id: &ParticipantId,
        tracks: &[LocalTrack],
    ) -> Result<SessionDescription> {
        let session = self.sessions.get_mut(viewer_id).context("session missing")?;
        session
            .attach_tracks(tracks)
            .await
            .context("failed to attach tracks")?;
        let offer = session.create_offer().await.context("offer creation failed")?;

        self.set_status(viewer_id, SessionStatus::Negotiating).await;
        Ok(offer)
    }

    async fn on_answer(&mut self, from: ParticipantId, answer: SessionDescription) {
        if !self.role.is_broadcaster() {
            warn!("Ignoring answer from {}: viewers don't send offers", from);
            return;
        }
        if answer.kind != SdpKind::Answer {
            warn!("Ignoring answer from {}: description is an {:?}", from, answer.kind);
            return;
        }
        let Some(session) = self.sessions.get_mut(&from) else {
            warn!("Ignoring answer from unknown participant {}", from);
            return;
        };
        if session.local_description().is_none() || session.remote_description().is_some() {
            warn!("Ignoring unexpected answer from {}", from);
            return;
        }

        match session.apply_remote_description(answer).await {
            Ok(()) => info!("Answer from {} applied", from),
            Err(e) => warn!("Answer from {} rejected: {:#}", from, e),
        }
    }

    async fn on_candidate(&mut self, from: ParticipantId, candidate: IceCandidate) {
        let Some(session) = self.sessions.get_mut(&from) else {
            debug!("Dropping candidate from unknown participant {}", from);
            return;
        };

        match session.add_remote_candidate(candidate).await {
            Ok(CandidateOutcome::Applied) => debug!("Applied candidate from {}", from),
            Ok(CandidateOutcome::Queued) => {
                debug!("Queued candidate from {} until its description arrives", from)
            }
            Err(e) => warn!("Failed to add ICE candidate from {}: {:#}", from, e),
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        // Events from a replaced transport carry an old generation
        let key = event.key();
        let current = self
            .sessions
            .get(&key.participant)
            .map(|s| s.key().generation);
        if current != Some(key.generation) {
            debug!("Ignoring event from stale transport {}", key);
            return;
        }

        match event {
            TransportEvent::CandidateGenerated(key, candidate) => {
                self.signaling.send_candidate(key.participant, candidate).await;
            }

            TransportEvent::TrackReceived(key, track) => {
                info!("Track '{}' received from {}", track.id, key.participant);
                self.observer.on_track(&key.participant, track).await;
            }

            TransportEvent::StateChanged(key, state) => {
                self.on_transport_state(key.participant, state).await;
            }
        }
    }

    async fn on_transport_state(&mut self, participant: ParticipantId, state: TransportState) {
        let status = match state {
            TransportState::Connected => SessionStatus::Connected,
            TransportState::Disconnected => SessionStatus::Disconnected,
            TransportState::Failed => SessionStatus::Failed,
            TransportState::Closed => SessionStatus::Closed,
            TransportState::New | TransportState::Connecting => return,
        };

        self.set_status(&participant, status).await;

        if status.is_terminal() {
            info!("Session with {} ended ({})", participant, status);
            self.remove_session(&participant).await;
        }
    }

    /// Create a transport for `participant` and register a fresh session.
    async fn open_session(&mut self, participant: &ParticipantId) -> bool {
        let config = self.ice.resolve().await;

        self.next_generation += 1;
        let key = SessionKey::new(participant.clone(), self.next_generation);

        let transport = match self
            .factory
            .create(key.clone(), config.into(), self.transport_tx.clone())
            .await
        {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to create transport for {}: {:#}", key, e);
                return false;
            }
        };

        info!("Opened session {}", key);
        if let Some(mut old) = self.sessions.replace(NegotiationSession::new(key, transport)) {
            old.close().await;
        }
        self.observer.on_status(participant, SessionStatus::New).await;
        true
    }

    async fn set_status(&mut self, participant: &ParticipantId, status: SessionStatus) {
        if self.sessions.set_status(participant, status) {
            self.observer.on_status(participant, status).await;
        }
    }

    async fn remove_session(&mut self, participant: &ParticipantId) {
        let Some(mut session) = self.sessions.remove(participant) else {
            return;
        };

        let already_closed = session.status() == SessionStatus::Closed;
        session.close().await;

        if !already_closed {
            self.observer
                .on_status(participant, SessionStatus::Closed)
                .await;
        }
        self.observer.on_closed(participant).await;
    }

    async fn close_all(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        info!("Closing {} session(s)", self.sessions.len());
        for participant in self.sessions.participants() {
            self.remove_session(&participant).await;
        }
    }
}
