use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::ice::IceConfigProvider;
use crate::media::{MediaDevices, MediaSourceAdapter};
use crate::peer::{PeerCommand, PeerManager, SessionObserver};
use crate::room::{RoleRegistry, SessionView};
use crate::signaling::{SignalingClient, SignalingOutput};
use crate::transport::{TransportFactory, WebRtcTransportFactory};
use livecast_core::{ParticipantId, RelaySignal, Role, RoomId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Everything a [`StreamClient`] needs besides its entry context.
pub struct ClientParts {
    pub local_id: ParticipantId,
    pub signaling: Arc<dyn SignalingOutput>,
    pub inbound: mpsc::UnboundedReceiver<RelaySignal>,
    pub factory: Arc<dyn TransportFactory>,
    pub ice: Arc<IceConfigProvider>,
}

/// One participant of a livecast room: wires the signaling channel, the
/// peer manager and the capture device together.
pub struct StreamClient {
    roles: RoleRegistry,
    local_id: ParticipantId,
    signaling: Arc<dyn SignalingOutput>,
    commands: mpsc::Sender<PeerCommand>,
    media: MediaSourceAdapter,
    view: SessionView,
    manager_task: JoinHandle<()>,
    pump_task: JoinHandle<()>,
}

impl StreamClient {
    /// Connect to the relay and wait for its `welcome`.
    pub async fn connect(
        config: ClientConfig,
        devices: Arc<dyn MediaDevices>,
        observer: Box<dyn SessionObserver>,
    ) -> Result<Self, ClientError> {
        let (signaling, local_id, inbound) =
            SignalingClient::connect_with_welcome(&config.signaling_url, config.welcome_timeout)
                .await?;
        info!("Connected as participant {}", local_id);

        let ice = Arc::new(IceConfigProvider::remote(&config.api_base));
        let prefetch = ice.clone();
        tokio::spawn(async move {
            prefetch.resolve().await;
        });

        let parts = ClientParts {
            local_id,
            signaling: Arc::new(signaling),
            inbound,
            factory: Arc::new(WebRtcTransportFactory),
            ice,
        };
        Ok(Self::with_parts(config.room.as_deref(), parts, devices, observer))
    }

    pub fn with_parts(
        room_param: Option<&str>,
        parts: ClientParts,
        devices: Arc<dyn MediaDevices>,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        let roles = RoleRegistry::from_entry(room_param);
        let (command_tx, command_rx) = mpsc::channel(256);

        let manager = PeerManager::new(
            roles.role(),
            command_rx,
            parts.signaling.clone(),
            parts.factory,
            parts.ice,
            observer,
        );
        let view = manager.view();

        let manager_task = tokio::spawn(manager.run());
        let pump_task = tokio::spawn(pump_signals(parts.inbound, command_tx.clone()));

        Self {
            roles,
            local_id: parts.local_id,
            signaling: parts.signaling,
            commands: command_tx,
            media: MediaSourceAdapter::new(devices),
            view,
            manager_task,
            pump_task,
        }
    }

    pub fn role(&self) -> Role {
        self.roles.role()
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.roles.room()
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    pub fn sessions(&self) -> SessionView {
        self.view.clone()
    }

    pub fn is_broadcasting(&self) -> bool {
        self.media.is_active()
    }

    /// Link a viewer opens to watch this broadcast.
    pub fn share_link(&self, origin: &str) -> Option<String> {
        self.roles
            .room()
            .map(|room| format!("{}/video?room={}", origin.trim_end_matches('/'), room))
    }

    /// Join the room from the entry link and ask its broadcaster for media.
    pub async fn start_viewer(&mut self) -> Result<(), ClientError> {
        self.require_role(Role::Viewer)?;
        self.roles.join(&*self.signaling).await
    }

    /// Open `device_id`, create the room on first use and announce it.
    ///
    /// When the device can't be opened nothing else happens: no room, no
    /// `join`, no source handed to the peer manager. Switching devices while
    /// live stops the old source and closes every viewer session first.
    pub async fn start_broadcast(&mut self, device_id: &str) -> Result<RoomId, ClientError> {
        self.require_role(Role::Broadcaster)?;

        // Sessions built on the old source can't carry media once it stops.
        if self.media.release() {
            info!("Switching capture device to '{}'", device_id);
            self.send(PeerCommand::DetachSource).await?;
            self.send(PeerCommand::CloseAll).await?;
        }

        let tracks = self.media.acquire(device_id).await?.tracks().to_vec();
        let room = self.roles.ensure_room(device_id)?.clone();

        self.send(PeerCommand::AttachSource { tracks }).await?;
        self.roles.join(&*self.signaling).await?;

        info!("Broadcasting '{}' in room {}", device_id, room);
        Ok(room)
    }

    /// Stop every local track, then tear down all viewer sessions.
    pub async fn stop_broadcast(&mut self) -> Result<(), ClientError> {
        self.require_role(Role::Broadcaster)?;

        if self.media.release() {
            info!("Broadcast stopped");
        }
        self.send(PeerCommand::DetachSource).await?;
        self.send(PeerCommand::CloseAll).await
    }

    pub async fn close_session(&self, participant: ParticipantId) -> Result<(), ClientError> {
        self.send(PeerCommand::Close { participant }).await
    }

    /// Release the device, close every session and wait for the peer
    /// manager to finish.
    pub async fn shutdown(mut self) {
        self.media.release();

        self.pump_task.abort();
        let _ = self.pump_task.await;

        // The manager closes its sessions once the last sender is gone.
        drop(self.commands);
        let _ = self.manager_task.await;
        info!("Client {} shut down", self.local_id);
    }

    fn require_role(&self, expected: Role) -> Result<(), ClientError> {
        let actual = self.roles.role();
        if actual != expected {
            return Err(ClientError::WrongRole { expected, actual });
        }
        Ok(())
    }

    async fn send(&self, cmd: PeerCommand) -> Result<(), ClientError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| ClientError::ManagerStopped)
    }
}

async fn pump_signals(
    mut inbound: mpsc::UnboundedReceiver<RelaySignal>,
    commands: mpsc::Sender<PeerCommand>,
) {
    while let Some(signal) = inbound.recv().await {
        let name = signal.name();
        let Some(cmd) = PeerCommand::from_signal(signal) else {
            debug!("Relay event '{}' needs no negotiation step", name);
            continue;
        };
        if commands.send(cmd).await.is_err() {
            return;
        }
    }
    let _ = commands.send(PeerCommand::SignalingLost).await;
}
