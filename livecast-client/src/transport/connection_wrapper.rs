use crate::media::{LocalTrack, MediaKind};
use crate::transport::{
    PeerTransport, RemoteTrack, SessionKey, TransportConfig, TransportEvent, TransportFactory,
    TransportState,
};
use anyhow::Result;
use async_trait::async_trait;
use livecast_core::{IceCandidate, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

/// webrtc-rs peer connection wired to the peer manager's event channel.
pub struct ConnectionWrapper {
    pub key: SessionKey,
    pub peer_connection: Arc<RTCPeerConnection>,
}

impl ConnectionWrapper {
    pub async fn new(
        key: SessionKey,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        // 1. Codecs and interceptors (RTCP reports, NACK)
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        // 2. API object
        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // 3. ICE servers (STUN/TURN) from the resolved config
        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        // 4. The peer connection itself
        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // 5. Connection state goes to the manager as a transport state
        let state_tx = event_tx.clone();
        let key_state = key.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let key = key_state.clone();

                Box::pin(async move {
                    info!("Peer connection state for {}: {:?}", key, s);
                    let state = match s {
                        RTCPeerConnectionState::Connecting => TransportState::Connecting,
                        RTCPeerConnectionState::Connected => TransportState::Connected,
                        RTCPeerConnectionState::Disconnected => TransportState::Disconnected,
                        RTCPeerConnectionState::Failed => TransportState::Failed,
                        RTCPeerConnectionState::Closed => TransportState::Closed,
                        _ => TransportState::New,
                    };
                    let _ = tx.send(TransportEvent::StateChanged(key, state)).await;
                })
            },
        ));

        // 6. Trickle ICE: every local candidate goes out as soon as it is found
        let ice_tx = event_tx.clone();
        let key_ice = key.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let key = key_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(key, candidate))
                    .await;
            })
        }));

        // 7. Remote media surfaces as a track event
        let track_tx = event_tx;
        let key_track = key.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let key = key_track.clone();

                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => MediaKind::Audio,
                        _ => MediaKind::Video,
                    };
                    debug!("Remote {:?} track '{}' from {}", kind, track.id(), key);
                    let remote = RemoteTrack {
                        id: track.id(),
                        stream_id: track.stream_id(),
                        kind,
                        reader: Some(track),
                    };
                    let _ = tx.send(TransportEvent::TrackReceived(key, remote)).await;
                })
            },
        ));

        Ok(Self {
            key,
            peer_connection,
        })
    }
}

#[async_trait]
impl PeerTransport for ConnectionWrapper {
    async fn add_track(&self, track: &LocalTrack) -> Result<()> {
        let sender = self.peer_connection.add_track(track.local()).await?;

        // RTCP has to be drained or the interceptors stall.
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while sender.read(&mut buf).await.is_ok() {}
        });
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        let desc = match description.kind {
            SdpKind::Offer => RTCSessionDescription::offer(description.sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(description.sdp)?,
        };
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Builds a [`ConnectionWrapper`] per session.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebRtcTransportFactory;

#[async_trait]
impl TransportFactory for WebRtcTransportFactory {
    async fn create(
        &self,
        key: SessionKey,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>> {
        let wrapper = ConnectionWrapper::new(key, config, event_tx).await?;
        Ok(Box::new(wrapper))
    }
}
