use crate::error::SignalingError;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use livecast_core::{ClientSignal, ParticipantId, RelaySignal};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// WebSocket connection to the relay.
///
/// Inbound events are delivered in order on the receiver returned by
/// [`SignalingClient::connect`]; the receiver closing means the connection is
/// gone. There is no reconnection.
#[derive(Clone)]
pub struct SignalingClient {
    outbound: mpsc::UnboundedSender<Message>,
}

impl SignalingClient {
    pub async fn connect(
        endpoint: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RelaySignal>), SignalingError> {
        let (socket, _) = tokio_tungstenite::connect_async(endpoint).await?;
        info!("Connected to signaling server {}", endpoint);

        let (mut sender, mut receiver) = socket.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = sender.send(msg).await {
                    error!("Signaling send failed: {}", e);
                    break;
                }
            }
            let _ = sender.close().await;
        });

        tokio::spawn(async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<RelaySignal>(&text) {
                        Ok(signal) => {
                            debug!("Signaling IN: {}", signal.name());
                            if inbound_tx.send(signal).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid relay message: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            info!("Signaling connection closed");
        });

        Ok((Self { outbound: tx }, inbound_rx))
    }

    /// Connect and wait for the relay to assign this connection an id.
    pub async fn connect_with_welcome(
        endpoint: &str,
        timeout: Duration,
    ) -> Result<(Self, ParticipantId, mpsc::UnboundedReceiver<RelaySignal>), SignalingError> {
        let (client, mut inbound) = Self::connect(endpoint).await?;
        let participant_id = wait_for_welcome(&mut inbound, timeout).await?;
        Ok((client, participant_id, inbound))
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// Skip everything up to the relay's `welcome`.
pub async fn wait_for_welcome(
    inbound: &mut mpsc::UnboundedReceiver<RelaySignal>,
    timeout: Duration,
) -> Result<ParticipantId, SignalingError> {
    let wait = async {
        while let Some(signal) = inbound.recv().await {
            match signal {
                RelaySignal::Welcome { participant_id } => return Ok(participant_id),
                other => warn!("Ignoring '{}' received before welcome", other.name()),
            }
        }
        Err(SignalingError::Closed)
    };

    tokio::time::timeout(timeout, wait)
        .await
        .map_err(|_| SignalingError::NoWelcome(timeout))?
}

#[async_trait]
impl SignalingOutput for SignalingClient {
    async fn send_signal(&self, signal: ClientSignal) {
        let name = signal.name();
        match serde_json::to_string(&signal) {
            Ok(json) => {
                if self.outbound.send(Message::Text(json.into())).is_err() {
                    warn!("Dropping '{}': signaling channel closed", name);
                } else {
                    debug!("Signaling OUT: {}", name);
                }
            }
            Err(e) => error!("Failed to serialize '{}': {}", name, e),
        }
    }
}
