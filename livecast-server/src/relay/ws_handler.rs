use crate::relay::RelayService;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use livecast_core::{ClientSignal, ParticipantId, RelaySignal};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: RelayService) {
    let participant_id = ParticipantId::new();
    info!("New WebSocket connection: {}", participant_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<RelaySignal>();

    let _ = tx.send(RelaySignal::Welcome {
        participant_id: participant_id.clone(),
    });
    service.add_participant(participant_id.clone(), tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            let json = match serde_json::to_string(&signal) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize relay signal: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let participant_id = participant_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientSignal>(&text) {
                        Ok(signal) => service.handle_signal(&participant_id, signal),
                        Err(e) => warn!("Invalid signal from {}: {}", participant_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_participant(&participant_id);
    info!("WebSocket disconnected: {}", participant_id);
}
