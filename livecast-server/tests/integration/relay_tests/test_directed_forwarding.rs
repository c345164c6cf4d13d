use livecast_core::{ClientSignal, IceCandidate, ParticipantId, RelaySignal, SessionDescription};
use livecast_server::ServerConfig;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::TestClient;

#[tokio::test]
async fn test_offer_answer_candidate_forwarding() {
    init_tracing();

    let addr = spawn_relay(ServerConfig::default()).await;
    let base = format!("ws://{}", addr);

    let mut broadcaster = TestClient::connect(&base).await.unwrap();
    let mut viewer = TestClient::connect(&base).await.unwrap();

    broadcaster
        .send(ClientSignal::Offer {
            to: viewer.id.clone(),
            offer: SessionDescription::offer("v=0 offer"),
        })
        .await
        .unwrap();
    assert_eq!(
        viewer.recv().await.unwrap(),
        RelaySignal::Offer {
            from: broadcaster.id.clone(),
            offer: SessionDescription::offer("v=0 offer"),
        }
    );

    viewer
        .send(ClientSignal::Answer {
            to: broadcaster.id.clone(),
            answer: SessionDescription::answer("v=0 answer"),
        })
        .await
        .unwrap();
    viewer
        .send(ClientSignal::Candidate {
            to: broadcaster.id.clone(),
            candidate: IceCandidate::new("candidate:1 1 udp 1 10.0.0.2 5000 typ host"),
        })
        .await
        .unwrap();

    assert!(matches!(
        broadcaster.recv().await.unwrap(),
        RelaySignal::Answer { from, .. } if from == viewer.id
    ));
    assert!(matches!(
        broadcaster.recv().await.unwrap(),
        RelaySignal::Candidate { from, candidate } if from == viewer.id && candidate.candidate.starts_with("candidate:1")
    ));
}

#[tokio::test]
async fn test_unknown_target_and_disconnected_peer() {
    init_tracing();

    let addr = spawn_relay(ServerConfig::default()).await;
    let base = format!("ws://{}", addr);

    let mut broadcaster = TestClient::connect(&base).await.unwrap();
    let viewer = TestClient::connect(&base).await.unwrap();
    let viewer_id = viewer.id.clone();
    viewer.close().await;
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    for to in [ParticipantId::from("ghost"), viewer_id] {
        broadcaster
            .send(ClientSignal::Offer {
                to,
                offer: SessionDescription::offer("v=0 offer"),
            })
            .await
            .unwrap();
    }

    // The relay keeps serving the sender.
    let mut late = TestClient::connect(&base).await.unwrap();
    broadcaster
        .send(ClientSignal::Offer {
            to: late.id.clone(),
            offer: SessionDescription::offer("v=0 offer"),
        })
        .await
        .unwrap();
    assert!(matches!(late.recv().await.unwrap(), RelaySignal::Offer { .. }));
    assert!(broadcaster.is_quiet(200).await);
}
