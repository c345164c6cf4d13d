use livecast_client::{SessionStatus, VirtualDevices};
use livecast_core::{ClientSignal, ParticipantId, RelaySignal, Role};

use super::create_test_client;
use crate::integration::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, settle, wait_for_signal, wait_until};

#[tokio::test]
async fn test_start_and_stop_broadcast() {
    init_tracing();

    let mut t = create_test_client(None, VirtualDevices::with_devices(["cam1"]));
    assert_eq!(t.client.role(), Role::Broadcaster);
    assert!(t.client.share_link("https://cast.example.org").is_none());

    let room = t.client.start_broadcast("cam1").await.unwrap();
    assert!(room.as_str().starts_with("cam1-"));
    assert_eq!(room.as_str().len(), "cam1-".len() + 5);
    assert_eq!(
        t.client.share_link("https://cast.example.org/"),
        Some(format!("https://cast.example.org/video?room={}", room))
    );
    assert_eq!(
        t.signaling.signals().await,
        vec![ClientSignal::Join {
            room: room.clone(),
            broadcaster: true
        }]
    );
    assert!(t.devices.is_in_use("cam1"));

    let viewer = ParticipantId::from("v1");
    t.relay_tx
        .send(RelaySignal::ViewerReady {
            viewer_id: viewer.clone(),
        })
        .unwrap();
    wait_for_signal(
        &mut t.signal_rx,
        |s| matches!(s, ClientSignal::Offer { .. }),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .unwrap();
    assert_eq!(
        t.client.sessions().status(&viewer),
        Some(SessionStatus::Negotiating)
    );

    t.client.stop_broadcast().await.unwrap();

    // Tracks stop before the call returns; sessions follow shortly.
    assert!(!t.devices.is_in_use("cam1"));
    assert!(!t.client.is_broadcasting());
    let sessions = t.client.sessions();
    assert!(wait_until(move || sessions.is_empty(), SIGNAL_TIMEOUT_MS).await);
    assert!(t.factory.latest_for(&viewer).unwrap().is_closed());

    // A late viewer gets nothing once the source is gone.
    t.relay_tx
        .send(RelaySignal::ViewerReady {
            viewer_id: ParticipantId::from("v2"),
        })
        .unwrap();
    settle().await;
    assert_eq!(t.factory.count(), 1);

    // Restarting keeps the room.
    let again = t.client.start_broadcast("cam1").await.unwrap();
    assert_eq!(again, room);
}

#[tokio::test]
async fn test_shutdown_closes_sessions() {
    init_tracing();

    let mut t = create_test_client(None, VirtualDevices::with_devices(["cam1"]));
    t.client.start_broadcast("cam1").await.unwrap();
    t.relay_tx
        .send(RelaySignal::ViewerReady {
            viewer_id: ParticipantId::from("v1"),
        })
        .unwrap();
    wait_for_signal(
        &mut t.signal_rx,
        |s| matches!(s, ClientSignal::Offer { .. }),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .unwrap();

    t.client.shutdown().await;

    assert!(!t.devices.is_in_use("cam1"));
    let handle = t.factory.latest_for(&ParticipantId::from("v1")).unwrap();
    assert!(handle.is_closed());
}
