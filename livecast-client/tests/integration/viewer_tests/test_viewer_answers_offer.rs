use livecast_client::PeerCommand;
use livecast_client::SessionStatus;
use livecast_client::media::MediaKind;
use livecast_client::transport::TransportState;
use livecast_core::{ClientSignal, ParticipantId, SdpKind, SessionDescription};

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{ObserverEvent, SIGNAL_TIMEOUT_MS, TransportCall, wait_for_signal};

#[tokio::test]
async fn test_viewer_answers_offer() {
    init_tracing();

    let mut t = create_test_manager(livecast_core::Role::Viewer);
    let broadcaster = ParticipantId::from("b1");

    t.cmd_tx
        .send(PeerCommand::Offer {
            from: broadcaster.clone(),
            offer: SessionDescription::offer("v=0 remote offer"),
        })
        .await
        .unwrap();

    let signal = wait_for_signal(
        &mut t.signal_rx,
        |s| matches!(s, ClientSignal::Answer { .. }),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .expect("no answer sent");

    let ClientSignal::Answer { to, answer } = signal else {
        unreachable!()
    };
    assert_eq!(to, broadcaster);
    assert_eq!(answer.kind, SdpKind::Answer);

    let handle = t.factory.latest_for(&broadcaster).unwrap();
    assert_eq!(
        handle.calls(),
        vec![TransportCall::SetRemote(SdpKind::Offer), TransportCall::CreateAnswer]
    );
    assert_eq!(t.view.status(&broadcaster), Some(SessionStatus::Negotiating));

    // Local candidates trickle out to the broadcaster.
    handle.emit_candidate("candidate:local-1").await;
    wait_for_signal(
        &mut t.signal_rx,
        |s| matches!(s, ClientSignal::Candidate { to, .. } if to.as_str() == "b1"),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .expect("candidate not forwarded");

    handle.emit_state(TransportState::Connecting).await;
    handle.emit_state(TransportState::Connected).await;
    handle.emit_track(MediaKind::Video).await;

    assert!(
        t.observer
            .wait_for_event(
                &ObserverEvent::Track {
                    participant: broadcaster.clone(),
                    kind: MediaKind::Video
                },
                SIGNAL_TIMEOUT_MS
            )
            .await
    );
    assert_eq!(
        t.observer.statuses_for(&broadcaster).await,
        vec![
            SessionStatus::New,
            SessionStatus::Negotiating,
            SessionStatus::Connected
        ]
    );
    assert_eq!(t.view.status(&broadcaster), Some(SessionStatus::Connected));
}

#[tokio::test]
async fn test_disconnected_session_can_recover() {
    init_tracing();

    let mut t = create_test_manager(livecast_core::Role::Viewer);
    let broadcaster = ParticipantId::from("b1");

    t.cmd_tx
        .send(PeerCommand::Offer {
            from: broadcaster.clone(),
            offer: SessionDescription::offer("v=0 remote offer"),
        })
        .await
        .unwrap();
    wait_for_signal(
        &mut t.signal_rx,
        |s| matches!(s, ClientSignal::Answer { .. }),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .unwrap();

    let handle = t.factory.latest_for(&broadcaster).unwrap();
    handle.emit_state(TransportState::Connected).await;
    handle.emit_state(TransportState::Disconnected).await;
    handle.emit_state(TransportState::Connected).await;

    assert_eq!(
        t.observer
            .wait_for_statuses(&broadcaster, 5, SIGNAL_TIMEOUT_MS)
            .await,
        vec![
            SessionStatus::New,
            SessionStatus::Negotiating,
            SessionStatus::Connected,
            SessionStatus::Disconnected,
            SessionStatus::Connected
        ]
    );
    assert!(!handle.is_closed());
}
