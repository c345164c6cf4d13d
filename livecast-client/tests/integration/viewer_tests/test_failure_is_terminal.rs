use livecast_client::transport::TransportState;
use livecast_client::{PeerCommand, SessionStatus};
use livecast_core::{ClientSignal, ParticipantId, Role, SessionDescription};

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{ObserverEvent, SIGNAL_TIMEOUT_MS, settle, wait_for_signal};

#[tokio::test]
async fn test_failure_is_terminal() {
    init_tracing();

    let mut t = create_test_manager(Role::Viewer);
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
    handle.emit_state(TransportState::Failed).await;

    assert!(
        t.observer
            .wait_for_event(
                &ObserverEvent::Closed {
                    participant: broadcaster.clone()
                },
                SIGNAL_TIMEOUT_MS
            )
            .await,
        "observer was not told about the closed session"
    );

    assert_eq!(
        t.observer.statuses_for(&broadcaster).await,
        vec![
            SessionStatus::New,
            SessionStatus::Negotiating,
            SessionStatus::Connected,
            SessionStatus::Failed,
            SessionStatus::Closed
        ]
    );
    assert!(handle.is_closed());
    assert!(t.view.is_empty());

    // No automatic retry.
    settle().await;
    assert_eq!(t.factory.count(), 1);
    assert_eq!(t.signaling.answers_to(&broadcaster).await.len(), 1);
}
