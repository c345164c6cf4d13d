use livecast_client::{PeerCommand, SessionStatus};
use livecast_client::transport::TransportState;
use livecast_core::{IceCandidate, ParticipantId, Role, SessionDescription};

use super::{attach_camera, ready_and_wait_offer};
use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{SIGNAL_TIMEOUT_MS, settle, wait_until};

#[tokio::test]
async fn test_two_viewers_get_independent_sessions() {
    init_tracing();

    let mut t = create_test_manager(Role::Broadcaster);
    let (_source, _tracks) = attach_camera(&t).await;
    let v1 = ParticipantId::from("v1");
    let v2 = ParticipantId::from("v2");

    ready_and_wait_offer(&mut t, &v1).await;
    ready_and_wait_offer(&mut t, &v2).await;

    assert_eq!(t.view.len(), 2);
    let h1 = t.factory.latest_for(&v1).unwrap();
    let h2 = t.factory.latest_for(&v2).unwrap();
    assert_ne!(h1.key, h2.key);

    for (viewer, candidate) in [(&v1, "candidate:from-v1"), (&v2, "candidate:from-v2")] {
        t.cmd_tx
            .send(PeerCommand::Answer {
                from: viewer.clone(),
                answer: SessionDescription::answer("v=0 answer"),
            })
            .await
            .unwrap();
        t.cmd_tx
            .send(PeerCommand::Candidate {
                from: viewer.clone(),
                candidate: IceCandidate::new(candidate),
            })
            .await
            .unwrap();
    }

    // Outbound candidates go only to the session that produced them.
    h1.emit_candidate("candidate:local-for-v1").await;
    h2.emit_candidate("candidate:local-for-v2").await;

    let (a, b) = (h1.clone(), h2.clone());
    assert!(
        wait_until(
            move || !a.applied_candidates().is_empty() && !b.applied_candidates().is_empty(),
            SIGNAL_TIMEOUT_MS
        )
        .await
    );
    settle().await;

    assert_eq!(h1.applied_candidates(), vec!["candidate:from-v1"]);
    assert_eq!(h2.applied_candidates(), vec!["candidate:from-v2"]);

    let to_v1: Vec<String> = t
        .signaling
        .candidates_to(&v1)
        .await
        .into_iter()
        .map(|c| c.candidate)
        .collect();
    let to_v2: Vec<String> = t
        .signaling
        .candidates_to(&v2)
        .await
        .into_iter()
        .map(|c| c.candidate)
        .collect();
    assert_eq!(to_v1, vec!["candidate:local-for-v1"]);
    assert_eq!(to_v2, vec!["candidate:local-for-v2"]);

    // One viewer failing leaves the other alone.
    h1.emit_state(TransportState::Failed).await;
    h2.emit_state(TransportState::Connected).await;
    assert!(
        t.observer
            .wait_for_status(&v2, SessionStatus::Connected, SIGNAL_TIMEOUT_MS)
            .await
    );
    settle().await;

    assert!(!t.view.contains(&v1));
    assert_eq!(t.view.status(&v2), Some(SessionStatus::Connected));
    assert!(h1.is_closed());
    assert!(!h2.is_closed());
}
