use livecast_client::PeerCommand;
use livecast_core::{IceCandidate, ParticipantId, Role, SdpKind, SessionDescription};

use super::{attach_camera, ready_and_wait_offer};
use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{SIGNAL_TIMEOUT_MS, TransportCall, settle, wait_until};

#[tokio::test]
async fn test_early_candidates_are_applied_after_answer_in_order() {
    init_tracing();

    let mut t = create_test_manager(Role::Broadcaster);
    let (_source, _tracks) = attach_camera(&t).await;
    let viewer = ParticipantId::from("v1");
    ready_and_wait_offer(&mut t, &viewer).await;

    for c in ["candidate:a", "candidate:b", "candidate:c"] {
        t.cmd_tx
            .send(PeerCommand::Candidate {
                from: viewer.clone(),
                candidate: IceCandidate::new(c),
            })
            .await
            .unwrap();
    }
    settle().await;

    let handle = t.factory.latest_for(&viewer).unwrap();
    assert!(
        handle.applied_candidates().is_empty(),
        "candidates must wait for the remote description"
    );

    t.cmd_tx
        .send(PeerCommand::Answer {
            from: viewer.clone(),
            answer: SessionDescription::answer("v=0 viewer answer"),
        })
        .await
        .unwrap();
    t.cmd_tx
        .send(PeerCommand::Candidate {
            from: viewer.clone(),
            candidate: IceCandidate::new("candidate:d"),
        })
        .await
        .unwrap();

    let h = handle.clone();
    assert!(wait_until(move || h.applied_candidates().len() == 4, SIGNAL_TIMEOUT_MS).await);

    let calls = handle.calls();
    let remote_at = calls
        .iter()
        .position(|c| *c == TransportCall::SetRemote(SdpKind::Answer))
        .unwrap();
    assert_eq!(
        calls[remote_at + 1..].to_vec(),
        vec![
            TransportCall::AddCandidate("candidate:a".into()),
            TransportCall::AddCandidate("candidate:b".into()),
            TransportCall::AddCandidate("candidate:c".into()),
            TransportCall::AddCandidate("candidate:d".into()),
        ]
    );
}
