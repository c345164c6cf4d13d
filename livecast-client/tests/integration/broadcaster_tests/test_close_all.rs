use livecast_client::PeerCommand;
use livecast_core::{ParticipantId, Role};

use super::{attach_camera, ready_and_wait_offer};
use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{SIGNAL_TIMEOUT_MS, wait_until};

#[tokio::test]
async fn test_close_all_tears_down_every_session() {
    init_tracing();

    let mut t = create_test_manager(Role::Broadcaster);
    let (_source, _tracks) = attach_camera(&t).await;
    let viewers = [ParticipantId::from("v1"), ParticipantId::from("v2")];
    for viewer in &viewers {
        ready_and_wait_offer(&mut t, viewer).await;
    }

    t.cmd_tx.send(PeerCommand::CloseAll).await.unwrap();

    let view = t.view.clone();
    assert!(wait_until(move || view.is_empty(), SIGNAL_TIMEOUT_MS).await);
    for viewer in &viewers {
        assert!(t.factory.latest_for(viewer).unwrap().is_closed());
        assert!(t.observer.has_closed(viewer).await);
    }
}

#[tokio::test]
async fn test_close_single_session() {
    init_tracing();

    let mut t = create_test_manager(Role::Broadcaster);
    let (_source, _tracks) = attach_camera(&t).await;
    let v1 = ParticipantId::from("v1");
    let v2 = ParticipantId::from("v2");
    ready_and_wait_offer(&mut t, &v1).await;
    ready_and_wait_offer(&mut t, &v2).await;

    t.cmd_tx
        .send(PeerCommand::Close {
            participant: v1.clone(),
        })
        .await
        .unwrap();

    let view = t.view.clone();
    assert!(wait_until(move || view.len() == 1, SIGNAL_TIMEOUT_MS).await);
    assert!(t.view.contains(&v2));
    assert!(t.factory.latest_for(&v1).unwrap().is_closed());
}
