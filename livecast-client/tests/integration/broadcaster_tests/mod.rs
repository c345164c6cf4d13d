mod test_close_all;
mod test_early_candidates_buffered;
mod test_two_viewers_independent;

use livecast_client::media::LocalTrack;
use livecast_client::{MediaDevices, MediaSource, PeerCommand, VirtualDevices};
use livecast_core::{ClientSignal, ParticipantId};

use crate::integration::TestManager;
use crate::utils::{SIGNAL_TIMEOUT_MS, wait_for_signal};

/// Open a virtual camera and hand its tracks to the manager.
pub async fn attach_camera(t: &TestManager) -> (MediaSource, Vec<LocalTrack>) {
    let devices = VirtualDevices::with_devices(["cam1"]);
    let source = devices.open("cam1").await.expect("virtual camera");
    let tracks = source.tracks().to_vec();

    t.cmd_tx
        .send(PeerCommand::AttachSource {
            tracks: tracks.clone(),
        })
        .await
        .unwrap();
    (source, tracks)
}

/// Send `viewer-ready` and wait for the resulting offer.
pub async fn ready_and_wait_offer(t: &mut TestManager, viewer: &ParticipantId) {
    t.cmd_tx
        .send(PeerCommand::ViewerReady {
            viewer_id: viewer.clone(),
        })
        .await
        .unwrap();

    let v = viewer.clone();
    wait_for_signal(
        &mut t.signal_rx,
        move |s| matches!(s, ClientSignal::Offer { to, .. } if *to == v),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .expect("no offer sent");
}
