use crate::media::MediaDevices;
use anyhow::Result;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use webrtc::media::Sample;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionErrorKind {
    DeviceBusy,
    PermissionDenied,
    NotFound,
}

impl fmt::Display for AcquisitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionErrorKind::DeviceBusy => f.write_str("device is busy"),
            AcquisitionErrorKind::PermissionDenied => f.write_str("permission denied"),
            AcquisitionErrorKind::NotFound => f.write_str("device not found"),
        }
    }
}

/// Any reason a capture device could not be opened.
#[derive(Debug, Clone, Error)]
#[error("unable to acquire '{device_id}': {kind}")]
pub struct AcquisitionError {
    pub device_id: String,
    pub kind: AcquisitionErrorKind,
}

impl AcquisitionError {
    pub fn new(device_id: impl Into<String>, kind: AcquisitionErrorKind) -> Self {
        Self {
            device_id: device_id.into(),
            kind,
        }
    }
}

/// One outgoing track of a capture source.
#[derive(Clone)]
pub struct LocalTrack {
    kind: MediaKind,
    track: Arc<TrackLocalStaticSample>,
    stopped: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(kind: MediaKind, track: Arc<TrackLocalStaticSample>) -> Self {
        Self {
            kind,
            track,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        self.track.id()
    }

    pub fn stream_id(&self) -> &str {
        self.track.stream_id()
    }

    pub fn local(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        self.track.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Push one encoded frame to every connection carrying this track.
    /// Frames written after `stop` are discarded.
    pub async fn write_sample(&self, data: Bytes, duration: Duration) -> Result<()> {
        if self.is_stopped() {
            debug!("Dropping sample for stopped track '{}'", self.id());
            return Ok(());
        }
        self.track
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await?;
        Ok(())
    }
}

impl fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTrack")
            .field("id", &self.id())
            .field("kind", &self.kind)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Releases the underlying capture hardware.
pub trait DeviceHandle: Send + Sync {
    fn stop(&self);
}

/// An opened capture device and the tracks it feeds.
///
/// Dropping the source stops it.
pub struct MediaSource {
    device_id: String,
    tracks: Vec<LocalTrack>,
    handle: Box<dyn DeviceHandle>,
    released: AtomicBool,
}

impl MediaSource {
    pub fn new(
        device_id: impl Into<String>,
        tracks: Vec<LocalTrack>,
        handle: Box<dyn DeviceHandle>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            tracks,
            handle,
            released: AtomicBool::new(false),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn is_stopped(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Stop every track and free the device. Idempotent.
    pub fn stop(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        for track in &self.tracks {
            track.stop();
        }
        self.handle.stop();
        info!("Released capture device '{}'", self.device_id);
    }
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSource")
            .field("device_id", &self.device_id)
            .field("tracks", &self.tracks.len())
            .field("released", &self.is_stopped())
            .finish()
    }
}

impl Drop for MediaSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Holds the single active capture source of a broadcaster.
pub struct MediaSourceAdapter {
    devices: Arc<dyn MediaDevices>,
    active: Option<MediaSource>,
}

impl MediaSourceAdapter {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            devices,
            active: None,
        }
    }

    pub fn devices(&self) -> &Arc<dyn MediaDevices> {
        &self.devices
    }

    /// Open `device_id`, releasing the current source first.
    pub async fn acquire(&mut self, device_id: &str) -> Result<&MediaSource, AcquisitionError> {
        self.release();
        let source = self.devices.open(device_id).await?;
        info!(
            "Acquired '{}' with {} track(s)",
            device_id,
            source.tracks().len()
        );
        Ok(self.active.insert(source))
    }

    /// Stop and drop the active source. Returns whether one was active.
    pub fn release(&mut self) -> bool {
        match self.active.take() {
            Some(source) => {
                source.stop();
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&MediaSource> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
