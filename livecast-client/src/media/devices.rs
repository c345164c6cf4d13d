use crate::media::{
    AcquisitionError, AcquisitionErrorKind, DeviceHandle, LocalTrack, MediaKind, MediaSource,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub label: String,
}

/// Capture backend of the platform.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Video input devices, sorted by id.
    async fn enumerate(&self) -> Vec<DeviceInfo>;

    /// Open the device with its video track and the default microphone.
    async fn open(&self, device_id: &str) -> Result<MediaSource, AcquisitionError>;
}

struct VirtualDevice {
    label: String,
    permission_denied: bool,
    in_use: Arc<AtomicBool>,
}

/// In-process devices producing VP8 video and Opus audio sample tracks.
///
/// Each device can be opened by one source at a time; a second open reports
/// it busy until the first source is released.
#[derive(Clone, Default)]
pub struct VirtualDevices {
    devices: Arc<DashMap<String, VirtualDevice>>,
}

impl VirtualDevices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let devices = Self::new();
        for id in ids {
            let id = id.into();
            devices.add(&id, &format!("Camera {}", id));
        }
        devices
    }

    pub fn add(&self, device_id: &str, label: &str) {
        self.devices.insert(
            device_id.to_owned(),
            VirtualDevice {
                label: label.to_owned(),
                permission_denied: false,
                in_use: Arc::new(AtomicBool::new(false)),
            },
        );
    }

    pub fn deny_permission(&self, device_id: &str) {
        if let Some(mut device) = self.devices.get_mut(device_id) {
            device.permission_denied = true;
        }
    }

    /// Mark the device as held by another application.
    pub fn occupy(&self, device_id: &str) {
        if let Some(device) = self.devices.get(device_id) {
            device.in_use.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_in_use(&self, device_id: &str) -> bool {
        self.devices
            .get(device_id)
            .map(|d| d.in_use.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

struct VirtualDeviceHandle {
    in_use: Arc<AtomicBool>,
}

impl DeviceHandle for VirtualDeviceHandle {
    fn stop(&self) {
        self.in_use.store(false, Ordering::SeqCst);
    }
}

fn sample_track(kind: MediaKind, device_id: &str) -> LocalTrack {
    let capability = match kind {
        MediaKind::Video => RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            clock_rate: 90000,
            ..Default::default()
        },
        MediaKind::Audio => RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            clock_rate: 48000,
            channels: 2,
            sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
            ..Default::default()
        },
    };
    let id = match kind {
        MediaKind::Video => "video",
        MediaKind::Audio => "audio",
    };
    let track = TrackLocalStaticSample::new(
        capability,
        id.to_owned(),
        format!("livecast-{}", device_id),
    );
    LocalTrack::new(kind, Arc::new(track))
}

#[async_trait]
impl MediaDevices for VirtualDevices {
    async fn enumerate(&self) -> Vec<DeviceInfo> {
        let mut list: Vec<DeviceInfo> = self
            .devices
            .iter()
            .map(|entry| DeviceInfo {
                device_id: entry.key().clone(),
                label: entry.value().label.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        list
    }

    async fn open(&self, device_id: &str) -> Result<MediaSource, AcquisitionError> {
        let Some(device) = self.devices.get(device_id) else {
            return Err(AcquisitionError::new(device_id, AcquisitionErrorKind::NotFound));
        };
        if device.permission_denied {
            return Err(AcquisitionError::new(
                device_id,
                AcquisitionErrorKind::PermissionDenied,
            ));
        }
        if device.in_use.swap(true, Ordering::SeqCst) {
            return Err(AcquisitionError::new(
                device_id,
                AcquisitionErrorKind::DeviceBusy,
            ));
        }

        let tracks = vec![
            sample_track(MediaKind::Video, device_id),
            sample_track(MediaKind::Audio, device_id),
        ];
        let handle = VirtualDeviceHandle {
            in_use: device.in_use.clone(),
        };
        Ok(MediaSource::new(device_id, tracks, Box::new(handle)))
    }
}
