//! Capture backend seam and the device-node backend.
//! The seam keeps hardware behind a trait so the state machine tests run
//! against fakes; `DeviceCapture` is the real implementation.

use async_trait::async_trait;

use crate::error::CameraError;

// ─── Stream constraints ───────────────────────────────────────────

/// Which way a camera faces, for multi-camera devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    User,
    Environment,
}

/// Requested stream parameters.
///
/// `preferred()` is what a session asks for first; `fallback()` drops every
/// video constraint and lets the device pick, used for the single relaxed
/// retry after a constraint rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub facing: Option<Facing>,
    pub audio: bool,
}

impl StreamConstraints {
    pub fn preferred() -> Self {
        Self {
            width: Some(1280),
            height: Some(720),
            facing: None,
            audio: true,
        }
    }

    pub fn fallback() -> Self {
        Self {
            width: None,
            height: None,
            facing: None,
            audio: true,
        }
    }

    /// True when no video constraint is set, i.e. nothing left to relax.
    pub fn is_minimal(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.facing.is_none()
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::preferred()
    }
}

// ─── Seam ─────────────────────────────────────────────────────────

/// A bound media stream. Enables mock injection for state machine tests.
#[async_trait]
pub trait CaptureStream: Send {
    /// Resolves once frames are flowing, or fails with the reason.
    /// The caller bounds this with a timeout.
    async fn playback_started(&mut self) -> Result<(), CameraError>;

    /// Stop all tracks and free the device. Idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Opens capture streams for a piece of hardware.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    type Stream: CaptureStream;

    async fn open_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Self::Stream, CameraError>;
}

// ─── Device backend ───────────────────────────────────────────────

/// Backend for a V4L-style device node. Opening the node is the probe:
/// the kernel reports permission, absence, and busy conditions at open
/// time. Resolution is never negotiated here, so this backend never
/// raises a constraint rejection itself.
#[derive(Debug, Clone)]
pub struct DeviceCapture {
    device: String,
}

impl DeviceCapture {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Default for DeviceCapture {
    fn default() -> Self {
        Self::new("/dev/video0")
    }
}

#[async_trait]
impl CaptureBackend for DeviceCapture {
    type Stream = DeviceStream;

    async fn open_stream(
        &self,
        _constraints: &StreamConstraints,
    ) -> Result<DeviceStream, CameraError> {
        let device = self.device.clone();
        let opened =
            tokio::task::spawn_blocking(move || std::fs::OpenOptions::new().read(true).open(device))
                .await;
        let file = match opened {
            Ok(Ok(file)) => file,
            Ok(Err(err)) => return Err(classify_open_error(&self.device, &err)),
            Err(join_err) => return Err(CameraError::Device(join_err.to_string())),
        };
        Ok(DeviceStream {
            device: self.device.clone(),
            file: Some(file),
        })
    }
}

fn classify_open_error(device: &str, err: &std::io::Error) -> CameraError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
        std::io::ErrorKind::NotFound => CameraError::NotFound,
        std::io::ErrorKind::ResourceBusy => CameraError::Busy,
        _ => CameraError::Device(format!("{device}: {err}")),
    }
}

/// Stream over an open device node. The held descriptor is the track:
/// dropping it is what frees the device for other processes.
#[derive(Debug)]
pub struct DeviceStream {
    device: String,
    file: Option<std::fs::File>,
}

#[async_trait]
impl CaptureStream for DeviceStream {
    async fn playback_started(&mut self) -> Result<(), CameraError> {
        if self.file.is_some() {
            Ok(())
        } else {
            Err(CameraError::Device(format!(
                "{}: stream already stopped",
                self.device
            )))
        }
    }

    fn stop(&mut self) {
        self.file = None;
    }

    fn is_live(&self) -> bool {
        self.file.is_some()
    }
}

// ─── Tests ────────────────────────────────────────────────────────
