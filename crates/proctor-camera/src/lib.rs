//! proctor-camera: camera hardware boundary.
//! Provides the capture backend seam, the device-node backend, and the
//! acquisition state machine with constraint fallback and init timeout.
//! No scoring or session logic lives here.

pub mod backend;
pub mod error;
pub mod machine;

pub use backend::{
    CaptureBackend, CaptureStream, DeviceCapture, DeviceStream, Facing, StreamConstraints,
};
pub use error::CameraError;
pub use machine::{CameraController, CameraStatus, DEFAULT_INIT_TIMEOUT};
