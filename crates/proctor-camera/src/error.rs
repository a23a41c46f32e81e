//! Error types for camera acquisition.

use std::time::Duration;

use thiserror::Error;

use crate::machine::CameraStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera access denied")]
    PermissionDenied,

    #[error("no camera device found")]
    NotFound,

    #[error("camera is in use by another application")]
    Busy,

    #[error("requested constraints unsatisfiable: {detail}")]
    ConstraintsUnsatisfiable { detail: String },

    #[error("camera stream did not start playback within {timeout:?}")]
    StartTimeout { timeout: Duration },

    #[error("camera device error: {0}")]
    Device(String),

    #[error("retry not allowed while camera is {0}")]
    RetryInvalid(CameraStatus),
}

impl CameraError {
    /// Remediation line shown to the operator alongside the error.
    pub fn hint(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => "Please check camera permissions.",
            CameraError::NotFound => "Connect a camera and retry.",
            CameraError::Busy => "Close other applications using the camera and retry.",
            CameraError::ConstraintsUnsatisfiable { .. } => {
                "The camera does not support the requested format."
            }
            CameraError::StartTimeout { .. } => "Check the camera connection and retry.",
            CameraError::Device(_) => "Check the camera and retry.",
            CameraError::RetryInvalid(_) => "Retry is only available after a camera error.",
        }
    }

    /// Whether acquisition may retry once with relaxed constraints.
    /// Only a constraint rejection qualifies; permission, missing-device,
    /// and busy failures are terminal for the attempt.
    pub fn allows_constraint_fallback(&self) -> bool {
        matches!(self, CameraError::ConstraintsUnsatisfiable { .. })
    }
}
