//! Camera acquisition state machine.
//!
//! Drives a [`CaptureBackend`] through `Inactive → Acquiring → Active` with
//! one relaxed-constraints retry after a constraint rejection, a bounded
//! wait for playback, and idempotent release. Exactly one stream is held
//! between `Active` entry and the next `release()`.

use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{CaptureBackend, CaptureStream, StreamConstraints};
use crate::error::CameraError;

/// How long a bound stream may take to start playback before acquisition
/// gives up and reports a timeout.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Status ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CameraStatus {
    #[default]
    Inactive,
    Acquiring,
    Active,
    Error,
}

impl CameraStatus {
    pub const ALL: [CameraStatus; 4] = [
        CameraStatus::Inactive,
        CameraStatus::Acquiring,
        CameraStatus::Active,
        CameraStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraStatus::Inactive => "inactive",
            CameraStatus::Acquiring => "acquiring",
            CameraStatus::Active => "active",
            CameraStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Controller ───────────────────────────────────────────────────

/// Owns the backend, the requested constraints, and the bound stream.
pub struct CameraController<B: CaptureBackend> {
    backend: B,
    constraints: StreamConstraints,
    init_timeout: Duration,
    status: CameraStatus,
    stream: Option<B::Stream>,
    last_failure: Option<String>,
}

impl<B: CaptureBackend> CameraController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            constraints: StreamConstraints::preferred(),
            init_timeout: DEFAULT_INIT_TIMEOUT,
            status: CameraStatus::Inactive,
            stream: None,
            last_failure: None,
        }
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: StreamConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    #[must_use]
    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    pub fn status(&self) -> CameraStatus {
        self.status
    }

    /// Display form of the most recent acquisition failure, if any.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn has_live_stream(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    /// Acquire a stream with the configured constraints. On a constraint
    /// rejection, retries once with every video constraint dropped; any
    /// other failure is terminal for this attempt. Releases whatever was
    /// previously held before trying.
    pub async fn acquire(&mut self) -> Result<(), CameraError> {
        self.release();
        self.status = CameraStatus::Acquiring;

        let requested = self.constraints.clone();
        let first = self.try_open(&requested).await;
        match first {
            Ok(stream) => {
                self.bind(stream);
                Ok(())
            }
            Err(err) if err.allows_constraint_fallback() && !requested.is_minimal() => {
                warn!(error = %err, "constraints rejected, retrying relaxed");
                let relaxed = StreamConstraints::fallback();
                let second = self.try_open(&relaxed).await;
                match second {
                    Ok(stream) => {
                        self.bind(stream);
                        Ok(())
                    }
                    Err(err) => self.fail(err),
                }
            }
            Err(err) => self.fail(err),
        }
    }

    /// Re-run acquisition with the original constraints. Only valid from
    /// `Error`; every other status is a caller mistake.
    pub async fn retry(&mut self) -> Result<(), CameraError> {
        if self.status != CameraStatus::Error {
            return Err(CameraError::RetryInvalid(self.status));
        }
        self.acquire().await
    }

    /// Stop the bound stream, if any, and return to `Inactive`. Safe to
    /// call in any status, any number of times.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
        self.status = CameraStatus::Inactive;
        self.last_failure = None;
    }

    async fn try_open(&self, constraints: &StreamConstraints) -> Result<B::Stream, CameraError> {
        let mut stream = self.backend.open_stream(constraints).await?;
        let started = tokio::time::timeout(self.init_timeout, stream.playback_started()).await;
        match started {
            Ok(Ok(())) => Ok(stream),
            Ok(Err(err)) => {
                stream.stop();
                Err(err)
            }
            Err(_elapsed) => {
                stream.stop();
                Err(CameraError::StartTimeout {
                    timeout: self.init_timeout,
                })
            }
        }
    }

    fn bind(&mut self, stream: B::Stream) {
        self.stream = Some(stream);
        self.status = CameraStatus::Active;
        self.last_failure = None;
        info!("camera stream active");
    }

    fn fail(&mut self, err: CameraError) -> Result<(), CameraError> {
        warn!(error = %err, hint = err.hint(), "camera acquisition failed");
        self.status = CameraStatus::Error;
        self.last_failure = Some(err.to_string());
        Err(err)
    }
}

// ─── Tests ────────────────────────────────────────────────────────
