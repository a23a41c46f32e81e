//! Session lifecycle controller: `NotStarted → Active → Ended`.
//!
//! Every mutation funnels through this type; the caller's select loop
//! serializes detector arrivals, ticks, and shutdown against each other.
//! Gateway failures never propagate past this boundary: each call has a
//! local fallback and at worst a warn log.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use proctor_backend::BackendClient;
use proctor_camera::{CameraController, CameraError, CameraStatus, CaptureBackend};
use proctor_core::{
    BASE_SCORE, DetectorObservation, EventAggregator, IntegrityEvent, LiveDetectionStatus,
    Report, Session, SessionState, build_report, local_session_id,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("candidate name must not be empty")]
    InvalidInput,

    #[error("session already started")]
    AlreadyStarted,

    #[error("no active session")]
    NotActive,

    #[error("cannot reset while a session is active")]
    ResetWhileActive,

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Owns the session record, the camera, the event log, and the gateway
/// client.
pub struct SessionController<B: CaptureBackend> {
    session: Session,
    camera: CameraController<B>,
    aggregator: EventAggregator,
    gateway: BackendClient,
}

impl<B: CaptureBackend> SessionController<B> {
    pub fn new(camera: CameraController<B>, gateway: BackendClient) -> Self {
        Self {
            session: Session::not_started(),
            camera,
            aggregator: EventAggregator::new(),
            gateway,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> u32 {
        self.aggregator.score()
    }

    pub fn events(&self) -> &[IntegrityEvent] {
        self.aggregator.events()
    }

    /// The last `n` events, newest first, for the live console.
    pub fn recent_events(&self, n: usize) -> Vec<&IntegrityEvent> {
        self.aggregator.recent(n)
    }

    pub fn live_status(&self, now: DateTime<Utc>) -> LiveDetectionStatus {
        self.aggregator.live_status(now)
    }

    pub fn camera_status(&self) -> CameraStatus {
        self.camera.status()
    }

    /// Display form of the most recent camera failure, if any.
    pub fn camera_failure(&self) -> Option<&str> {
        self.camera.last_failure()
    }

    /// Advisory reachability probe. Logs the outcome and never blocks the
    /// flow beyond the client deadline.
    pub async fn probe_backend(&self) -> bool {
        match self.gateway.health_check().await {
            Ok(_) => {
                info!("backend connection established");
                true
            }
            Err(err) => {
                warn!(error = %err, "backend unreachable; running in offline mode");
                false
            }
        }
    }

    /// Begin a session: allocate an id (gateway first, local fallback),
    /// acquire the camera, then go `Active`. On camera failure the state
    /// stays `NotStarted`; a gateway-allocated session is left as is.
    pub async fn start(
        &mut self,
        candidate_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let name = candidate_name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidInput);
        }
        if self.session.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }

        let session_id = match self.gateway.start_session(name).await {
            Ok(result) => result.session_id,
            Err(err) => {
                warn!(error = %err, "gateway start failed, using local session id");
                local_session_id(now)
            }
        };

        if let Err(err) = self.camera.acquire().await {
            debug!(session_id = %session_id, "camera failed, leaving backend session orphaned");
            return Err(err.into());
        }

        self.session = Session {
            session_id,
            candidate_name: name.to_string(),
            started_at: Some(now),
            duration_seconds: 0,
            state: SessionState::Active,
        };
        info!(
            session_id = %self.session.session_id,
            candidate = %self.session.candidate_name,
            "session started"
        );
        Ok(())
    }

    /// One second of recording elapsed. The sole driver of duration
    /// accounting; ignored outside `Active`.
    pub fn tick(&mut self) {
        if self.session.state != SessionState::Active {
            debug!(state = %self.session.state, "tick ignored outside active session");
            return;
        }
        self.session.duration_seconds += 1;
    }

    /// Record a detector observation and forward it to the gateway
    /// best-effort. Returns the recorded event, or `None` when no session
    /// is active.
    pub async fn ingest(&mut self, obs: DetectorObservation) -> Option<IntegrityEvent> {
        if self.session.state != SessionState::Active {
            debug!(kind = %obs.kind, "observation dropped outside active session");
            return None;
        }

        let event = self.aggregator.ingest(obs);
        if let Err(err) = self
            .gateway
            .add_event(&self.session.session_id, &event)
            .await
        {
            debug!(error = %err, "event forward failed, keeping local copy");
        }
        Some(event)
    }

    /// End the session and build the final report. The camera is released
    /// before any gateway call so a slow gateway never keeps the device
    /// held. The gateway's score is honored when it answers; the event
    /// list always comes from the local log.
    pub async fn stop(&mut self, now: DateTime<Utc>) -> Result<Report, SessionError> {
        if self.session.state != SessionState::Active {
            return Err(SessionError::NotActive);
        }

        self.camera.release();

        let session_id = self.session.session_id.clone();
        if let Err(err) = self.gateway.end_session(&session_id).await {
            debug!(error = %err, "gateway end failed");
        }

        let score = match self.gateway.get_report(&session_id).await {
            Ok(remote) => remote.integrity_score.min(BASE_SCORE),
            Err(err) => {
                warn!(error = %err, "gateway report unavailable, scoring locally");
                self.aggregator.score()
            }
        };

        self.session.state = SessionState::Ended;
        let report = build_report(&self.session, self.aggregator.events(), score, now);
        info!(session_id = %session_id, score = report.integrity_score, "session ended");
        Ok(report)
    }

    /// Clear everything for a fresh session. Valid from `Ended` or
    /// `NotStarted` only.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.session.state == SessionState::Active {
            return Err(SessionError::ResetWhileActive);
        }
        self.camera.release();
        self.aggregator.clear();
        self.session = Session::not_started();
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────
