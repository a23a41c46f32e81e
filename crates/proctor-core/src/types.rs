use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Event Kind & Severity ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum EventKind {
    LookingAway,
    NoFace,
    MultipleFaces,
    PhoneDetected,
    NotesDetected,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::LookingAway,
        Self::NoFace,
        Self::MultipleFaces,
        Self::PhoneDetected,
        Self::NotesDetected,
    ];

    /// Map event kind to its scoring severity.
    pub fn severity(self) -> Severity {
        match self {
            Self::NoFace | Self::MultipleFaces | Self::PhoneDetected => Severity::Danger,
            Self::LookingAway | Self::NotesDetected => Severity::Warning,
        }
    }

    /// Description recorded on every event of this kind.
    pub fn message(self) -> &'static str {
        match self {
            Self::LookingAway => "Candidate looking away from screen",
            Self::NoFace => "No face detected in frame",
            Self::MultipleFaces => "Multiple faces detected",
            Self::PhoneDetected => "Mobile phone detected",
            Self::NotesDetected => "Books/notes detected",
        }
    }

    /// Short label used in report summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::LookingAway => "Looking Away",
            Self::NoFace => "Face Not Found",
            Self::MultipleFaces => "Multiple Faces",
            Self::PhoneDetected => "Phone Detected",
            Self::NotesDetected => "Notes Detected",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LookingAway => "LOOKING_AWAY",
            Self::NoFace => "NO_FACE",
            Self::MultipleFaces => "MULTIPLE_FACES",
            Self::PhoneDetected => "PHONE_DETECTED",
            Self::NotesDetected => "NOTES_DETECTED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ProctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOOKING_AWAY" => Ok(Self::LookingAway),
            "NO_FACE" => Ok(Self::NoFace),
            "MULTIPLE_FACES" => Ok(Self::MultipleFaces),
            "PHONE_DETECTED" => Ok(Self::PhoneDetected),
            "NOTES_DETECTED" => Ok(Self::NotesDetected),
            _ => Err(ProctorError::UnknownEventKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Danger,
}

impl Severity {
    pub const ALL: [Self; 2] = [Self::Warning, Self::Danger];

    /// Points deducted from the integrity score per event of this severity.
    pub fn penalty(self) -> u32 {
        match self {
            Self::Warning => 5,
            Self::Danger => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Danger => "DANGER",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ProctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WARNING" => Ok(Self::Warning),
            "DANGER" => Ok(Self::Danger),
            _ => Err(ProctorError::UnknownSeverity(s.to_string())),
        }
    }
}

// ─── Events ───────────────────────────────────────────────────────

/// A recorded violation observation. Entries are append-only: once in the
/// log, id/kind/timestamp never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityEvent {
    /// Unique within a session, monotonically increasing, time-based.
    pub id: u64,
    pub kind: EventKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// What a detector emits: a kind plus capture time. The aggregator assigns
/// the id and derives severity/message when recording it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorObservation {
    pub kind: EventKind,
    pub observed_at: DateTime<Utc>,
}

// ─── Live Detection Status ────────────────────────────────────────

/// Snapshot of the currently active detections. Derived from the decay
/// state, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveDetectionStatus {
    pub face_detected: bool,
    pub looking_away: bool,
    pub multiple_faces: bool,
    pub phone_detected: bool,
    pub notes_detected: bool,
}

impl LiveDetectionStatus {
    /// The quiescent status: face present, nothing flagged.
    pub fn all_clear() -> Self {
        Self {
            face_detected: true,
            looking_away: false,
            multiple_faces: false,
            phone_detected: false,
            notes_detected: false,
        }
    }

    pub fn any_active(&self) -> bool {
        !self.face_detected
            || self.looking_away
            || self.multiple_faces
            || self.phone_detected
            || self.notes_detected
    }
}

impl Default for LiveDetectionStatus {
    fn default() -> Self {
        Self::all_clear()
    }
}

// ─── Session ──────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotStarted,
    Active,
    Ended,
}

impl SessionState {
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::Active, Self::Ended];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session metadata. State only moves forward: NotStarted → Active →
/// Ended. A new session means a new value, never a reused one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub candidate_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub duration_seconds: u64,
    pub state: SessionState,
}

impl Session {
    /// Fresh pre-start session with no identity yet.
    pub fn not_started() -> Self {
        Self::default()
    }
}

/// Locally generated session identifier, used when the backend cannot
/// assign one. Epoch milliseconds keep successive ids monotonic.
pub fn local_session_id(now: DateTime<Utc>) -> String {
    format!("session_{}", now.timestamp_millis().max(0))
}

// ─── Error ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProctorError {
    UnknownEventKind(String),
    UnknownSeverity(String),
}

impl fmt::Display for ProctorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEventKind(s) => write!(f, "unknown event kind: {s}"),
            Self::UnknownSeverity(s) => write!(f, "unknown severity: {s}"),
        }
    }
}

impl std::error::Error for ProctorError {}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid RFC3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn event_kind_serde_roundtrip() {
        for k in EventKind::ALL {
            let json = serde_json::to_string(&k).expect("serialize");
            let back: EventKind = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(k, back);
        }
    }

    #[test]
    fn event_kind_wire_form_is_screaming_snake() {
        let json = serde_json::to_string(&EventKind::LookingAway).expect("serialize");
        assert_eq!(json, "\"LOOKING_AWAY\"");
        let json = serde_json::to_string(&Severity::Danger).expect("serialize");
        assert_eq!(json, "\"DANGER\"");
    }

    #[test]
    fn event_kind_severity_mapping() {
        assert_eq!(EventKind::NoFace.severity(), Severity::Danger);
        assert_eq!(EventKind::MultipleFaces.severity(), Severity::Danger);
        assert_eq!(EventKind::PhoneDetected.severity(), Severity::Danger);
        assert_eq!(EventKind::LookingAway.severity(), Severity::Warning);
        assert_eq!(EventKind::NotesDetected.severity(), Severity::Warning);
    }

    #[test]
    fn event_kind_display_and_parse() {
        for k in EventKind::ALL {
            let s = k.to_string();
            let parsed = s.parse::<EventKind>().expect("parse");
            assert_eq!(k, parsed);
        }
        assert!("FACE_SWAP".parse::<EventKind>().is_err());
    }

    #[test]
    fn severity_penalties() {
        assert_eq!(Severity::Warning.penalty(), 5);
        assert_eq!(Severity::Danger.penalty(), 10);
    }

    #[test]
    fn messages_are_fixed_per_kind() {
        assert_eq!(
            EventKind::LookingAway.message(),
            "Candidate looking away from screen"
        );
        assert_eq!(EventKind::NoFace.message(), "No face detected in frame");
        assert_eq!(EventKind::PhoneDetected.message(), "Mobile phone detected");
        assert_eq!(EventKind::NotesDetected.message(), "Books/notes detected");
    }

    #[test]
    fn live_status_default_is_all_clear() {
        let status = LiveDetectionStatus::default();
        assert!(status.face_detected);
        assert!(!status.any_active());
    }

    #[test]
    fn session_state_default_and_display() {
        assert_eq!(SessionState::default(), SessionState::NotStarted);
        assert_eq!(SessionState::Active.to_string(), "active");
    }

    #[test]
    fn local_session_id_uses_epoch_millis() {
        let now = ts("2026-02-25T12:00:00Z");
        let id = local_session_id(now);
        assert_eq!(id, format!("session_{}", now.timestamp_millis()));
        assert!(id.starts_with("session_"));
    }

    #[test]
    fn integrity_event_serde_roundtrip() {
        let event = IntegrityEvent {
            id: 1_774_440_000_000,
            kind: EventKind::PhoneDetected,
            severity: EventKind::PhoneDetected.severity(),
            message: EventKind::PhoneDetected.message().to_string(),
            timestamp: ts("2026-02-25T12:00:00Z"),
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let back: IntegrityEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(event, back);
    }

    #[test]
    fn error_display() {
        let err = ProctorError::UnknownEventKind("FACE_SWAP".into());
        assert!(err.to_string().contains("FACE_SWAP"));
    }
}
