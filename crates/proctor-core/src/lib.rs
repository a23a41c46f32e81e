//! proctor-core: data model and pure logic for the proctoring session engine.
//! Event kinds and severities, the append-only event log with its integrity
//! score, per-kind live-detection decay, and the final report builder.
//! No IO and no async; time always enters as a parameter.

pub mod aggregator;
pub mod live;
pub mod report;
pub mod types;

pub use aggregator::{BASE_SCORE, EventAggregator, integrity_score};
pub use live::{DECAY_WINDOW_SECS, LiveDetectionState};
pub use report::{EventCounts, Report, ScoreBand, band_for, build_report, format_duration};
pub use types::{
    DetectorObservation, EventKind, IntegrityEvent, LiveDetectionStatus, ProctorError, Session,
    SessionState, Severity, local_session_id,
};
