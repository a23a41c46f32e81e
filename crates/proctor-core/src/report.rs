//! Final report assembly: score banding, per-kind tallies, and the
//! serializable [`Report`] handed to renderers.
//!
//! Everything here is pure. The caller decides which score to pass in
//! (locally recomputed or backend-confirmed); this module only clamps,
//! bands, and packages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregator::BASE_SCORE;
use crate::types::{EventKind, IntegrityEvent, Session};

// ─── Score band ───────────────────────────────────────────────────

/// Qualitative band a final score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 4] = [
        ScoreBand::Excellent,
        ScoreBand::Good,
        ScoreBand::Fair,
        ScoreBand::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band for a score: >= 80 Excellent, >= 60 Good, >= 40 Fair, else Poor.
pub fn band_for(score: u32) -> ScoreBand {
    match score {
        80.. => ScoreBand::Excellent,
        60.. => ScoreBand::Good,
        40.. => ScoreBand::Fair,
        _ => ScoreBand::Poor,
    }
}

// ─── Duration formatting ──────────────────────────────────────────

/// Whole-minutes "M:SS" rendering. Minutes are not capped, so an hour-long
/// session reads "61:01" rather than rolling over.
pub fn format_duration(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ─── Per-kind tallies ─────────────────────────────────────────────

/// How many events of each kind the log holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub looking_away: usize,
    pub no_face: usize,
    pub multiple_faces: usize,
    pub phone_detected: usize,
    pub notes_detected: usize,
}

impl EventCounts {
    pub fn tally(events: &[IntegrityEvent]) -> Self {
        let mut counts = Self::default();
        for event in events {
            match event.kind {
                EventKind::LookingAway => counts.looking_away += 1,
                EventKind::NoFace => counts.no_face += 1,
                EventKind::MultipleFaces => counts.multiple_faces += 1,
                EventKind::PhoneDetected => counts.phone_detected += 1,
                EventKind::NotesDetected => counts.notes_detected += 1,
            }
        }
        counts
    }

    pub fn for_kind(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::LookingAway => self.looking_away,
            EventKind::NoFace => self.no_face,
            EventKind::MultipleFaces => self.multiple_faces,
            EventKind::PhoneDetected => self.phone_detected,
            EventKind::NotesDetected => self.notes_detected,
        }
    }

    pub fn total(&self) -> usize {
        self.looking_away
            + self.no_face
            + self.multiple_faces
            + self.phone_detected
            + self.notes_detected
    }
}

// ─── Report ───────────────────────────────────────────────────────

/// Everything a renderer needs for the end-of-session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub candidate_name: String,
    pub session_id: String,
    pub duration: String,
    pub duration_seconds: u64,
    pub generated_at: DateTime<Utc>,
    pub integrity_score: u32,
    pub band: ScoreBand,
    pub counts: EventCounts,
    pub events: Vec<IntegrityEvent>,
}

/// Assemble a report from session metadata, the full event log, and the
/// score the caller settled on. Scores above [`BASE_SCORE`] are clamped.
pub fn build_report(
    session: &Session,
    events: &[IntegrityEvent],
    score: u32,
    now: DateTime<Utc>,
) -> Report {
    let score = score.min(BASE_SCORE);
    Report {
        candidate_name: session.candidate_name.clone(),
        session_id: session.session_id.clone(),
        duration: format_duration(session.duration_seconds),
        duration_seconds: session.duration_seconds,
        generated_at: now,
        integrity_score: score,
        band: band_for(score),
        counts: EventCounts::tally(events),
        events: events.to_vec(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────
