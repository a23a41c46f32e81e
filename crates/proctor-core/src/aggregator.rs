//! Append-only event log, monotonic id assignment, and the integrity score.
//!
//! The log is the single source of truth: the score is recomputed from it
//! on every call, and the live flags derive from the decay state fed by the
//! same appends. Nothing keeps a counter that could drift from the log.

use chrono::{DateTime, Utc};

use crate::live::LiveDetectionState;
use crate::types::{DetectorObservation, IntegrityEvent, LiveDetectionStatus};

/// Score a session starts with before any deductions.
pub const BASE_SCORE: u32 = 100;

/// Integrity score over an event log: [`BASE_SCORE`] minus per-severity
/// penalties, floored at zero.
pub fn integrity_score(events: &[IntegrityEvent]) -> u32 {
    let penalty: u32 = events.iter().map(|e| e.severity.penalty()).sum();
    BASE_SCORE.saturating_sub(penalty)
}

/// Owns the event log and the live decay state for one session.
#[derive(Debug, Clone, Default)]
pub struct EventAggregator {
    events: Vec<IntegrityEvent>,
    live: LiveDetectionState,
    last_id: u64,
}

impl EventAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation: assigns the next id, derives severity and
    /// message from the kind, appends to the log, and restarts that kind's
    /// decay window. Returns the recorded event.
    pub fn ingest(&mut self, obs: DetectorObservation) -> IntegrityEvent {
        let id = next_event_id(self.last_id, obs.observed_at);
        self.last_id = id;

        let event = IntegrityEvent {
            id,
            kind: obs.kind,
            severity: obs.kind.severity(),
            message: obs.kind.message().to_string(),
            timestamp: obs.observed_at,
        };

        self.live.observe(obs.kind, obs.observed_at);
        self.events.push(event.clone());
        event
    }

    /// Current score, recomputed from the full log.
    pub fn score(&self) -> u32 {
        integrity_score(&self.events)
    }

    /// The append log in insertion (= chronological) order.
    pub fn events(&self) -> &[IntegrityEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Live detection flags evaluated at `now`.
    pub fn live_status(&self, now: DateTime<Utc>) -> LiveDetectionStatus {
        self.live.snapshot(now)
    }

    /// The last `n` events, newest first.
    pub fn recent(&self, n: usize) -> Vec<&IntegrityEvent> {
        self.events.iter().rev().take(n).collect()
    }

    /// Drop the log and all decay windows.
    pub fn clear(&mut self) {
        self.events.clear();
        self.live.clear();
        self.last_id = 0;
    }
}

/// Time-based id: epoch milliseconds of the event, bumped past the previous
/// id when two events land in the same millisecond (or arrive out of order).
fn next_event_id(last_id: u64, at: DateTime<Utc>) -> u64 {
    let millis = at.timestamp_millis().max(0) as u64;
    millis.max(last_id + 1)
}

// ─── Tests ────────────────────────────────────────────────────────
