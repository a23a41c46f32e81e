//! Per-kind decay of the live detection flags.
//!
//! Each event kind holds its flag for [`DECAY_WINDOW_SECS`] from that
//! kind's most recent event, independently of every other kind: a later
//! `PhoneDetected` never extends an earlier `LookingAway`, and a repeat of
//! the same kind restarts only that kind's window. The state is pure:
//! callers pass `now` and read a snapshot; nothing here schedules timers.

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::{EventKind, LiveDetectionStatus};

/// Seconds a detection flag stays raised after its triggering event.
pub const DECAY_WINDOW_SECS: i64 = 3;

/// Last-seen timestamp per event kind, indexed by [`EventKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveDetectionState {
    last_seen: [Option<DateTime<Utc>>; EventKind::ALL.len()],
}

impl LiveDetectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event of `kind` at `at`, restarting that kind's window.
    /// An out-of-order timestamp never shortens an existing window.
    pub fn observe(&mut self, kind: EventKind, at: DateTime<Utc>) {
        let slot = &mut self.last_seen[kind_index(kind)];
        if slot.is_none_or(|prev| at > prev) {
            *slot = Some(at);
        }
    }

    /// Whether `kind`'s flag is still raised at `now`. The flag drops at
    /// exactly `event_time + DECAY_WINDOW_SECS`.
    pub fn is_active(&self, kind: EventKind, now: DateTime<Utc>) -> bool {
        self.last_seen[kind_index(kind)].is_some_and(|seen| {
            let elapsed = now.signed_duration_since(seen);
            elapsed >= TimeDelta::zero() && elapsed < TimeDelta::seconds(DECAY_WINDOW_SECS)
        })
    }

    /// Evaluate all flags at `now`. `face_detected` is the inverse of an
    /// unexpired `NoFace`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> LiveDetectionStatus {
        LiveDetectionStatus {
            face_detected: !self.is_active(EventKind::NoFace, now),
            looking_away: self.is_active(EventKind::LookingAway, now),
            multiple_faces: self.is_active(EventKind::MultipleFaces, now),
            phone_detected: self.is_active(EventKind::PhoneDetected, now),
            notes_detected: self.is_active(EventKind::NotesDetected, now),
        }
    }

    /// Drop all windows, returning to the all-clear status.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn kind_index(kind: EventKind) -> usize {
    match kind {
        EventKind::LookingAway => 0,
        EventKind::NoFace => 1,
        EventKind::MultipleFaces => 2,
        EventKind::PhoneDetected => 3,
        EventKind::NotesDetected => 4,
    }
}

// ─── Tests ────────────────────────────────────────────────────────
