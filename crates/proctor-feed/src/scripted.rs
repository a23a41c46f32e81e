//! Deterministic detector feed driven by a fixed script.

use std::time::Duration;

use chrono::Utc;
use proctor_core::{DetectorObservation, EventKind};
use tokio::sync::mpsc;
use tracing::debug;

/// One scripted observation, fired `at_seconds` after the feed starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEntry {
    pub at_seconds: u64,
    pub kind: EventKind,
}

/// Replays a script of observations on a fixed schedule.
pub struct ScriptedDetector {
    entries: Vec<ScriptEntry>,
}

impl ScriptedDetector {
    /// Entries are replayed in time order regardless of input order.
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by_key(|e| e.at_seconds);
        Self { entries }
    }

    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Deliver every entry at its offset, then finish. Stops early when
    /// the receiver is dropped.
    pub async fn run(self, tx: mpsc::Sender<DetectorObservation>) {
        let started = tokio::time::Instant::now();
        for entry in self.entries {
            tokio::time::sleep_until(started + Duration::from_secs(entry.at_seconds)).await;
            let obs = DetectorObservation {
                kind: entry.kind,
                observed_at: Utc::now(),
            };
            if tx.send(obs).await.is_err() {
                debug!("observation channel closed, script abandoned");
                return;
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── 1. Entries replay in time order ─────────────────────────────

    #[test]
    fn entries_sort_by_offset() {
        let detector = ScriptedDetector::new(vec![
            ScriptEntry {
                at_seconds: 3,
                kind: EventKind::PhoneDetected,
            },
            ScriptEntry {
                at_seconds: 0,
                kind: EventKind::NoFace,
            },
        ]);

        assert_eq!(detector.entries()[0].at_seconds, 0);
        assert_eq!(detector.entries()[1].at_seconds, 3);
    }

    // ── 2. Immediate entries deliver in order ───────────────────────

    #[tokio::test]
    async fn immediate_entries_deliver_in_order() {
        let detector = ScriptedDetector::new(vec![
            ScriptEntry {
                at_seconds: 0,
                kind: EventKind::LookingAway,
            },
            ScriptEntry {
                at_seconds: 0,
                kind: EventKind::NotesDetected,
            },
        ]);
        let (tx, mut rx) = mpsc::channel(4);
        tokio::spawn(detector.run(tx));

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("first entry")
            .expect("channel open");
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("second entry")
            .expect("channel open");

        assert_eq!(first.kind, EventKind::LookingAway);
        assert_eq!(second.kind, EventKind::NotesDetected);
        assert!(rx.recv().await.is_none());
    }

    // ── 3. Empty script completes at once ───────────────────────────

    #[tokio::test]
    async fn empty_script_completes() {
        let detector = ScriptedDetector::new(Vec::new());
        let (tx, _rx) = mpsc::channel(1);
        let handle = tokio::spawn(detector.run(tx));

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("script finishes")
            .expect("task not panicked");
    }

    // ── 4. Dropped receiver abandons the script ─────────────────────

    #[tokio::test]
    async fn dropped_receiver_abandons_script() {
        let detector = ScriptedDetector::new(vec![
            ScriptEntry {
                at_seconds: 0,
                kind: EventKind::NoFace,
            },
            ScriptEntry {
                at_seconds: 0,
                kind: EventKind::NoFace,
            },
        ]);
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(detector.run(tx));

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("first entry")
            .expect("channel open");
        assert_eq!(first.kind, EventKind::NoFace);
        drop(rx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("script stops early")
            .expect("task not panicked");
    }
}
