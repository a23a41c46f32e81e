//! Random detector feed standing in for a vision pipeline.

use std::time::Duration;

use chrono::Utc;
use proctor_core::{DetectorObservation, EventKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::debug;

/// Probability that any given tick emits an observation.
pub const DEFAULT_EVENT_CHANCE: f64 = 0.1;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Emits a uniformly random event kind on a fraction of ticks.
pub struct SimulatedDetector {
    interval: Duration,
    event_chance: f64,
    rng: StdRng,
}

impl SimulatedDetector {
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            event_chance: DEFAULT_EVENT_CHANCE,
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn with_event_chance(mut self, chance: f64) -> Self {
        self.event_chance = chance.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fixed seed for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Push observations until the receiver is dropped.
    pub async fn run(mut self, tx: mpsc::Sender<DetectorObservation>) {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            interval.tick().await;
            if self.rng.gen_range(0.0..1.0) >= self.event_chance {
                continue;
            }
            let kind = EventKind::ALL[self.rng.gen_range(0..EventKind::ALL.len())];
            let obs = DetectorObservation {
                kind,
                observed_at: Utc::now(),
            };
            if tx.send(obs).await.is_err() {
                debug!("observation channel closed, detector stopping");
                return;
            }
        }
    }
}

impl Default for SimulatedDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ────────────────────────────────────────────────────────
