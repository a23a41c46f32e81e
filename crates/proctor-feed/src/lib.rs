//! proctor-feed: detector observation sources.
//! A seedable random feed for demo runs and a scripted feed for
//! deterministic ones. Both push observations into an mpsc channel and
//! stop when the receiver goes away.

pub mod scripted;
pub mod simulated;

pub use scripted::{ScriptEntry, ScriptedDetector};
pub use simulated::{DEFAULT_EVENT_CHANCE, SimulatedDetector};
