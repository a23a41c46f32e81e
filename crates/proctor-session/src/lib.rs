//! proctor-session: session lifecycle orchestration.
//! One controller glues the camera state machine, the event aggregator,
//! and the gateway client, degrading to offline behavior whenever the
//! gateway is unreachable.

pub mod controller;

pub use controller::{SessionController, SessionError};
