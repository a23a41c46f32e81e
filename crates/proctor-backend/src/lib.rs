//! proctor-backend: gateway IO boundary.
//! JSON-RPC over a unix socket with newline-delimited frames. Every call
//! is deadline-bounded so a dead gateway degrades to offline mode instead
//! of stalling the session. No scoring logic lives here.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{BackendClient, DEFAULT_CALL_TIMEOUT};
pub use error::GatewayError;
pub use protocol::{
    AddEventParams, AddEventResult, BackendReport, EndSessionParams, EndSessionResult,
    EventPayload, GetReportParams, HealthResult, StartSessionParams, StartSessionResult,
};
