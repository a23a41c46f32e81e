//! Wire types for the backend gateway.
//! Method names plus camelCase parameter and result payloads; event kinds
//! and severities keep their SCREAMING_SNAKE_CASE wire form from
//! proctor-core.

use chrono::{DateTime, Utc};
use proctor_core::{EventKind, IntegrityEvent, Severity};
use serde::{Deserialize, Serialize};

pub const METHOD_START_SESSION: &str = "start_session";
pub const METHOD_END_SESSION: &str = "end_session";
pub const METHOD_ADD_EVENT: &str = "add_event";
pub const METHOD_GET_REPORT: &str = "get_report";
pub const METHOD_HEALTH_CHECK: &str = "health_check";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionParams {
    pub candidate_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResult {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionResult {
    pub success: bool,
}

/// One recorded event as the gateway stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub event_type: EventKind,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

impl EventPayload {
    pub fn from_event(event: &IntegrityEvent) -> Self {
        Self {
            event_type: event.kind,
            message: event.message.clone(),
            severity: event.severity,
            timestamp: event.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEventParams {
    pub session_id: String,
    pub event: EventPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEventResult {
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReportParams {
    pub session_id: String,
}

/// Gateway view of a finished session. Older gateways omit the event list,
/// so it defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendReport {
    pub integrity_score: u32,
    #[serde(default)]
    pub events: Vec<EventPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub status: String,
}
