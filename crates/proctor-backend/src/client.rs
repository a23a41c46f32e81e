//! UDS JSON-RPC client for the backend gateway.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

use proctor_core::IntegrityEvent;

use crate::error::GatewayError;
use crate::protocol::{
    AddEventParams, AddEventResult, BackendReport, EndSessionParams, EndSessionResult,
    EventPayload, GetReportParams, HealthResult, METHOD_ADD_EVENT, METHOD_END_SESSION,
    METHOD_GET_REPORT, METHOD_HEALTH_CHECK, METHOD_START_SESSION, StartSessionParams,
    StartSessionResult,
};

/// Per-call deadline. A dead gateway must degrade to offline mode within
/// this bound instead of stalling the session path.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct BackendClient {
    socket_path: String,
    call_timeout: Duration,
}

impl BackendClient {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    pub async fn start_session(
        &self,
        candidate_name: &str,
    ) -> Result<StartSessionResult, GatewayError> {
        let params = encode(StartSessionParams {
            candidate_name: candidate_name.to_string(),
        })?;
        parse_result(self.call(METHOD_START_SESSION, params).await?)
    }

    pub async fn end_session(&self, session_id: &str) -> Result<EndSessionResult, GatewayError> {
        let params = encode(EndSessionParams {
            session_id: session_id.to_string(),
        })?;
        parse_result(self.call(METHOD_END_SESSION, params).await?)
    }

    pub async fn add_event(
        &self,
        session_id: &str,
        event: &IntegrityEvent,
    ) -> Result<AddEventResult, GatewayError> {
        let params = encode(AddEventParams {
            session_id: session_id.to_string(),
            event: EventPayload::from_event(event),
        })?;
        parse_result(self.call(METHOD_ADD_EVENT, params).await?)
    }

    pub async fn get_report(&self, session_id: &str) -> Result<BackendReport, GatewayError> {
        let params = encode(GetReportParams {
            session_id: session_id.to_string(),
        })?;
        parse_result(self.call(METHOD_GET_REPORT, params).await?)
    }

    pub async fn health_check(&self) -> Result<HealthResult, GatewayError> {
        parse_result(self.call(METHOD_HEALTH_CHECK, serde_json::json!({})).await?)
    }

    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        debug!(method, socket = %self.socket_path, "gateway call");
        match tokio::time::timeout(self.call_timeout, self.call_inner(method, params)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(GatewayError::Deadline(self.call_timeout)),
        }
    }

    async fn call_inner(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            GatewayError::Unreachable {
                socket_path: self.socket_path.clone(),
                detail: e.to_string(),
            }
        })?;

        let (reader, mut writer) = stream.into_split();

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });
        let mut line = request.to_string();
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.shutdown().await?;

        let mut reader = BufReader::new(reader);
        let mut response_line = String::new();
        reader.read_line(&mut response_line).await?;

        let response: serde_json::Value = serde_json::from_str(response_line.trim())
            .map_err(|e| GatewayError::Protocol(format!("invalid response json: {e}")))?;

        if let Some(error) = response.get("error") {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown gateway error")
                .to_string();
            return Err(GatewayError::Rpc { code, message });
        }

        match response.get("result") {
            Some(result) => Ok(result.clone()),
            None => Err(GatewayError::Protocol("response missing result".to_string())),
        }
    }
}

fn encode<T: serde::Serialize>(params: T) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(params).map_err(|e| GatewayError::Protocol(format!("encode params: {e}")))
}

fn parse_result<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::Protocol(format!("unexpected result shape: {e}")))
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use proctor_core::{EventKind, Severity};
    use tokio::net::UnixListener;

    fn sock_path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    /// One-shot fake gateway: accepts a connection, reads one request
    /// line, replies with `response`, and hands the request back.
    fn serve_once(socket_path: &str, response: &'static str) -> tokio::task::JoinHandle<String> {
        let listener = UnixListener::bind(socket_path).expect("bind fake gateway");
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            let mut request = String::new();
            reader.read_line(&mut request).await.expect("read request");
            writer
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            writer.shutdown().await.expect("shutdown");
            request
        })
    }

    // ── 1. Request shape and result parsing ─────────────────────────

    #[tokio::test]
    async fn start_session_sends_camel_case_and_parses_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        let server = serve_once(&path, "{\"jsonrpc\":\"2.0\",\"result\":{\"sessionId\":\"sess-9\"},\"id\":1}\n");

        let client = BackendClient::new(&path);
        let result = client.start_session("Dana").await.expect("start");
        assert_eq!(result.session_id, "sess-9");

        let request = server.await.expect("server task");
        let req: serde_json::Value = serde_json::from_str(request.trim()).expect("request json");
        assert_eq!(req["jsonrpc"], "2.0");
        assert_eq!(req["method"], "start_session");
        assert_eq!(req["params"]["candidateName"], "Dana");
        assert_eq!(req["id"], 1);
    }

    // ── 2. No socket means unreachable, not a hang ──────────────────

    #[tokio::test]
    async fn missing_socket_is_unreachable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = BackendClient::new(sock_path(&dir, "absent.sock"));

        let err = client.health_check().await.expect_err("must fail");
        assert!(matches!(err, GatewayError::Unreachable { .. }));
    }

    // ── 3. RPC errors surface code and message ──────────────────────

    #[tokio::test]
    async fn rpc_error_surfaces_code_and_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        serve_once(
            &path,
            "{\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32601,\"message\":\"method not found\"},\"id\":1}\n",
        );

        let client = BackendClient::new(&path);
        let err = client.end_session("sess-1").await.expect_err("must fail");
        match err {
            GatewayError::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
            }
            other => panic!("expected Rpc, got {other:?}"),
        }
    }

    // ── 4. A hung gateway hits the deadline ─────────────────────────

    #[tokio::test]
    async fn hung_gateway_hits_deadline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        let listener = UnixListener::bind(&path).expect("bind");
        tokio::spawn(async move {
            let (_held, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client =
            BackendClient::new(&path).with_call_timeout(Duration::from_millis(100));
        let err = client.health_check().await.expect_err("must time out");
        assert!(matches!(err, GatewayError::Deadline(_)));
    }

    // ── 5. Event payloads keep their wire casing ────────────────────

    #[tokio::test]
    async fn add_event_sends_wire_casing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        let server = serve_once(&path, "{\"jsonrpc\":\"2.0\",\"result\":{\"accepted\":true},\"id\":1}\n");

        let event = IntegrityEvent {
            id: 1756200000000,
            kind: EventKind::PhoneDetected,
            severity: Severity::Danger,
            message: "Mobile phone detected".to_string(),
            timestamp: DateTime::parse_from_rfc3339("2026-02-25T12:00:00Z")
                .expect("valid RFC3339")
                .with_timezone(&Utc),
        };

        let client = BackendClient::new(&path);
        let result = client.add_event("sess-1", &event).await.expect("add");
        assert!(result.accepted);

        let request = server.await.expect("server task");
        let req: serde_json::Value = serde_json::from_str(request.trim()).expect("request json");
        assert_eq!(req["method"], "add_event");
        assert_eq!(req["params"]["sessionId"], "sess-1");
        assert_eq!(req["params"]["event"]["eventType"], "PHONE_DETECTED");
        assert_eq!(req["params"]["event"]["severity"], "DANGER");
    }

    // ── 6. Report parsing tolerates a missing event list ────────────

    #[tokio::test]
    async fn get_report_defaults_missing_events() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        serve_once(&path, "{\"jsonrpc\":\"2.0\",\"result\":{\"integrityScore\":42},\"id\":1}\n");

        let client = BackendClient::new(&path);
        let report = client.get_report("sess-1").await.expect("report");
        assert_eq!(report.integrity_score, 42);
        assert!(report.events.is_empty());
    }

    // ── 7. Garbage responses are protocol errors ────────────────────

    #[tokio::test]
    async fn malformed_response_is_protocol_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        serve_once(&path, "not json at all\n");

        let client = BackendClient::new(&path);
        let err = client.health_check().await.expect_err("must fail");
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    // ── 8. Health check round trip ──────────────────────────────────

    #[tokio::test]
    async fn health_check_parses_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sock_path(&dir, "gw.sock");
        serve_once(&path, "{\"jsonrpc\":\"2.0\",\"result\":{\"status\":\"ok\"},\"id\":1}\n");

        let client = BackendClient::new(&path);
        let health = client.health_check().await.expect("health");
        assert_eq!(health.status, "ok");
    }
}
