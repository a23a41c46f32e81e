//! Error types for gateway calls.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("cannot connect to gateway at {socket_path}: {detail}")]
    Unreachable { socket_path: String, detail: String },

    #[error("gateway call exceeded {0:?} deadline")]
    Deadline(Duration),

    #[error("malformed gateway response: {0}")]
    Protocol(String),

    #[error("gateway error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("gateway io error: {0}")]
    Io(#[from] std::io::Error),
}
