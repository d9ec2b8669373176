use thiserror::Error;

/// Transport-level failure, classified so call sites can decide retry-ability.
/// The transport itself never retries — retries, if any, belong to the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request exceeded the configured deadline.
    #[error("Request to the brain service timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection-level failure before any HTTP status was received.
    #[error("Failed to connect to the brain service: {0}")]
    Network(String),

    /// Non-2xx HTTP status. The body is carried verbatim for diagnostics.
    #[error("Brain service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body was not valid JSON.
    #[error("Brain service returned invalid JSON")]
    Parse,

    /// JSON-RPC level `error` object in an otherwise successful response.
    #[error("{message}")]
    Rpc { code: i64, message: String },
}

impl ClientError {
    /// Stable machine-readable tag for logs and structured error results.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Timeout { .. } => "timeout",
            ClientError::Network(_) => "network",
            ClientError::Http { .. } => "http",
            ClientError::Parse => "parse",
            ClientError::Rpc { .. } => "rpc",
        }
    }

    /// HTTP status, when the failure carries one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
