//! JSON-RPC 2.0 transport to the remote brain service.
//!
//! One instance owns at most one server-issued session token. The session
//! handshake runs lazily before the first tool call and is re-attempted on
//! the next call if it failed; after the first success it is never re-issued.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use axon_core::config::{ConnectionMode, PluginConfig};
use axon_core::error::ClientError;

/// Header carrying the server-issued session token in both directions.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Header carrying the API key in [`ConnectionMode::HeaderKey`].
pub const API_KEY_HEADER: &str = "X-API-Key";

pub struct BrainClient {
    endpoint: String,
    api_key: String,
    mode: ConnectionMode,
    timeout_ms: u64,
    http: reqwest::Client,
    request_id: AtomicU64,
    session_id: Mutex<Option<String>>,
    initialized: AtomicBool,
}

impl BrainClient {
    pub fn new(config: &PluginConfig) -> Self {
        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("failed to build HTTP client, using defaults: {e}");
                reqwest::Client::new()
            });

        Self {
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            mode: config.connection_mode,
            timeout_ms: timeout.as_millis() as u64,
            http,
            request_id: AtomicU64::new(1),
            session_id: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    fn rpc_url(&self) -> String {
        match self.mode {
            ConnectionMode::HeaderKey => format!("{}/mcp", self.endpoint),
            ConnectionMode::PathKey => format!("{}/{}/mcp", self.endpoint, self.api_key),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// The session token currently held, if the server has issued one.
    pub fn session_id(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// One-time session handshake. Idempotent: a no-op once it has succeeded.
    /// Only successful completion sets the initialized flag, so a failed
    /// handshake is retried lazily by the next call.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        debug!("initializing brain session");
        self.post_rpc("initialize", None).await?;
        self.initialized.store(true, Ordering::Release);
        info!("brain session initialized");
        Ok(())
    }

    /// Calls a remote tool through `tools/call` and unwraps its result.
    ///
    /// When the result's content is a single text blob that parses as JSON,
    /// the parsed object is returned; otherwise the raw result passes through.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<Value, ClientError> {
        self.initialize().await?;

        let result = self
            .post_rpc("tools/call", Some(json!({ "name": name, "arguments": arguments })))
            .await?;

        if let Some(text) = result
            .pointer("/content/0/text")
            .and_then(Value::as_str)
        {
            if let Ok(parsed) = serde_json::from_str::<Value>(text) {
                return Ok(parsed);
            }
        }

        Ok(result)
    }

    async fn post_rpc(&self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let mut envelope = json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
        });
        if let Some(params) = params {
            envelope["params"] = params;
        }

        let mut request = self.http.post(self.rpc_url()).json(&envelope);
        if self.mode == ConnectionMode::HeaderKey {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }
        if let Some(session) = self.session_id() {
            request = request.header(SESSION_HEADER, session);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        // The session token is captured before the status check — the server
        // may issue one even alongside an error response.
        if let Some(session) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            let mut held = self.session_id.lock().unwrap_or_else(|e| e.into_inner());
            *held = Some(session.to_string());
        }

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|_| ClientError::Parse)?;

        if let Some(error) = body.get("error") {
            return Err(ClientError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown RPC error")
                    .to_string(),
            });
        }

        Ok(body.get("result").cloned().unwrap_or_else(|| {
            json!({ "content": [{ "type": "text", "text": "No result returned" }] })
        }))
    }

    /// Best-effort session teardown. Failures are logged, never raised;
    /// the local token is cleared unconditionally.
    pub async fn teardown(&self) {
        let session = {
            let mut held = self.session_id.lock().unwrap_or_else(|e| e.into_inner());
            held.take()
        };
        let Some(session) = session else {
            return;
        };

        let mut request = self.http.delete(self.rpc_url()).header(SESSION_HEADER, session);
        if self.mode == ConnectionMode::HeaderKey {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        match request.send().await {
            Ok(_) => info!("brain session cleaned up"),
            Err(e) => warn!("failed to clean up brain session: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: ConnectionMode) -> PluginConfig {
        let mut cfg = PluginConfig::new("axon_mcp_testkey");
        cfg.endpoint = Some("https://brain.example.com/".to_string());
        cfg.connection_mode = mode;
        cfg
    }

    #[test]
    fn header_mode_url_omits_the_key() {
        let client = BrainClient::new(&config(ConnectionMode::HeaderKey));
        assert_eq!(client.rpc_url(), "https://brain.example.com/mcp");
    }

    #[test]
    fn path_mode_url_embeds_the_key() {
        let client = BrainClient::new(&config(ConnectionMode::PathKey));
        assert_eq!(
            client.rpc_url(),
            "https://brain.example.com/axon_mcp_testkey/mcp"
        );
    }

    #[test]
    fn request_ids_are_monotonic() {
        let client = BrainClient::new(&config(ConnectionMode::HeaderKey));
        let first = client.next_id();
        let second = client.next_id();
        assert_eq!(second, first + 1);
    }
}
