//! Vote adapter: records a vote through `knowledge/vote`.
//!
//! Negative votes without a reason are rejected locally, before any remote
//! round-trip. Remote failures get a friendlier hint when the cause is
//! recognizable, without altering the underlying error kind.

use std::sync::Mutex;

use serde_json::{Map, Value};

use axon_core::error::ClientError;
use axon_core::types::{RunState, ToolResult};

use crate::client::BrainClient;
use crate::tools::REMOTE_VOTE;

pub async fn run(
    client: &BrainClient,
    state: &Mutex<RunState>,
    params: Map<String, Value>,
) -> ToolResult {
    if let Some(reason) = validate(&params) {
        return ToolResult::error(reason);
    }

    match client.call_tool(REMOTE_VOTE, Value::Object(params)).await {
        Ok(result) => {
            state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .brain
                .votes += 1;
            ToolResult::text(render(&result)).with_details(result)
        }
        Err(err) => {
            let mut text = format!("Error voting: {err}\n");
            if let Some(hint) = classify_vote_failure(&err) {
                text.push('\n');
                text.push_str(hint.note());
            }
            ToolResult::error(text)
        }
    }
}

/// Local validation short-circuit — never reaches the transport.
pub(crate) fn validate(params: &Map<String, Value>) -> Option<String> {
    let vote = params.get("vote").and_then(Value::as_str).unwrap_or_default();
    let reason = params
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if vote == "negative" && reason.trim().is_empty() {
        return Some(
            "Negative votes require a reason explaining why the proposal is not useful."
                .to_string(),
        );
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VoteFailureHint {
    /// The agent has no approved proposal yet, so it cannot vote.
    NotVerified,
    /// A vote from this agent is already on record.
    AlreadyVoted,
}

impl VoteFailureHint {
    fn note(self) -> &'static str {
        match self {
            VoteFailureHint::NotVerified => {
                "Note: you need at least one approved proposal before you can vote."
            }
            VoteFailureHint::AlreadyVoted => "Note: you already voted on this proposal.",
        }
    }
}

/// Single home for the failure heuristic: structured status first, message
/// substrings as fallback while the server's error codes settle.
pub(crate) fn classify_vote_failure(err: &ClientError) -> Option<VoteFailureHint> {
    match err.http_status() {
        Some(403) => return Some(VoteFailureHint::NotVerified),
        Some(409) => return Some(VoteFailureHint::AlreadyVoted),
        _ => {}
    }
    let message = err.to_string();
    if message.contains("403") || message.contains("not verified") {
        Some(VoteFailureHint::NotVerified)
    } else if message.contains("409") || message.contains("already voted") {
        Some(VoteFailureHint::AlreadyVoted)
    } else {
        None
    }
}

pub(crate) fn render(result: &Value) -> String {
    format!(
        "Vote recorded!\n\n\
         **Proposal:** {}\n\
         **Status:** {}\n\
         **Votes:** {} positive, {} negative\n\
         **Required:** {}\n",
        field(result, "proposal_id"),
        field(result, "current_status"),
        field(result, "votes_positive"),
        field(result, "votes_negative"),
        field(result, "votes_required"),
    )
}

fn field(result: &Value, key: &str) -> String {
    match result.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => "unknown".to_string(),
    }
}
