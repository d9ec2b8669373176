//! Propose adapter: submits a knowledge entry through `knowledge/propose`.

use std::sync::Mutex;

use serde_json::{Map, Value};

use axon_core::types::{RunState, ToolResult};

use crate::client::BrainClient;
use crate::tools::REMOTE_PROPOSE;

pub async fn run(
    client: &BrainClient,
    state: &Mutex<RunState>,
    params: Map<String, Value>,
) -> ToolResult {
    match client.call_tool(REMOTE_PROPOSE, Value::Object(params)).await {
        Ok(result) => {
            state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .brain
                .proposals += 1;
            ToolResult::text(render(&result)).with_details(result)
        }
        Err(err) => ToolResult::error(format!("Error proposing knowledge: {err}")),
    }
}

pub(crate) fn render(result: &Value) -> String {
    format!(
        "Proposal submitted!\n\n\
         **Proposal ID:** {}\n\
         **Status:** {}\n\
         **Votes needed:** {}\n\
         **Next:** {}\n",
        field(result, "proposal_id"),
        field(result, "status"),
        field(result, "votes_required"),
        field(result, "next_steps"),
    )
}

fn field(result: &Value, key: &str) -> String {
    match result.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_submission_summary() {
        let result = json!({
            "proposal_id": "prop-42",
            "status": "pending",
            "votes_required": 3,
            "next_steps": "Wait for community votes"
        });
        let text = render(&result);
        assert!(text.contains("**Proposal ID:** prop-42"));
        assert!(text.contains("**Votes needed:** 3"));
    }

    #[test]
    fn missing_fields_fall_back_to_unknown() {
        let text = render(&json!({}));
        assert!(text.contains("**Proposal ID:** unknown"));
    }
}
