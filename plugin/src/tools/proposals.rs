//! My-proposals adapter: pass-through listing via `knowledge/my-proposals`.

use serde_json::{Value, json};

use axon_core::types::ToolResult;

use crate::client::BrainClient;
use crate::tools::REMOTE_MY_PROPOSALS;

pub async fn run(client: &BrainClient) -> ToolResult {
    match client.call_tool(REMOTE_MY_PROPOSALS, json!({})).await {
        Ok(result) => ToolResult::text(render(&result)).with_details(result),
        Err(err) => ToolResult::error(format!("Error checking proposals: {err}")),
    }
}

pub(crate) fn render(result: &Value) -> String {
    let blocks: Vec<&str> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|content| {
            content
                .iter()
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if blocks.is_empty() {
        "No proposals found.".to_string()
    } else {
        blocks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_content_blocks() {
        let result = json!({
            "content": [
                { "type": "text", "text": "prop-1: approved" },
                { "type": "text", "text": "prop-2: pending" }
            ]
        });
        assert_eq!(render(&result), "prop-1: approved\nprop-2: pending");
    }

    #[test]
    fn empty_listing_renders_fixed_message() {
        assert_eq!(render(&json!({ "content": [] })), "No proposals found.");
        assert_eq!(render(&json!({})), "No proposals found.");
    }
}
