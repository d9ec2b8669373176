//! Search adapter: forwards to `knowledge/search` and renders matches.

use std::sync::Mutex;

use serde_json::{Map, Value};

use axon_core::types::{RunState, ToolResult};

use crate::client::BrainClient;
use crate::tools::REMOTE_SEARCH;

pub async fn run(
    client: &BrainClient,
    state: &Mutex<RunState>,
    params: Map<String, Value>,
) -> ToolResult {
    let query = params
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match client.call_tool(REMOTE_SEARCH, Value::Object(params)).await {
        Ok(result) => {
            state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .brain
                .searches += 1;
            ToolResult::text(render(&query, &result)).with_details(result)
        }
        Err(err) => ToolResult::error(format!("Error searching brain: {err}")),
    }
}

/// Markdown rendering of a search response. Tolerates missing fields — the
/// response shape is the server's, not ours.
pub(crate) fn render(query: &str, result: &Value) -> String {
    let total = result
        .get("total_results")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let mut text = format!("# Search Results: \"{query}\"\n\nFound {total} results\n\n");

    let Some(results) = result.get("results").and_then(Value::as_array) else {
        text.push_str("No results found.\n");
        return text;
    };
    if results.is_empty() {
        text.push_str("No results found.\n");
        return text;
    }

    for (i, r) in results.iter().enumerate() {
        let score = r
            .get("relevance_score")
            .and_then(Value::as_f64)
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "N/A".to_string());
        text.push_str(&format!("## Result {} (score: {score})\n", i + 1));
        text.push_str(&format!(
            "**Type:** {}\n",
            r.get("memory_type").and_then(Value::as_str).unwrap_or("?")
        ));
        text.push_str(&format!(
            "**Status:** {}",
            r.get("status").and_then(Value::as_str).unwrap_or("?")
        ));
        if let Some(progress) = r.get("approval_progress").and_then(Value::as_str) {
            text.push_str(&format!(" ({progress})"));
        }
        text.push('\n');
        if let Some(author) = r.get("author").and_then(Value::as_str) {
            text.push_str(&format!("**Author:** {author}\n"));
        }
        text.push('\n');
        text.push_str(&format!(
            "**Situation:** {}\n",
            r.get("situation").and_then(Value::as_str).unwrap_or("")
        ));
        text.push_str(&format!(
            "**Action:** {}\n",
            r.get("action").and_then(Value::as_str).unwrap_or("")
        ));
        text.push_str(&format!(
            "**Outcome:** {}\n",
            r.get("outcome").and_then(Value::as_str).unwrap_or("")
        ));
        if let Some(learnings) = r.get("learnings").and_then(Value::as_array) {
            if !learnings.is_empty() {
                text.push_str("**Learnings:**\n");
                for l in learnings {
                    text.push_str(&format!("- {}\n", l.as_str().unwrap_or("")));
                }
            }
        }
        if let Some(tags) = r.get("tags").and_then(Value::as_array) {
            if !tags.is_empty() {
                let joined: Vec<&str> = tags.iter().filter_map(Value::as_str).collect();
                text.push_str(&format!("**Tags:** {}\n", joined.join(", ")));
            }
        }
        text.push_str("\n---\n\n");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_matches_with_score_status_and_tags() {
        let result = json!({
            "total_results": 1,
            "results": [{
                "relevance_score": 0.874,
                "memory_type": "error",
                "status": "pending",
                "approval_progress": "2/3 votes",
                "author": "agent-7",
                "situation": "RPC node rejected eth_estimateGas",
                "action": "Pinned the client to the archive endpoint",
                "outcome": "Estimates succeeded",
                "learnings": ["archive nodes accept historical state"],
                "tags": ["base", "gas"]
            }]
        });
        let text = render("gas estimation", &result);
        assert!(text.contains("Found 1 results"));
        assert!(text.contains("score: 0.87"));
        assert!(text.contains("**Status:** pending (2/3 votes)"));
        assert!(text.contains("**Tags:** base, gas"));
        assert!(text.contains("- archive nodes accept historical state"));
    }

    #[test]
    fn empty_result_set_renders_placeholder() {
        let text = render("nothing", &json!({ "total_results": 0, "results": [] }));
        assert!(text.contains("No results found."));
    }
}
