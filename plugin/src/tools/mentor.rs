//! Mentor-chat adapter, the most stateful of the five: forwards the exchange
//! verbatim, adopts the response's dialogue fields into per-run state, and
//! appends machine-readable status banners so the host agent keeps calling
//! until the mentor declares the dialogue complete.

use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::debug;

use axon_core::types::{DialogueStatus, MentorState, PendingQuestion, RunState, ToolResult};

use crate::client::BrainClient;
use crate::tools::{REMOTE_MENTOR_CHAT, TOOL_MENTOR_CHAT};

pub async fn run(
    client: &BrainClient,
    state: &Mutex<RunState>,
    params: Map<String, Value>,
) -> ToolResult {
    match client
        .call_tool(REMOTE_MENTOR_CHAT, Value::Object(params))
        .await
    {
        Ok(result) => {
            {
                let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
                absorb_response(&mut guard.mentor, &result);
            }
            debug!(
                status = result.get("status").and_then(serde_json::Value::as_str),
                "mentor response received"
            );
            ToolResult::text(render(&result)).with_details(result)
        }
        Err(err) => ToolResult::error(format!("Error calling mentor: {err}")),
    }
}

/// Adopts dialogue fields from the response, each independently — only
/// fields actually present overwrite remembered state.
pub(crate) fn absorb_response(mentor: &mut MentorState, result: &Value) {
    if let Some(session) = result.get("sessionId").and_then(Value::as_str) {
        mentor.session_id = Some(session.to_string());
    }
    if let Some(questions) = result.get("pendingQuestions").and_then(Value::as_array) {
        // Set wholesale: the latest response supersedes earlier questions.
        mentor.pending_questions = questions
            .iter()
            .filter_map(|q| {
                Some(PendingQuestion {
                    id: q.get("id")?.as_str()?.to_string(),
                    question: q.get("question")?.as_str()?.to_string(),
                })
            })
            .collect();
    }
    if let Some(project) = result.get("activeProject") {
        if !project.is_null() {
            mentor.active_project = Some(project.clone());
        }
    }
    match result.get("status").and_then(Value::as_str) {
        Some("gathering") => mentor.status = Some(DialogueStatus::Gathering),
        Some("complete") => mentor.status = Some(DialogueStatus::Complete),
        _ => {}
    }
}

pub(crate) fn render(result: &Value) -> String {
    let mut text = result
        .get("response")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| serde_json::to_string_pretty(result).unwrap_or_default());

    let status = result.get("status").and_then(Value::as_str);
    let questions = result
        .get("pendingQuestions")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if status == Some("gathering") && !questions.is_empty() {
        text.push_str("\n\nSTATUS: GATHERING — this is not the final answer yet.");
        text.push_str(&format!(
            "\n\n> Call {TOOL_MENTOR_CHAT} again RIGHT NOW, in this same run."
        ));
        text.push_str(
            "\n> Answer the mentor's questions from the user's message or reasonable assumptions.",
        );
        text.push_str("\n> Write in natural language — answers are extracted automatically.");
        text.push_str("\n\nQuestions to answer:");
        for (i, q) in questions.iter().enumerate() {
            let question = q.get("question").and_then(Value::as_str).unwrap_or("");
            text.push_str(&format!("\n  {}. {question}", i + 1));
        }
        if let Some(session) = result.get("sessionId").and_then(Value::as_str) {
            text.push_str(&format!(
                "\n\nExample next call:\n{TOOL_MENTOR_CHAT}({{\n  \"message\": \"Based on the user's request, [answer the questions above]\",\n  \"sessionId\": \"{session}\"\n}})"
            ));
        }
        text.push_str("\n\nDo not respond to the user yet — keep calling until status is \"complete\".");
    } else if status == Some("complete") {
        text.push_str("\n\nSTATUS: COMPLETE — the mentor has given a final recommendation.");
        text.push_str("\nYou can now present this guidance to the user.");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absorbs_all_dialogue_fields() {
        let mut mentor = MentorState::default();
        let result = json!({
            "sessionId": "s1",
            "pendingQuestions": [
                { "id": "0", "question": "budget?" },
                { "id": "1", "question": "tech stack?" }
            ],
            "activeProject": { "id": "p1", "name": "demo" },
            "status": "gathering"
        });
        absorb_response(&mut mentor, &result);
        assert_eq!(mentor.session_id.as_deref(), Some("s1"));
        assert_eq!(mentor.pending_questions.len(), 2);
        assert_eq!(mentor.pending_questions[0].question, "budget?");
        assert_eq!(mentor.active_project.as_ref().unwrap()["id"], json!("p1"));
        assert_eq!(mentor.status, Some(DialogueStatus::Gathering));
    }

    #[test]
    fn absent_fields_leave_remembered_state_untouched() {
        let mut mentor = MentorState {
            session_id: Some("s1".to_string()),
            active_project: Some(json!({"id": "p1"})),
            ..MentorState::default()
        };
        absorb_response(&mut mentor, &json!({ "status": "complete" }));
        assert_eq!(mentor.session_id.as_deref(), Some("s1"));
        assert!(mentor.active_project.is_some());
        assert_eq!(mentor.status, Some(DialogueStatus::Complete));
    }

    #[test]
    fn later_questions_supersede_earlier_ones() {
        let mut mentor = MentorState::default();
        absorb_response(
            &mut mentor,
            &json!({ "pendingQuestions": [{ "id": "0", "question": "budget?" }] }),
        );
        absorb_response(
            &mut mentor,
            &json!({ "pendingQuestions": [{ "id": "2", "question": "timeline?" }] }),
        );
        assert_eq!(mentor.pending_questions.len(), 1);
        assert_eq!(mentor.pending_questions[0].id, "2");
    }

    #[test]
    fn gathering_banner_demands_another_call() {
        let result = json!({
            "response": "Need a bit more context.",
            "status": "gathering",
            "sessionId": "s1",
            "pendingQuestions": [{ "id": "0", "question": "What's your budget?" }]
        });
        let text = render(&result);
        assert!(text.contains("STATUS: GATHERING"));
        assert!(text.contains("1. What's your budget?"));
        assert!(text.contains("\"sessionId\": \"s1\""));
        assert!(text.contains("keep calling until status is \"complete\""));
    }

    #[test]
    fn complete_banner_releases_the_agent() {
        let result = json!({
            "response": "Build the escrow first.",
            "status": "complete"
        });
        let text = render(&result);
        assert!(text.contains("STATUS: COMPLETE"));
        assert!(text.contains("present this guidance"));
    }

    #[test]
    fn missing_response_field_falls_back_to_raw_json() {
        let result = json!({ "unexpected": true });
        let text = render(&result);
        assert!(text.contains("unexpected"));
    }
}
