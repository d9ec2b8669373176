use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content block of a tool result. Only text blocks are produced here;
/// the host runtime renders them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Standard return shape for every tool exposed to the host runtime.
/// `details` carries the raw structured result for programmatic use;
/// `error` marks failures so the host can surface them distinctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            details: None,
            error: false,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            details: None,
            error: true,
        }
    }
}

/// A clarifying question the mentor still wants answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub id: String,
    pub question: String,
}

/// The mentor's verdict on the latest exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueStatus {
    /// More clarifying questions are outstanding.
    Gathering,
    /// The mentor has given a final recommendation.
    Complete,
}

/// Cross-call state of the mentor dialogue. One instance per agent run,
/// reset wholesale at run end — an incomplete dialogue never leaks across runs.
#[derive(Debug, Clone, Default)]
pub struct MentorState {
    /// Incremented once per mentor-tool invocation, before any gating.
    pub turn_count: u32,
    /// Conversation handle issued by the remote mentor. Distinct from the
    /// transport session token.
    pub session_id: Option<String>,
    /// Set wholesale by the latest mentor response.
    pub pending_questions: Vec<PendingQuestion>,
    /// Opaque project context forwarded for continuity.
    pub active_project: Option<Value>,
    /// Absent until the first response arrives.
    pub status: Option<DialogueStatus>,
}

/// Per-run usage counters. Observability only, never gating.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrainCounters {
    pub searches: u32,
    pub proposals: u32,
    pub votes: u32,
}

/// All mutable per-run state, owned by the plugin and shared by reference
/// with every adapter so mutations are visible to subsequent calls.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub mentor: MentorState,
    pub brain: BrainCounters,
}

impl RunState {
    /// Run-boundary reset. Every field returns to its zero value.
    pub fn reset(&mut self) {
        *self = RunState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reset_returns_all_fields_to_zero() {
        let mut state = RunState::default();
        state.mentor.turn_count = 3;
        state.mentor.session_id = Some("s1".to_string());
        state.mentor.pending_questions = vec![PendingQuestion {
            id: "0".to_string(),
            question: "budget?".to_string(),
        }];
        state.mentor.active_project = Some(json!({"id": "p1"}));
        state.mentor.status = Some(DialogueStatus::Gathering);
        state.brain.searches = 2;
        state.brain.proposals = 1;
        state.brain.votes = 1;

        state.reset();

        assert_eq!(state.mentor.turn_count, 0);
        assert!(state.mentor.session_id.is_none());
        assert!(state.mentor.pending_questions.is_empty());
        assert!(state.mentor.active_project.is_none());
        assert!(state.mentor.status.is_none());
        assert_eq!(state.brain.searches, 0);
        assert_eq!(state.brain.proposals, 0);
        assert_eq!(state.brain.votes, 0);
    }

    #[test]
    fn dialogue_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(DialogueStatus::Gathering).unwrap(),
            json!("gathering")
        );
        let status: DialogueStatus = serde_json::from_value(json!("complete")).unwrap();
        assert_eq!(status, DialogueStatus::Complete);
    }

    #[test]
    fn error_results_are_flagged() {
        let ok = ToolResult::text("fine").with_details(json!({"x": 1}));
        assert!(!ok.error);
        assert!(ok.details.is_some());
        let err = ToolResult::error("boom");
        assert!(err.error);
        assert_eq!(err.content[0].kind, "text");
    }
}
