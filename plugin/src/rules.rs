//! Behavioral guidance injected at the start of every agent run, plus the
//! auto-search result block. The rules are advisory — the hard limits live in
//! the controller.

use serde_json::Value;

use axon_core::types::MentorState;

use crate::tools::{TOOL_MENTOR_CHAT, TOOL_PROPOSE, TOOL_SEARCH, TOOL_VOTE};

/// Prompts shorter than this skip the auto-search entirely.
pub const AUTO_SEARCH_MIN_PROMPT_CHARS: usize = 15;

/// The auto-search query is the head of the prompt, capped at this length.
pub const AUTO_SEARCH_QUERY_MAX_CHARS: usize = 200;

/// Result cap for the auto-search (tighter than the interactive default).
pub const AUTO_SEARCH_LIMIT: u64 = 3;

/// The standing rules block, with the mentor's mid-flight state appended when
/// a dialogue is pending from an earlier call in the same run.
pub fn agent_rules(mentor: &MentorState) -> String {
    let mut rules = format!(
        "[AXON AGENT RULES]

=== mentor ({TOOL_MENTOR_CHAT}) ===
Use for: building onchain projects, architecture review, grant and funding guidance.

The mentor conversation is MULTI-TURN and must finish before you answer the user:
1. Call {TOOL_MENTOR_CHAT} with the user's question.
2. If the response has pendingQuestions, answer them YOURSELF from context or
   reasonable assumptions — never forward them to the user.
3. Call {TOOL_MENTOR_CHAT} again with your answers in natural language (the
   sessionId is carried for you if you forget it).
4. Repeat until status is \"complete\", then give the user one comprehensive answer.

Present the result as your own consultation (\"I checked with our mentor and he
recommends...\"), not as a message relay.

=== collective brain ({TOOL_SEARCH} / {TOOL_PROPOSE} / {TOOL_VOTE}) ===
SEARCH before implementing non-trivial features, choosing approaches, debugging
complex errors, or integrating unfamiliar libraries. Describe the situation, not
the wish: \"oracle returns 0 on testnet\", not \"how to fix oracle\".

PROPOSE immediately after solving a non-trivial problem: fixed deprecated
endpoints, resolved version conflicts, found working contract addresses,
discovered framework workarounds. Not for typos or one-line fixes.
Pick the right memory_type: error (bug you fixed, include the root cause),
success (complete working solution), pattern (reusable approach),
anti-pattern (what not to do), insight (useful observation).

VOTE when search results include pending proposals: positive if useful,
negative with a reason if not. This curates the brain for everyone.

[END AXON RULES]"
    );

    if !mentor.pending_questions.is_empty() {
        if let Some(session) = &mentor.session_id {
            rules.push_str("\n\n[MENTOR PENDING — answer these in your next call]\n");
            rules.push_str(&format!("sessionId: \"{session}\"\n"));
            for q in &mentor.pending_questions {
                rules.push_str(&format!("  {}: \"{}\"\n", q.id, q.question));
            }
            rules.push_str("[END PENDING]");
        }
    }

    rules
}

/// Renders the auto-search block, or nothing when the brain had no matches.
pub fn render_auto_search(query: &str, result: &Value) -> Option<String> {
    let total = result
        .get("total_results")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if total == 0 {
        return None;
    }

    let mut text = format!("[AXON BRAIN — auto-search results for: \"{query}\"]\n\n");
    if let Some(results) = result.get("results").and_then(Value::as_array) {
        for (i, r) in results.iter().enumerate() {
            text.push_str(&format!(
                "**Result {}** ({}, status: {}",
                i + 1,
                r.get("memory_type").and_then(Value::as_str).unwrap_or("?"),
                r.get("status").and_then(Value::as_str).unwrap_or("?"),
            ));
            if let Some(progress) = r.get("approval_progress").and_then(Value::as_str) {
                text.push_str(&format!(", {progress}"));
            }
            text.push_str(")\n");
            text.push_str(&format!(
                "{}\n",
                r.get("situation").and_then(Value::as_str).unwrap_or("")
            ));
            text.push_str(&format!(
                "-> {}\n",
                r.get("action").and_then(Value::as_str).unwrap_or("")
            ));
            text.push_str(&format!(
                "Result: {}\n\n",
                r.get("outcome").and_then(Value::as_str).unwrap_or("")
            ));
        }
    }
    text.push_str("[END BRAIN RESULTS]");
    Some(text)
}

/// The auto-search query: head of the prompt, trimmed.
pub fn auto_search_query(prompt: &str) -> String {
    prompt
        .chars()
        .take(AUTO_SEARCH_QUERY_MAX_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_core::types::PendingQuestion;
    use serde_json::json;

    #[test]
    fn rules_name_all_four_tool_surfaces() {
        let rules = agent_rules(&MentorState::default());
        assert!(rules.contains(TOOL_MENTOR_CHAT));
        assert!(rules.contains(TOOL_SEARCH));
        assert!(rules.contains(TOOL_PROPOSE));
        assert!(rules.contains(TOOL_VOTE));
        assert!(!rules.contains("[MENTOR PENDING"));
    }

    #[test]
    fn pending_questions_are_surfaced_with_the_session() {
        let mentor = MentorState {
            session_id: Some("s1".to_string()),
            pending_questions: vec![PendingQuestion {
                id: "0".to_string(),
                question: "budget?".to_string(),
            }],
            ..MentorState::default()
        };
        let rules = agent_rules(&mentor);
        assert!(rules.contains("[MENTOR PENDING"));
        assert!(rules.contains("sessionId: \"s1\""));
        assert!(rules.contains("0: \"budget?\""));
    }

    #[test]
    fn pending_block_requires_a_session_handle() {
        let mentor = MentorState {
            pending_questions: vec![PendingQuestion {
                id: "0".to_string(),
                question: "budget?".to_string(),
            }],
            ..MentorState::default()
        };
        assert!(!agent_rules(&mentor).contains("[MENTOR PENDING"));
    }

    #[test]
    fn auto_search_is_silent_on_zero_results() {
        assert!(render_auto_search("q", &json!({ "total_results": 0 })).is_none());
    }

    #[test]
    fn auto_search_block_lists_matches() {
        let result = json!({
            "total_results": 1,
            "results": [{
                "memory_type": "pattern",
                "status": "approved",
                "situation": "Deploy scripts drifted",
                "action": "Pinned toolchain versions",
                "outcome": "Reproducible deploys"
            }]
        });
        let text = render_auto_search("deploys", &result).unwrap();
        assert!(text.contains("auto-search results for: \"deploys\""));
        assert!(text.contains("(pattern, status: approved)"));
        assert!(text.contains("[END BRAIN RESULTS]"));
    }

    #[test]
    fn query_is_capped_and_trimmed() {
        let long = format!("  {} ", "x".repeat(400));
        let query = auto_search_query(&long);
        assert!(query.len() <= AUTO_SEARCH_QUERY_MAX_CHARS);
        assert!(!query.starts_with(' '));
    }
}
