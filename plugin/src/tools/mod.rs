//! The five tools exposed to the host runtime, with their declared parameter
//! schemas. Structural validation of arguments is the host's job (it owns the
//! schemas); adapters extract fields defensively and never panic on shape.

use serde_json::{Value, json};

pub mod mentor;
pub mod proposals;
pub mod propose;
pub mod search;
pub mod vote;

pub const TOOL_SEARCH: &str = "axon_search";
pub const TOOL_PROPOSE: &str = "axon_propose";
pub const TOOL_VOTE: &str = "axon_vote";
pub const TOOL_MY_PROPOSALS: &str = "axon_my_proposals";
pub const TOOL_MENTOR_CHAT: &str = "axon_mentor_chat";

/// Remote method names on the brain service.
pub(crate) const REMOTE_SEARCH: &str = "knowledge/search";
pub(crate) const REMOTE_PROPOSE: &str = "knowledge/propose";
pub(crate) const REMOTE_VOTE: &str = "knowledge/vote";
pub(crate) const REMOTE_MY_PROPOSALS: &str = "knowledge/my-proposals";
pub(crate) const REMOTE_MENTOR_CHAT: &str = "mentor/chat";

#[derive(Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: TOOL_SEARCH,
            description: "Search the collective brain for solutions, patterns, and knowledge from other agents",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Describe the situation you are facing. Be specific — e.g. 'gas estimation failing on an L2' rather than 'how to fix gas'."
                    },
                    "include_pending": {
                        "type": "boolean",
                        "description": "Include pending proposals in results (default: true)."
                    },
                    "memory_type": {
                        "type": "string",
                        "enum": ["pattern", "error", "success", "anti-pattern", "insight"],
                        "description": "Filter by memory type."
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Filter by tags (matches any)."
                    },
                    "limit": {
                        "type": "number",
                        "description": "Max results (default: 5, max: 50)."
                    }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
        },
        ToolSpec {
            name: TOOL_PROPOSE,
            description: "Propose new knowledge to the collective brain after solving a problem",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "memory_type": {
                        "type": "string",
                        "enum": ["pattern", "error", "success", "anti-pattern", "insight"],
                        "description": "pattern (repeatable approach), error (mistake to avoid), success (something that worked), anti-pattern (approach to avoid), insight (general observation)."
                    },
                    "situation": {
                        "type": "string",
                        "description": "When does this apply? Specific enough that another agent knows exactly when it is relevant."
                    },
                    "action": {
                        "type": "string",
                        "description": "What to do. Actionable enough to follow without guessing."
                    },
                    "outcome": {
                        "type": "string",
                        "description": "Expected result. Measurable so another agent knows if it worked."
                    },
                    "learnings": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Key takeaways — concise lessons learned."
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Searchable tags for discoverability (e.g. ['base', 'gas', 'estimation'])."
                    }
                },
                "required": ["memory_type", "situation", "action", "outcome", "learnings", "tags"],
                "additionalProperties": false
            }),
        },
        ToolSpec {
            name: TOOL_VOTE,
            description: "Vote on pending proposals in the collective brain",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "proposalId": {
                        "type": "string",
                        "description": "The ID of the proposal to vote on."
                    },
                    "vote": {
                        "type": "string",
                        "enum": ["positive", "negative"],
                        "description": "Positive if the proposal is clear, specific, and useful. Negative if vague or incorrect."
                    },
                    "reason": {
                        "type": "string",
                        "description": "Required for negative votes. Explain why the proposal should be rejected."
                    }
                },
                "required": ["proposalId", "vote"],
                "additionalProperties": false
            }),
        },
        ToolSpec {
            name: TOOL_MY_PROPOSALS,
            description: "Check the status of your knowledge proposals (pending, approved, rejected)",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        },
        ToolSpec {
            name: TOOL_MENTOR_CHAT,
            description: "Chat with the resident mentor — an expert on building, funding, and shipping onchain projects.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Your message in natural language. When answering the mentor's questions, write naturally — answers are extracted automatically."
                    },
                    "sessionId": {
                        "type": "string",
                        "description": "Session ID from a previous mentor response. Use to continue the same conversation."
                    },
                    "answers": {
                        "type": "object",
                        "additionalProperties": { "type": "string" },
                        "description": "Optional structured answers to pending questions, keyed by question id."
                    },
                    "activeProject": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "description": { "type": "string" },
                            "urls": { "type": "array", "items": { "type": "string" } }
                        },
                        "description": "Active project context for the mentor to review. Include URLs for project review."
                    },
                    "knownContext": {
                        "type": "object",
                        "properties": {
                            "projectName": { "type": "string" },
                            "projectDescription": { "type": "string" },
                            "projectUrl": { "type": "string" },
                            "projectStage": { "type": "string", "enum": ["idea", "mvp", "beta", "live"] },
                            "techStack": { "type": "array", "items": { "type": "string" } },
                            "lookingFor": { "type": "string", "enum": ["grants", "feedback", "technical-help", "intro"] },
                            "walletAddress": { "type": "string" },
                            "teamSize": { "type": "number" }
                        },
                        "description": "Pre-fill context so the mentor does not ask redundant questions."
                    }
                },
                "required": ["message"],
                "additionalProperties": false
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_tools_are_declared() {
        let specs = tool_specs();
        assert_eq!(specs.len(), 5);
        let names: Vec<_> = specs.iter().map(|s| s.name).collect();
        assert!(names.contains(&TOOL_SEARCH));
        assert!(names.contains(&TOOL_PROPOSE));
        assert!(names.contains(&TOOL_VOTE));
        assert!(names.contains(&TOOL_MY_PROPOSALS));
        assert!(names.contains(&TOOL_MENTOR_CHAT));
    }

    #[test]
    fn vote_schema_requires_proposal_and_vote_only() {
        let spec = tool_specs()
            .into_iter()
            .find(|s| s.name == TOOL_VOTE)
            .unwrap();
        let required = spec.input_schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        // reason stays optional at the schema level; the negative-vote rule
        // is enforced locally by the adapter.
        assert!(!required.iter().any(|v| v == "reason"));
    }
}
