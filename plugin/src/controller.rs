//! Pre-call interception applied to every tool invocation before the remote
//! call: mentor turn limiting with parameter injection, search defaulting,
//! and propose quality gates.

use serde_json::{Map, Value, json};
use tracing::{info, warn};

use axon_core::types::RunState;

use crate::tools::{TOOL_MENTOR_CHAT, TOOL_PROPOSE, TOOL_SEARCH};

/// Directive appended to the outgoing message on the final permitted turn.
pub const FINAL_TURN_DIRECTIVE: &str =
    "\n\n[SYSTEM: This is your final exchange. Give a complete recommendation now. No more questions.]";

/// Outcome of the interception pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolGate {
    /// Forward the call with its original parameters.
    Allow,
    /// Forward the call with rewritten parameters.
    Rewrite(Map<String, Value>),
    /// Do not call the transport at all; return the reason to the host.
    Block { reason: String },
}

/// Runs the policy pass for one tool call, mutating per-run state as a side
/// effect. Tools without a policy fall through to [`ToolGate::Allow`].
pub fn gate_tool_call(
    state: &mut RunState,
    max_mentor_turns: u32,
    tool: &str,
    params: &Map<String, Value>,
) -> ToolGate {
    match tool {
        TOOL_MENTOR_CHAT => gate_mentor_chat(state, max_mentor_turns, params),
        TOOL_SEARCH => apply_search_defaults(params),
        TOOL_PROPOSE => gate_propose(params),
        _ => ToolGate::Allow,
    }
}

/// Three-zone turn policy: below the ceiling calls pass through (with session
/// and project injection), at the ceiling the call proceeds carrying a
/// final-answer directive, above the ceiling the call is blocked outright.
fn gate_mentor_chat(
    state: &mut RunState,
    max_turns: u32,
    params: &Map<String, Value>,
) -> ToolGate {
    state.mentor.turn_count += 1;
    let turn = state.mentor.turn_count;

    if turn > max_turns {
        warn!("mentor call blocked (exceeded limit of {max_turns})");
        return ToolGate::Block {
            reason: format!(
                "Mentor turn limit reached ({max_turns} calls per run). Present what you have to the user."
            ),
        };
    }

    let mut params = params.clone();
    let mut modified = false;

    // Carry the conversation forward when the caller forgot the handle.
    if !has_value(&params, "sessionId") {
        if let Some(session) = &state.mentor.session_id {
            params.insert("sessionId".to_string(), json!(session));
            modified = true;
            info!("auto-injected mentor sessionId");
        }
    }

    if !has_value(&params, "activeProject") {
        if let Some(project) = &state.mentor.active_project {
            params.insert("activeProject".to_string(), project.clone());
            modified = true;
        }
    }

    if turn == max_turns {
        let message = params
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        params.insert(
            "message".to_string(),
            json!(format!("{message}{FINAL_TURN_DIRECTIVE}")),
        );
        modified = true;
        warn!("mentor call #{turn} at limit, forcing final answer");
    }

    if modified {
        ToolGate::Rewrite(params)
    } else {
        ToolGate::Allow
    }
}

/// Pure defaulting, not gating: pending proposals are included so the agent
/// can vote reactively, and the result count is capped.
fn apply_search_defaults(params: &Map<String, Value>) -> ToolGate {
    let mut params = params.clone();
    let mut modified = false;

    if !has_value(&params, "include_pending") {
        params.insert("include_pending".to_string(), json!(true));
        modified = true;
    }

    if !has_value(&params, "limit") {
        params.insert("limit".to_string(), json!(5));
        modified = true;
    }

    if modified {
        ToolGate::Rewrite(params)
    } else {
        ToolGate::Allow
    }
}

/// Minimum-content gate. Both checks run before any remote call so vague
/// proposals never reach the service.
fn gate_propose(params: &Map<String, Value>) -> ToolGate {
    let situation = params
        .get("situation")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let action = params
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let outcome = params
        .get("outcome")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let total = situation.len() + action.len() + outcome.len();
    if total < 100 {
        warn!("proposal blocked (too short: {total} chars)");
        return ToolGate::Block {
            reason: "Proposal too short. Add more context about the situation, action, and outcome (min 100 chars total).".to_string(),
        };
    }

    if situation.len() < 20 {
        return ToolGate::Block {
            reason: "Situation description too short. Describe when this applies (min 20 chars)."
                .to_string(),
        };
    }

    ToolGate::Allow
}

fn has_value(params: &Map<String, Value>, key: &str) -> bool {
    params.get(key).is_some_and(|v| !v.is_null())
}
