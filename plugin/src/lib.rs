//! Agent-side plugin for the Axon collective brain: a JSON-RPC transport,
//! five tool adapters, and a controller that gates mentor conversations and
//! proposal quality per agent run.

pub mod client;
pub mod controller;
pub mod rules;
pub mod tools;

use std::sync::Mutex;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use axon_core::config::PluginConfig;
use axon_core::types::{RunState, ToolResult};

use crate::client::BrainClient;
use crate::controller::ToolGate;
use crate::tools::{
    TOOL_MENTOR_CHAT, TOOL_MY_PROPOSALS, TOOL_PROPOSE, TOOL_SEARCH, TOOL_VOTE, ToolSpec,
};

/// One plugin instance per host agent. Run state lives here, not in a global,
/// so parallel agents in one process never share counters or sessions.
pub struct AxonPlugin {
    config: PluginConfig,
    client: BrainClient,
    state: Mutex<RunState>,
}

impl AxonPlugin {
    pub fn new(config: PluginConfig) -> Result<Self, String> {
        config.validate()?;
        let client = BrainClient::new(&config);
        Ok(Self {
            config,
            client,
            state: Mutex::new(RunState::default()),
        })
    }

    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        tools::tool_specs()
    }

    pub fn client(&self) -> &BrainClient {
        &self.client
    }

    /// Context injected before the agent starts: the standing rules (with any
    /// mid-flight mentor state) plus, for substantial prompts, a proactive
    /// brain search. Search failures degrade to rules-only output.
    pub async fn before_agent_start(&self, prompt: &str) -> Option<String> {
        let mut context = {
            let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
            rules::agent_rules(&guard.mentor)
        };

        let query = rules::auto_search_query(prompt);
        if self.config.auto_search() && query.chars().count() >= rules::AUTO_SEARCH_MIN_PROMPT_CHARS
        {
            match self
                .client
                .call_tool(
                    tools::REMOTE_SEARCH,
                    json!({
                        "query": query,
                        "include_pending": true,
                        "limit": rules::AUTO_SEARCH_LIMIT,
                    }),
                )
                .await
            {
                Ok(result) => {
                    if let Some(block) = rules::render_auto_search(&query, &result) {
                        context.push_str("\n\n");
                        context.push_str(&block);
                    } else {
                        debug!("auto-search found nothing relevant");
                    }
                }
                Err(err) => warn!("auto-search failed, continuing without it: {err}"),
            }
        }

        Some(context)
    }

    /// Policy pass only, no transport. Exposed for hosts that intercept tool
    /// calls themselves; [`handle_tool_call`](Self::handle_tool_call) applies
    /// it internally.
    pub fn before_tool_call(&self, tool: &str, params: &Map<String, Value>) -> ToolGate {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        controller::gate_tool_call(&mut guard, self.config.max_mentor_turns(), tool, params)
    }

    /// Full tool dispatch: gate, then forward to the matching adapter.
    pub async fn handle_tool_call(&self, tool: &str, params: Map<String, Value>) -> ToolResult {
        let params = match self.before_tool_call(tool, &params) {
            ToolGate::Allow => params,
            ToolGate::Rewrite(rewritten) => rewritten,
            ToolGate::Block { reason } => return ToolResult::error(reason),
        };

        match tool {
            TOOL_SEARCH => tools::search::run(&self.client, &self.state, params).await,
            TOOL_PROPOSE => tools::propose::run(&self.client, &self.state, params).await,
            TOOL_VOTE => tools::vote::run(&self.client, &self.state, params).await,
            TOOL_MY_PROPOSALS => tools::proposals::run(&self.client).await,
            TOOL_MENTOR_CHAT => tools::mentor::run(&self.client, &self.state, params).await,
            other => ToolResult::error(format!("Unknown tool: {other}")),
        }
    }

    /// End-of-run hook: log the run's brain activity and reset all per-run
    /// state so the next run starts fresh.
    pub fn agent_end(&self) {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let brain = &guard.brain;
        if brain.searches > 0 || brain.proposals > 0 || brain.votes > 0 {
            info!(
                searches = brain.searches,
                proposals = brain.proposals,
                votes = brain.votes,
                "brain activity this run"
            );
        }
        guard.reset();
    }

    /// Plugin shutdown: release the remote session, best effort.
    pub async fn shutdown(&self) {
        self.client.teardown().await;
    }
}
