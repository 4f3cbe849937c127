//! Multi-agent research pipeline: a planner decomposes a query into
//! independent sub-tasks, sub-agents investigate them in parallel with
//! tool access, and a synthesizer merges their findings into one cited
//! report. A single-pass [`SimpleAgent`] covers queries that do not
//! warrant the fan-out.

mod client;
mod config;
mod orchestrator;
mod planner;
mod prompts;
mod simple;
mod subagent;
mod synthesizer;

pub use client::{ChatOutcome, ModelClient, ToolChatOutcome};
pub use config::ResearchConfig;
pub use orchestrator::ResearchOrchestrator;
pub use planner::Planner;
pub use simple::SimpleAgent;
pub use subagent::SubAgentExecutor;
pub use synthesizer::{Synthesis, Synthesizer};

use std::sync::Arc;

use scout_core::{Error, ToolRegistry};
use scout_provider::AnthropicProvider;
use scout_tools::{standard_registry, ToolsConfig};

/// Build an orchestrator wired to the Anthropic API and the standard tool
/// set, configured from the environment (`ANTHROPIC_API_KEY`,
/// `SERPAPI_API_KEY`).
pub fn default_orchestrator() -> Result<ResearchOrchestrator, Error> {
    let provider = Arc::new(AnthropicProvider::from_env()?);
    let tools = Arc::new(standard_registry(&ToolsConfig::from_env()));
    Ok(ResearchOrchestrator::new(
        provider,
        tools,
        ResearchConfig::default(),
    ))
}

/// Build a single-pass agent with the same environment wiring.
pub fn default_simple_agent() -> Result<SimpleAgent, Error> {
    let provider = Arc::new(AnthropicProvider::from_env()?);
    let tools = Arc::new(standard_registry(&ToolsConfig::from_env()));
    let client = ModelClient::new(provider, ResearchConfig::default());
    Ok(SimpleAgent::new(client, tools))
}
