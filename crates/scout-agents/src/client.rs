//! Thin wrapper over a [`ModelProvider`] that applies the research
//! configuration and normalizes responses for the agents.

use std::sync::Arc;

use scout_core::{ChatRequest, Error, Message, ModelProvider, ToolCall, ToolDefinition};

use crate::config::ResearchConfig;

/// Outcome of a plain (no-tools) chat turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub content: String,
    pub tokens_used: u32,
}

/// Outcome of a tool-enabled chat turn. `tool_calls` is empty when the
/// model answered directly.
#[derive(Debug, Clone)]
pub struct ToolChatOutcome {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub tokens_used: u32,
}

/// Shared model access for all agents. Applies model override,
/// temperature, and per-phase token budgets from [`ResearchConfig`].
/// Never executes tool calls itself.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn ModelProvider>,
    config: ResearchConfig,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn ModelProvider>, config: ResearchConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    fn base_request(&self, system: &str, user: &str, max_tokens: u32) -> ChatRequest {
        let mut request = ChatRequest::new(vec![Message::system(system), Message::user(user)])
            .with_temperature(self.config.temperature)
            .with_max_tokens(max_tokens);
        if let Some(model) = &self.config.model {
            request = request.with_model(model);
        }
        request
    }

    pub async fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<ChatOutcome, Error> {
        let request = self.base_request(system, user, max_tokens);
        let response = self.provider.complete(request).await?;
        Ok(ChatOutcome {
            content: response.message.content,
            tokens_used: response.usage.total_tokens,
        })
    }

    pub async fn chat_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: Vec<ToolDefinition>,
        max_tokens: u32,
    ) -> Result<ToolChatOutcome, Error> {
        let request = self.base_request(system, user, max_tokens).with_tools(tools);
        let response = self.provider.complete(request).await?;
        Ok(ToolChatOutcome {
            content: response.message.content,
            tool_calls: response.message.tool_calls,
            tokens_used: response.usage.total_tokens,
        })
    }

}
