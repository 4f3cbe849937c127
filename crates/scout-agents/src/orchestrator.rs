//! Pipeline coordinator: plan, fan out sub-agents, synthesize.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use scout_core::{
    Citation, Complexity, Error, ModelProvider, ResearchQuery, ResearchResult, SourceType,
    TaskStatus, ToolRegistry,
};

use crate::client::ModelClient;
use crate::config::ResearchConfig;
use crate::planner::Planner;
use crate::subagent::SubAgentExecutor;
use crate::synthesizer::{Synthesis, Synthesizer};

pub struct ResearchOrchestrator {
    planner: Planner,
    executor: SubAgentExecutor,
    synthesizer: Synthesizer,
}

impl ResearchOrchestrator {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        tools: Arc<ToolRegistry>,
        config: ResearchConfig,
    ) -> Self {
        let client = ModelClient::new(provider, config);
        Self {
            planner: Planner::new(client.clone()),
            executor: SubAgentExecutor::new(client.clone(), tools),
            synthesizer: Synthesizer::new(client),
        }
    }

    /// Run the full pipeline for one query. Always resolves: any pipeline
    /// failure is folded into a degraded result rather than an `Err`, so
    /// callers get a usable report object no matter what happened upstream.
    pub async fn conduct_research(
        &self,
        query_text: &str,
        complexity: Complexity,
    ) -> ResearchResult {
        let started = Instant::now();
        let query = ResearchQuery::new(query_text, complexity);
        info!(query_id = %query.id, %complexity, "Research started");

        let mut result = match self.run_pipeline(&query).await {
            Ok(result) => result,
            Err(e) => {
                error!(query_id = %query.id, error = %e, "Research pipeline failed");
                degraded_result(&query, &e)
            }
        };
        result.time_elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            query_id = %query.id,
            confidence = result.confidence,
            tokens = result.tokens_used,
            elapsed_ms = result.time_elapsed_ms,
            "Research finished"
        );
        result
    }

    async fn run_pipeline(&self, query: &ResearchQuery) -> Result<ResearchResult, Error> {
        let (plan, planner_tokens) = self.planner.create_plan(query).await?;
        info!(
            query_id = %query.id,
            sub_tasks = plan.sub_tasks.len(),
            "Plan ready, dispatching sub-agents"
        );

        let tasks = self.executor.run_all(query, &plan).await;
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        info!(
            query_id = %query.id,
            completed,
            failed = tasks.len() - completed,
            "Sub-agents finished"
        );

        let synthesis = self.synthesizer.synthesize(query, &plan, &tasks).await?;
        let subagent_tokens: u32 = tasks.iter().map(|t| t.tokens_used).sum();

        Ok(assemble_result(
            query,
            synthesis,
            planner_tokens + subagent_tokens,
        ))
    }
}

fn assemble_result(
    query: &ResearchQuery,
    synthesis: Synthesis,
    upstream_tokens: u32,
) -> ResearchResult {
    let mut result = ResearchResult::new(&query.id);
    result.summary = synthesis.summary;
    result.key_points = synthesis.key_points;
    result.citations = synthesis.citations;
    result.confidence = synthesis.confidence;
    result.tokens_used = upstream_tokens + synthesis.tokens_used;
    result
}

/// The terminal fallback when the pipeline cannot produce a report.
/// Low confidence, zero tokens, and a single internal citation carrying
/// the failure reason.
fn degraded_result(query: &ResearchQuery, error: &Error) -> ResearchResult {
    let mut result = ResearchResult::new(&query.id);
    result.summary = format!(
        "Research could not be completed for: {}. The service was unavailable \
         or returned unusable output; partial infrastructure links may still help.",
        query.query
    );
    result.key_points = vec!["Research pipeline unavailable".to_string()];
    result.citations = vec![Citation::new(
        "Research System Notice",
        SourceType::Internal,
        0.2,
    )
    .with_snippet(truncate(&error.to_string(), 500))];
    result.confidence = 0.2;
    result.tokens_used = 0;
    result
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
