//! Single-pass agent for queries that do not warrant the full pipeline:
//! one web search, one summarization turn, no planner or fan-out.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use scout_core::{
    clamp_confidence, decode_lenient, Citation, Complexity, ResearchQuery, ResearchResult,
    SourceType, ToolRegistry,
};
use scout_tools::{SearchHit, SearchToolResult};

use crate::client::ModelClient;
use crate::prompts::SIMPLE_SYSTEM_PROMPT;

const NO_RESULTS_POINT: &str = "No current search results available";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimpleWire {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default = "default_confidence")]
    confidence: f32,
}

fn default_confidence() -> f32 {
    0.5
}

pub struct SimpleAgent {
    client: ModelClient,
    tools: Arc<ToolRegistry>,
}

impl SimpleAgent {
    pub fn new(client: ModelClient, tools: Arc<ToolRegistry>) -> Self {
        Self { client, tools }
    }

    /// Answer a query from one web search pass. Never returns an error;
    /// every failure degrades into a lower-confidence result.
    pub async fn research(&self, query_text: &str) -> ResearchResult {
        let query = ResearchQuery::new(query_text, Complexity::Simple);
        let mut result = ResearchResult::new(&query.id);

        let hits = self.search(query_text).await;
        if hits.is_empty() {
            // No evidence to summarize; skip the model call entirely.
            result.summary = format!(
                "No search results were available for: {query_text}. \
                 Try rephrasing the query or using the full research pipeline."
            );
            result.key_points = vec![NO_RESULTS_POINT.to_string()];
            result.confidence = 0.1;
            return result;
        }

        result.citations = hits
            .iter()
            .map(|hit| {
                let mut citation = Citation::new(&hit.title, SourceType::Web, hit.score);
                citation = citation.with_url(&hit.url);
                if !hit.snippet.is_empty() {
                    citation = citation.with_snippet(&hit.snippet);
                }
                citation
            })
            .collect();

        let user = render_hits_prompt(query_text, &hits);
        match self
            .client
            .chat(SIMPLE_SYSTEM_PROMPT, &user, self.client.config().max_tokens)
            .await
        {
            Ok(outcome) => {
                result.tokens_used = outcome.tokens_used;
                match decode_lenient(&outcome.content)
                    .and_then(|v| serde_json::from_value::<SimpleWire>(v).map_err(Into::into))
                {
                    Ok(wire) if !wire.summary.trim().is_empty() => {
                        result.summary = wire.summary;
                        result.key_points = wire.key_points;
                        result.confidence = clamp_confidence(wire.confidence);
                    }
                    _ => {
                        warn!("Simple agent summary unusable, falling back to snippets");
                        fill_from_hits(&mut result, &hits);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Simple agent model call failed");
                fill_from_hits(&mut result, &hits);
            }
        }
        result
    }

    /// Run the web_search tool and decode its result payload. Any failure
    /// along the way reads as zero hits.
    async fn search(&self, query_text: &str) -> Vec<SearchHit> {
        let Some(tool) = self.tools.get("web_search") else {
            warn!("web_search tool not registered");
            return Vec::new();
        };
        let output = match tool
            .execute(serde_json::json!({ "query": query_text }))
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "web_search execution failed");
                return Vec::new();
            }
        };
        match serde_json::from_str::<SearchToolResult>(&output.content) {
            Ok(parsed) => {
                debug!(hits = parsed.results.len(), "Search complete");
                parsed.results
            }
            Err(e) => {
                warn!(error = %e, "web_search payload unreadable");
                Vec::new()
            }
        }
    }
}

fn render_hits_prompt(query_text: &str, hits: &[SearchHit]) -> String {
    let mut prompt = format!("Query: {query_text}\n\n## Search results\n\n");
    for (idx, hit) in hits.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} ({})\n{}\n\n",
            idx + 1,
            hit.title,
            hit.url,
            hit.snippet
        ));
    }
    prompt.push_str("Summarize the results.");
    prompt
}

/// Summary straight from the snippets when the model is unavailable.
fn fill_from_hits(result: &mut ResearchResult, hits: &[SearchHit]) {
    result.summary = hits
        .iter()
        .map(|h| h.snippet.as_str())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if result.summary.is_empty() {
        result.summary = hits
            .iter()
            .map(|h| h.title.as_str())
            .collect::<Vec<_>>()
            .join("; ");
    }
    result.key_points = hits.iter().take(3).map(|h| h.title.clone()).collect();
    result.confidence = 0.4;
}
