//! Final synthesis: merge completed sub-agent analyses into one report
//! with citations.

use serde::Deserialize;
use tracing::debug;

use scout_core::{
    clamp_confidence, decode_lenient, Citation, Error, ResearchPlan, ResearchQuery, SourceType,
    SubAgentTask, TaskStatus,
};

use crate::client::ModelClient;
use crate::prompts::SYNTHESIS_SYSTEM_PROMPT;

/// Synthesizer output, before it is folded into a `ResearchResult`.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub summary: String,
    pub key_points: Vec<String>,
    pub citations: Vec<Citation>,
    pub confidence: f32,
    pub tokens_used: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisWire {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    citations: Vec<CitationWire>,
    #[serde(default = "default_confidence")]
    confidence: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CitationWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source_type: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default = "default_citation_confidence")]
    confidence: f32,
}

fn default_confidence() -> f32 {
    0.5
}

fn default_citation_confidence() -> f32 {
    0.6
}

pub struct Synthesizer {
    client: ModelClient,
}

impl Synthesizer {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Synthesize the final report from completed sub-agent tasks.
    ///
    /// Unlike planning and sub-agent execution, synthesis failures propagate:
    /// without a synthesized report there is nothing meaningful to return,
    /// and the orchestrator owns the degraded-result fallback. An all-failed
    /// fan-out is not a failure here: the call proceeds with an empty
    /// findings set and the result's confidence carries the quality signal.
    pub async fn synthesize(
        &self,
        query: &ResearchQuery,
        plan: &ResearchPlan,
        tasks: &[SubAgentTask],
    ) -> Result<Synthesis, Error> {
        let completed: Vec<&SubAgentTask> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();
        debug!(
            completed = completed.len(),
            failed = tasks.len() - completed.len(),
            "Synthesizing sub-agent findings"
        );

        let user = build_synthesis_prompt(query, plan, &completed);
        let outcome = self
            .client
            .chat(
                SYNTHESIS_SYSTEM_PROMPT,
                &user,
                self.client.config().synthesis_max_tokens,
            )
            .await?;

        let value = decode_lenient(&outcome.content)?;
        let wire: SynthesisWire = serde_json::from_value(value)?;
        if wire.summary.trim().is_empty() {
            return Err(Error::synthesis("synthesis produced an empty summary"));
        }

        let citations = wire
            .citations
            .into_iter()
            .map(|c| {
                let mut citation = Citation::new(
                    c.title,
                    SourceType::parse(&c.source_type),
                    c.confidence,
                );
                if let Some(url) = c.url {
                    citation = citation.with_url(url);
                }
                if let Some(snippet) = c.snippet {
                    citation = citation.with_snippet(snippet);
                }
                citation
            })
            .collect();

        Ok(Synthesis {
            summary: wire.summary,
            key_points: wire.key_points,
            citations,
            confidence: clamp_confidence(wire.confidence),
            tokens_used: outcome.tokens_used,
        })
    }
}

fn build_synthesis_prompt(
    query: &ResearchQuery,
    plan: &ResearchPlan,
    completed: &[&SubAgentTask],
) -> String {
    let mut prompt = format!(
        "Research query: {}\nApproach: {}\n\n## Sub-agent findings\n\n",
        query.query, plan.approach
    );
    for (idx, task) in completed.iter().enumerate() {
        let Some(analysis) = task.analysis() else {
            continue;
        };
        prompt.push_str(&format!(
            "### Sub-agent {} ({})\nFindings: {}\nKey facts: {}\nSources: {}\nConfidence: {}\nGaps: {}\n\n",
            idx + 1,
            task.task,
            analysis.findings,
            analysis.key_facts.join("; "),
            analysis.sources.join(", "),
            analysis.confidence,
            analysis.gaps,
        ));
    }
    prompt.push_str("Produce the final synthesis.");
    prompt
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scout_core::testing::MockProvider;
    use scout_core::{Complexity, SubAgentAnalysis};

    use super::*;
    use crate::config::ResearchConfig;

    fn synthesizer(provider: Arc<MockProvider>) -> Synthesizer {
        Synthesizer::new(ModelClient::new(provider, ResearchConfig::default()))
    }

    fn fixture() -> (ResearchQuery, ResearchPlan, Vec<SubAgentTask>) {
        let query = ResearchQuery::new("impact of X", Complexity::Medium);
        let plan = ResearchPlan {
            id: "plan-1".to_string(),
            query_id: query.id.clone(),
            approach: "two angles".to_string(),
            sub_tasks: vec!["a".to_string(), "b".to_string()],
            estimated_complexity: 2,
            estimated_time: 60,
            tools_required: vec![],
        };

        let mut completed = SubAgentTask::new(&query.id, "a", "obj", vec![]);
        completed.complete(
            SubAgentAnalysis {
                findings: "X increased by 40%".to_string(),
                key_facts: vec!["40% growth".to_string()],
                sources: vec!["https://example.com/x".to_string()],
                confidence: 0.85,
                gaps: String::new(),
            },
            100,
        );
        let mut failed = SubAgentTask::new(&query.id, "b", "obj", vec![]);
        failed.fail("timeout", 0);

        (query, plan, vec![completed, failed])
    }

    #[tokio::test]
    async fn test_synthesis_parses_citations() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response(
            r#"{"summary": "X grew substantially.",
                "keyPoints": ["40% growth"],
                "citations": [{"title": "X report", "url": "https://example.com/x",
                               "sourceType": "news", "snippet": "up 40%", "confidence": 1.4}],
                "confidence": 0.8}"#,
        );
        let (query, plan, tasks) = fixture();

        let synthesis = synthesizer(provider.clone())
            .synthesize(&query, &plan, &tasks)
            .await
            .unwrap();
        assert_eq!(synthesis.key_points, vec!["40% growth".to_string()]);
        assert_eq!(synthesis.citations.len(), 1);
        assert_eq!(synthesis.citations[0].source_type, SourceType::News);
        assert_eq!(synthesis.citations[0].confidence, 1.0);
        assert_eq!(synthesis.tokens_used, 20);

        // Only the completed task's findings reach the prompt
        let request = provider.last_request().unwrap();
        assert!(request.messages[1].content.contains("X increased by 40%"));
        assert!(!request.messages[1].content.contains("timeout"));
    }

    #[tokio::test]
    async fn test_no_completed_tasks_still_calls_the_model() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response(
            r#"{"summary": "No sub-agent findings were available.", "keyPoints": [],
                "citations": [], "confidence": 0.2}"#,
        );
        let (query, plan, _) = fixture();
        let mut failed = SubAgentTask::new(&query.id, "a", "obj", vec![]);
        failed.fail("boom", 0);

        let synthesis = synthesizer(provider.clone())
            .synthesize(&query, &plan, &[failed])
            .await
            .unwrap();
        assert_eq!(provider.request_count(), 1);
        assert_eq!(synthesis.confidence, 0.2);

        // Prompt carries an empty findings section, not the failure text
        let request = provider.last_request().unwrap();
        assert!(request.messages[1].content.contains("## Sub-agent findings"));
        assert!(!request.messages[1].content.contains("boom"));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_error(Error::api(529, "Service temporarily unavailable"));
        let (query, plan, tasks) = fixture();

        let err = synthesizer(provider)
            .synthesize(&query, &plan, &tasks)
            .await
            .unwrap_err();
        assert!(err.is_capacity());
    }

    #[tokio::test]
    async fn test_unknown_source_type_maps_to_other() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response(
            r#"{"summary": "s", "keyPoints": [],
                "citations": [{"title": "t", "sourceType": "carrier pigeon"}],
                "confidence": 0.5}"#,
        );
        let (query, plan, tasks) = fixture();

        let synthesis = synthesizer(provider)
            .synthesize(&query, &plan, &tasks)
            .await
            .unwrap();
        assert_eq!(synthesis.citations[0].source_type, SourceType::Other);
        assert_eq!(synthesis.citations[0].confidence, 0.6);
    }
}
