//! Sub-agent execution: one sub-task, a tool-use pass, and a structured
//! analysis of what the tools returned.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use scout_core::{
    clamp_confidence, decode_lenient, Error, ResearchPlan, ResearchQuery, SubAgentAnalysis,
    SubAgentTask, ToolCall, ToolRegistry,
};

use crate::client::ModelClient;
use crate::prompts::{
    analysis_user_prompt, subagent_system_prompt, subagent_user_prompt, SUBAGENT_ANALYSIS_PROMPT,
};

pub struct SubAgentExecutor {
    client: ModelClient,
    tools: Arc<ToolRegistry>,
}

impl SubAgentExecutor {
    pub fn new(client: ModelClient, tools: Arc<ToolRegistry>) -> Self {
        Self { client, tools }
    }

    /// Run every sub-task of the plan concurrently. Each returned task is in
    /// a terminal state; one sub-agent failing never aborts its siblings.
    pub async fn run_all(
        &self,
        query: &ResearchQuery,
        plan: &ResearchPlan,
    ) -> Vec<SubAgentTask> {
        let futures = plan
            .sub_tasks
            .iter()
            .map(|task| self.run(task, query, plan));
        join_all(futures).await
    }

    /// Execute one sub-task to a terminal state. Never returns an error:
    /// model failures are recorded on the task as `Failed`.
    pub async fn run(
        &self,
        task_text: &str,
        query: &ResearchQuery,
        plan: &ResearchPlan,
    ) -> SubAgentTask {
        let tool_names: Vec<String> = if plan.tools_required.is_empty() {
            self.tools.names().iter().map(|s| s.to_string()).collect()
        } else {
            plan.tools_required.clone()
        };
        let mut task = SubAgentTask::new(
            &query.id,
            task_text,
            format!("Contribute to: {}", plan.approach),
            tool_names.clone(),
        );

        let definitions = if plan.tools_required.is_empty() {
            self.tools.definitions()
        } else {
            self.tools.definitions_for(&plan.tools_required)
        };

        let system = subagent_system_prompt(&tool_names);
        let user = subagent_user_prompt(task_text, &query.query);
        let budget = self.client.config().subagent_max_tokens;

        let first = match self
            .client
            .chat_with_tools(&system, &user, definitions, budget)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(task = %task.id, error = %e, "Sub-agent model call failed");
                task.fail(e.to_string(), 0);
                return task;
            }
        };

        if first.tool_calls.is_empty() {
            // Model answered directly without gathering evidence.
            let analysis = self.parse_analysis(&first.content);
            task.complete(analysis, first.tokens_used);
            return task;
        }

        debug!(
            task = %task.id,
            calls = first.tool_calls.len(),
            "Executing proposed tool calls"
        );
        let transcript = self.execute_tool_calls(&first.tool_calls).await;

        let analysis_user = analysis_user_prompt(task_text, &transcript);
        match self
            .client
            .chat(SUBAGENT_ANALYSIS_PROMPT, &analysis_user, budget)
            .await
        {
            Ok(second) => {
                let analysis = self.parse_analysis(&second.content);
                task.complete(analysis, first.tokens_used + second.tokens_used);
            }
            Err(e) => {
                warn!(task = %task.id, error = %e, "Sub-agent analysis call failed");
                task.fail(e.to_string(), first.tokens_used);
            }
        }
        task
    }

    /// Execute proposed tool calls in order and render one transcript.
    /// Individual call failures become inline error lines rather than
    /// aborting the sub-agent.
    async fn execute_tool_calls(&self, calls: &[ToolCall]) -> String {
        let mut transcript = String::new();
        for call in calls {
            let rendered = match self.tools.get(&call.name) {
                Some(tool) => match tool.execute(call.arguments.clone()).await {
                    Ok(output) => output.content,
                    Err(e) => format!("Tool error: {e}"),
                },
                None => format!("Tool error: unknown tool '{}'", call.name),
            };
            transcript.push_str(&format!("## {} ({})\n{}\n\n", call.name, call.id, rendered));
        }
        transcript
    }

    /// Decode the analysis JSON. If the text is neither JSON nor a
    /// conversational refusal, keep it verbatim as free-text findings
    /// instead of discarding the work.
    fn parse_analysis(&self, raw: &str) -> SubAgentAnalysis {
        match decode_lenient(raw).and_then(|value| {
            serde_json::from_value::<SubAgentAnalysis>(value).map_err(Error::from)
        }) {
            Ok(mut analysis) => {
                analysis.confidence = clamp_confidence(analysis.confidence);
                analysis
            }
            Err(e) => {
                warn!(error = %e, "Analysis not structured, keeping raw text");
                SubAgentAnalysis {
                    findings: raw.to_string(),
                    key_facts: Vec::new(),
                    sources: Vec::new(),
                    confidence: 0.7,
                    gaps: "Response was not structured; findings kept verbatim".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use scout_core::testing::MockProvider;
    use scout_core::{
        ChatResponse, Complexity, Message, StopReason, TaskStatus, Tool, ToolDefinition,
        ToolOutput, Usage,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::config::ResearchConfig;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its arguments"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name(), self.description())
        }

        async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
            Ok(ToolOutput::success(arguments.to_string()))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name(), self.description())
        }

        async fn execute(&self, _arguments: Value) -> Result<ToolOutput, Error> {
            Err(Error::tool("broken", "bad arguments"))
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(BrokenTool));
        Arc::new(registry)
    }

    fn executor(provider: Arc<MockProvider>) -> SubAgentExecutor {
        SubAgentExecutor::new(
            ModelClient::new(provider, ResearchConfig::default()),
            registry(),
        )
    }

    fn tool_call_response(calls: Vec<ToolCall>) -> ChatResponse {
        ChatResponse {
            message: Message::assistant_with_tool_calls("", calls),
            usage: Usage::new(15, 5),
            model: "mock-model".to_string(),
            stop_reason: StopReason::ToolUse,
        }
    }

    fn plan_for(query: &ResearchQuery, tools_required: Vec<String>) -> ResearchPlan {
        ResearchPlan {
            id: "plan-1".to_string(),
            query_id: query.id.clone(),
            approach: "direct".to_string(),
            sub_tasks: vec!["investigate".to_string()],
            estimated_complexity: 1,
            estimated_time: 30,
            tools_required,
        }
    }

    #[tokio::test]
    async fn test_direct_answer_without_tools() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response(
            r#"{"findings": "direct", "keyFacts": ["f1"], "sources": [], "confidence": 0.8, "gaps": ""}"#,
        );
        let query = ResearchQuery::new("q", Complexity::Simple);
        let plan = plan_for(&query, vec!["echo".to_string()]);

        let task = executor(provider.clone()).run("investigate", &query, &plan).await;
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.analysis().unwrap().findings, "direct");
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_tool_call_round_trip() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_raw_response(tool_call_response(vec![ToolCall::new(
            "tc_1",
            "echo",
            json!({"query": "rust"}),
        )]));
        provider.queue_response(
            r#"{"findings": "echoed", "keyFacts": [], "sources": ["https://example.com"], "confidence": 0.9, "gaps": ""}"#,
        );
        let query = ResearchQuery::new("q", Complexity::Simple);
        let plan = plan_for(&query, vec!["echo".to_string()]);

        let task = executor(provider.clone()).run("investigate", &query, &plan).await;
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.tokens_used, 40);
        assert_eq!(provider.request_count(), 2);

        // Analysis turn must carry the tool transcript
        let analysis_request = provider.last_request().unwrap();
        let user = &analysis_request.messages[1];
        assert!(user.content.contains("## echo (tc_1)"));
        assert!(user.content.contains("rust"));
    }

    #[tokio::test]
    async fn test_erroring_tool_still_reaches_terminal_state() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_raw_response(tool_call_response(vec![
            ToolCall::new("tc_1", "broken", json!({})),
            ToolCall::new("tc_2", "no_such_tool", json!({})),
        ]));
        provider.queue_response(r#"{"findings": "partial", "confidence": 0.4}"#);
        let query = ResearchQuery::new("q", Complexity::Simple);
        let plan = plan_for(&query, vec!["broken".to_string()]);

        let task = executor(provider.clone()).run("investigate", &query, &plan).await;
        assert!(task.status.is_terminal());
        assert_eq!(task.status, TaskStatus::Completed);

        let analysis_request = provider.last_request().unwrap();
        assert!(analysis_request.messages[1].content.contains("Tool error"));
    }

    #[tokio::test]
    async fn test_model_failure_marks_task_failed() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_error(Error::network("connection reset"));
        let query = ResearchQuery::new("q", Complexity::Simple);
        let plan = plan_for(&query, vec!["echo".to_string()]);

        let task = executor(provider).run("investigate", &query, &plan).await;
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.analysis().is_none());
    }

    #[tokio::test]
    async fn test_unstructured_analysis_kept_verbatim() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response("Here are my observations about the topic in plain prose.");
        let query = ResearchQuery::new("q", Complexity::Simple);
        let plan = plan_for(&query, vec!["echo".to_string()]);

        let task = executor(provider).run("investigate", &query, &plan).await;
        assert_eq!(task.status, TaskStatus::Completed);
        let analysis = task.analysis().unwrap();
        assert!(analysis.findings.contains("plain prose"));
        assert_eq!(analysis.confidence, 0.7);
    }

    #[tokio::test]
    async fn test_run_all_fans_out_per_sub_task() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response(r#"{"findings": "one", "confidence": 0.8}"#);
        provider.queue_response(r#"{"findings": "two", "confidence": 0.8}"#);
        let query = ResearchQuery::new("q", Complexity::Medium);
        let mut plan = plan_for(&query, vec!["echo".to_string()]);
        plan.sub_tasks = vec!["first".to_string(), "second".to_string()];

        let exec = executor(provider.clone());
        let tasks = exec.run_all(&query, &plan).await;
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Completed));
        assert_eq!(provider.request_count(), 2);

        // Same plan again with fresh queued responses: same fan-out shape
        provider.queue_response(r#"{"findings": "one", "confidence": 0.8}"#);
        provider.queue_response(r#"{"findings": "two", "confidence": 0.8}"#);
        let again = exec.run_all(&query, &plan).await;
        assert_eq!(again.len(), tasks.len());
        assert!(again.iter().all(|t| t.status.is_terminal()));
    }
}
