//! Data model for a single research call: query, plan, sub-agent tasks,
//! citations, and the final result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query complexity tier, used by the planner to size the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::Complex => write!(f, "complex"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchQuery {
    pub id: String,
    pub query: String,
    pub complexity: Complexity,
}

impl ResearchQuery {
    pub fn new(query: impl Into<String>, complexity: Complexity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.into(),
            complexity,
        }
    }
}

/// Produced once per query by the planner; read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub id: String,
    pub query_id: String,
    pub approach: String,
    pub sub_tasks: Vec<String>,
    pub estimated_complexity: u32,
    pub estimated_time: u32,
    pub tools_required: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Structured analysis a sub-agent distills from its tool results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAgentAnalysis {
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub key_facts: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub gaps: String,
}

fn default_confidence() -> f32 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubAgentOutcome {
    Analysis(SubAgentAnalysis),
    Error { error: String },
}

/// One independently executed sub-task within a plan.
///
/// Status moves `Active -> Completed` or `Active -> Failed` exactly once;
/// the task is immutable after reaching a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAgentTask {
    pub id: String,
    pub parent_query_id: String,
    pub task: String,
    pub objective: String,
    pub tools_to_use: Vec<String>,
    pub status: TaskStatus,
    pub results: Option<SubAgentOutcome>,
    pub tokens_used: u32,
    pub created_at: DateTime<Utc>,
}

impl SubAgentTask {
    pub fn new(
        parent_query_id: impl Into<String>,
        task: impl Into<String>,
        objective: impl Into<String>,
        tools_to_use: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            parent_query_id: parent_query_id.into(),
            task: task.into(),
            objective: objective.into(),
            tools_to_use,
            status: TaskStatus::Active,
            results: None,
            tokens_used: 0,
            created_at: Utc::now(),
        }
    }

    pub fn complete(&mut self, analysis: SubAgentAnalysis, tokens_used: u32) {
        debug_assert_eq!(self.status, TaskStatus::Active, "double terminal transition");
        self.status = TaskStatus::Completed;
        self.results = Some(SubAgentOutcome::Analysis(analysis));
        self.tokens_used = tokens_used;
    }

    pub fn fail(&mut self, error: impl Into<String>, tokens_used: u32) {
        debug_assert_eq!(self.status, TaskStatus::Active, "double terminal transition");
        self.status = TaskStatus::Failed;
        self.results = Some(SubAgentOutcome::Error {
            error: error.into(),
        });
        self.tokens_used = tokens_used;
    }

    pub fn analysis(&self) -> Option<&SubAgentAnalysis> {
        match &self.results {
            Some(SubAgentOutcome::Analysis(a)) => Some(a),
            _ => None,
        }
    }
}

/// Canonical source categories for citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Web,
    Academic,
    Document,
    Internal,
    Disclosure,
    News,
    Reference,
    Other,
}

impl SourceType {
    /// Total mapping from free-text source labels. Case-insensitive;
    /// anything unrecognized is `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "web" | "website" | "webpage" => SourceType::Web,
            "academic" | "paper" | "journal" | "scholarly" => SourceType::Academic,
            "document" | "pdf" | "report" => SourceType::Document,
            "internal" | "system" => SourceType::Internal,
            "disclosure" | "filing" | "regulatory" => SourceType::Disclosure,
            "news" | "article" | "press" => SourceType::News,
            "reference" | "encyclopedia" | "wiki" | "wikipedia" => SourceType::Reference,
            _ => SourceType::Other,
        }
    }
}

impl From<&str> for SourceType {
    fn from(raw: &str) -> Self {
        SourceType::parse(raw)
    }
}

/// Produced only by the synthesizer (or simple agent); never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub confidence: f32,
    pub date_accessed: DateTime<Utc>,
}

impl Citation {
    pub fn new(title: impl Into<String>, source_type: SourceType, confidence: f32) -> Self {
        Self {
            title: title.into(),
            url: None,
            source_type,
            snippet: None,
            confidence: clamp_confidence(confidence),
            date_accessed: Utc::now(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// Terminal output of a research call; immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub id: String,
    pub query_id: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub citations: Vec<Citation>,
    pub confidence: f32,
    pub tokens_used: u32,
    pub time_elapsed_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl ResearchResult {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query_id: query_id.into(),
            summary: String::new(),
            key_points: Vec::new(),
            citations: Vec::new(),
            confidence: 0.0,
            tokens_used: 0,
            time_elapsed_ms: 0,
            created_at: Utc::now(),
        }
    }
}

/// Clamp a model-reported confidence into [0, 1]. NaN maps to 0.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
