//! scout-core: Core types and traits for the scout research orchestrator
//!
//! This crate provides the foundational types shared across the workspace:
//! the error taxonomy, chat messages, the model-provider trait, the tool
//! trait and registry, lenient JSON decoding for model output, and the
//! research data model.

pub mod error;
pub mod lenient;
pub mod message;
pub mod provider;
pub mod research;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::Error;
pub use lenient::decode_lenient;
pub use message::{Message, Role, ToolCall, Usage};
pub use provider::{ChatRequest, ChatResponse, ModelProvider, StopReason};
pub use research::{
    clamp_confidence, Citation, Complexity, ResearchPlan, ResearchQuery, ResearchResult,
    SourceType, SubAgentAnalysis, SubAgentOutcome, SubAgentTask, TaskStatus,
};
pub use tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters, ToolRegistry};
