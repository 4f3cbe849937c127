//! scout-tools: research tools for scout.
//!
//! Every tool normalizes its external API response into a typed result
//! struct serialized as JSON into the tool output. External failures never
//! escape a tool as an error: they become degraded-but-non-empty fallback
//! payloads with the `error` field set, so the model and the sub-agent
//! executor always have structured data to reason about.

pub mod academic;
pub mod config;
pub mod fetch;
pub mod search;
pub mod vector;
pub mod wikipedia;

pub use academic::{AcademicSearchTool, AcademicToolResult, PaperHit};
pub use config::ToolsConfig;
pub use fetch::{FetchToolResult, FetchUrlTool};
pub use search::{SearchHit, SearchToolResult, WebSearchTool};
pub use vector::{VectorSearchTool, VectorToolResult};
pub use wikipedia::WikipediaSearchTool;

use scout_core::ToolRegistry;

/// Build the standard registry with all five research tools.
pub fn standard_registry(config: &ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WebSearchTool::new(config.clone())));
    registry.register(Box::new(FetchUrlTool::new(config.clone())));
    registry.register(Box::new(WikipediaSearchTool::new(config.clone())));
    registry.register(Box::new(AcademicSearchTool::new(config.clone())));
    registry.register(Box::new(VectorSearchTool::new()));
    registry
}
