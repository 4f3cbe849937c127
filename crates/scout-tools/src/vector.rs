//! Declared-but-stubbed vector store lookup.
//!
//! The tool is advertised to the model so plans can reference it, but the
//! vector store behind it is not wired up yet. It always answers with an
//! explicit empty result, never an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use scout_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

const PENDING_NOTE: &str = "vector store integration pending";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorToolResult {
    pub query: String,
    pub results: Vec<serde_json::Value>,
    pub note: String,
}

#[derive(Deserialize)]
struct VectorSearchArgs {
    query: String,
    #[serde(default)]
    #[allow(dead_code)]
    top_k: Option<u32>,
}

#[derive(Default)]
pub struct VectorSearchTool;

impl VectorSearchTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for VectorSearchTool {
    fn name(&self) -> &str {
        "vector_search"
    }

    fn description(&self) -> &str {
        "Search the internal document vector store for semantically related passages."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("query", PropertySchema::string("The semantic query"), true)
                .add_property(
                    "top_k",
                    PropertySchema::integer("Number of passages to return")
                        .with_default(serde_json::json!(5)),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: VectorSearchArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool("vector_search", format!("Invalid arguments: {e}")))?;

        let result = VectorToolResult {
            query: args.query,
            results: Vec::new(),
            note: PENDING_NOTE.to_string(),
        };

        Ok(ToolOutput::success(serde_json::to_string(&result)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_returns_pending_empty_result() {
        let tool = VectorSearchTool::new();
        let output = tool
            .execute(serde_json::json!({"query": "internal docs", "top_k": 3}))
            .await
            .unwrap();
        assert!(!output.is_error);

        let result: VectorToolResult = serde_json::from_str(&output.content).unwrap();
        assert!(result.results.is_empty());
        assert_eq!(result.note, PENDING_NOTE);
    }
}
