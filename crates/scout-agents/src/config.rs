/// Immutable configuration for one research pipeline.
///
/// All model knobs live here and are passed into each component at
/// construction, so tests can inject deterministic stub configurations.
/// The low default temperature biases the model toward the structured JSON
/// output the rest of the pipeline depends on.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Model identifier; `None` defers to the provider's default.
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Token budget for the planning call.
    pub planner_max_tokens: u32,
    /// Token budget for each sub-agent call.
    pub subagent_max_tokens: u32,
    /// Token budget for the synthesis call.
    pub synthesis_max_tokens: u32,
    /// Upper bound the planner prompt asks for. Plans exceeding it are still
    /// accepted and fanned out; the bound is a prompt contract, not a gate.
    pub max_sub_tasks: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4000,
            temperature: 0.1,
            planner_max_tokens: 2000,
            subagent_max_tokens: 4000,
            synthesis_max_tokens: 4000,
            max_sub_tasks: 6,
        }
    }
}

impl ResearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResearchConfig::default();
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_sub_tasks, 6);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ResearchConfig::new()
            .with_model("claude-sonnet-4-20250514")
            .with_temperature(0.0);
        assert_eq!(config.model.as_deref(), Some("claude-sonnet-4-20250514"));
        assert_eq!(config.temperature, 0.0);
    }
}
