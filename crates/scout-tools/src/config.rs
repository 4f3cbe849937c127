/// Connection settings for the research tools.
///
/// Base URLs are overridable so tests can point tools at unreachable
/// endpoints and exercise the fallback paths without the network.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Search API key. Absent key degrades `web_search` to constructed
    /// fallback links; it never fails construction.
    pub serpapi_key: Option<String>,
    pub search_base_url: String,
    pub reader_base_url: String,
    pub wikipedia_base_url: String,
    pub academic_base_url: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            serpapi_key: None,
            search_base_url: "https://serpapi.com/search".to_string(),
            reader_base_url: "https://r.jina.ai".to_string(),
            wikipedia_base_url: "https://en.wikipedia.org/w/api.php".to_string(),
            academic_base_url: "https://api.semanticscholar.org/graph/v1/paper/search"
                .to_string(),
        }
    }
}

impl ToolsConfig {
    /// Read the search key from `SERPAPI_API_KEY`, keeping default endpoints.
    pub fn from_env() -> Self {
        Self {
            serpapi_key: std::env::var("SERPAPI_API_KEY").ok().filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    pub fn with_serpapi_key(mut self, key: impl Into<String>) -> Self {
        self.serpapi_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_key() {
        let config = ToolsConfig::default();
        assert!(config.serpapi_key.is_none());
        assert!(config.search_base_url.starts_with("https://"));
    }
}
