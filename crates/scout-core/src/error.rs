use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON parse failure: {snippet}")]
    JsonParse { snippet: String },

    #[error("Tool error: {tool} - {message}")]
    Tool { tool: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Build a `JsonParse` error carrying the first 500 characters of the
    /// raw content for diagnostics.
    pub fn json_parse(raw: &str) -> Self {
        Self::JsonParse {
            snippet: raw.chars().take(500).collect(),
        }
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(message.into())
    }

    /// True when the model API is signalling a capacity problem: HTTP 529,
    /// rate limiting, or an overload message in the body. These route the
    /// orchestrator to its degraded-fallback result instead of a retry.
    pub fn is_capacity(&self) -> bool {
        match self {
            Error::Api { status: 529, .. } => true,
            Error::RateLimit(_) => true,
            Error::Api { message, .. } | Error::Network(message) | Error::Unknown(message) => {
                let lower = message.to_lowercase();
                lower.contains("service temporarily unavailable") || lower.contains("overloaded")
            }
            _ => false,
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Error::JsonParse { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::api(400, "Bad request");
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("Bad request"));
    }

    #[test]
    fn test_is_capacity() {
        assert!(Error::api(529, "Overloaded").is_capacity());
        assert!(Error::rate_limit("too many requests").is_capacity());
        assert!(Error::api(500, "Service temporarily unavailable").is_capacity());
        assert!(Error::Unknown("model overloaded, try later".into()).is_capacity());
        assert!(!Error::api(400, "bad input").is_capacity());
        assert!(!Error::auth("invalid key").is_capacity());
    }

    #[test]
    fn test_json_parse_snippet_truncation() {
        let raw = "x".repeat(2000);
        match Error::json_parse(&raw) {
            Error::JsonParse { snippet } => assert_eq!(snippet.chars().count(), 500),
            _ => panic!("expected JsonParse"),
        }
    }

    #[test]
    fn test_json_parse_snippet_char_boundary() {
        let raw = "é".repeat(600);
        match Error::json_parse(&raw) {
            Error::JsonParse { snippet } => assert_eq!(snippet.chars().count(), 500),
            _ => panic!("expected JsonParse"),
        }
    }
}
