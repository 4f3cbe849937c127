//! scout-provider: hosted model API client for scout.

mod anthropic;

pub use anthropic::AnthropicProvider;
