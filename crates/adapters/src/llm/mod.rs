//! LLM adapters implementing the [`Summarizer`] port
//!
//! [`Summarizer`]: xscout_domain::Summarizer

pub mod chat;
pub mod stub;

pub use chat::ChatSummarizer;
pub use stub::StubSummarizer;

use serde::{Deserialize, Serialize};

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "chatgpt-4o-latest".to_string(),
            temperature: 0.4,
            max_tokens: 4000,
            timeout_secs: 120,
        }
    }
}
