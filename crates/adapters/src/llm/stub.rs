//! Stub summarizer for tests and offline runs

use async_trait::async_trait;
use xscout_domain::{SummarizeError, Summarizer};

/// Summarizer that returns a canned brief without any network call
pub struct StubSummarizer {
    text: String,
}

impl StubSummarizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Stub that echoes the payload back, useful for prompt assertions
    pub fn echo() -> Self {
        Self {
            text: String::new(),
        }
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(
        &self,
        _system_prompt: &str,
        user_payload: &str,
    ) -> Result<String, SummarizeError> {
        if self.text.is_empty() {
            Ok(user_payload.to_string())
        } else {
            Ok(self.text.clone())
        }
    }
}
