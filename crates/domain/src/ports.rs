//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{Post, SourceKind};

/// Error type for post source operations
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Rate limited, retry after: {0:?}")]
    RateLimited(Option<std::time::Duration>),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Port for fetching posts from a source platform
///
/// Implementations perform their own HTTP calls, apply the lookback window
/// through their API's native filter, deduplicate by source-native ID, and
/// normalize results into [`Post`].
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Which platform this source reads from
    fn kind(&self) -> SourceKind;

    /// Fetch posts matching the topic within the lookback window
    async fn fetch(&self, topic: &str, lookback_hours: i64) -> Result<Vec<Post>, SourceError>;
}

/// Error type for brief generation
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Empty completion")]
    Empty,
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Port for the LLM endpoint that turns collected posts into a brief
///
/// Called exactly once per run; failures are fatal and never retried.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate a brief from the system prompt and the post payload
    async fn summarize(
        &self,
        system_prompt: &str,
        user_payload: &str,
    ) -> Result<String, SummarizeError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
