//! Brief pipeline use case - fetch, merge, dedupe, summarize
//!
//! Sequential by design: sources are fetched one after another and the LLM
//! endpoint is called exactly once. A fetch failure aborts the run when a
//! single source was requested and is logged and skipped otherwise.

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{Brief, Post, SortOrder, SourceKind};
use crate::ports::{Clock, PostSource, SourceError, SummarizeError, Summarizer};
use crate::usecases::prompt::{DEFAULT_FOCUS, build_system_prompt, build_user_payload};

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Topic focus; `None` uses the default focus for both queries and prompt
    pub topic: Option<String>,
    /// How far back sources search
    pub lookback_hours: i64,
    /// Maximum posts kept after merge and sort
    pub max_posts: usize,
    /// Ordering applied before truncation
    pub sort: SortOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            topic: None,
            lookback_hours: 24,
            max_posts: 200,
            sort: SortOrder::Recency,
        }
    }
}

/// Error type for pipeline runs
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No sources configured")]
    NoSources,
    #[error("Fetch from {kind} failed: {error}")]
    Fetch {
        kind: SourceKind,
        error: SourceError,
    },
    #[error("Brief generation failed: {0}")]
    Summarize(#[from] SummarizeError),
}

/// Orchestrates fetch, dedupe, prompt assembly, and the single LLM call
pub struct BriefPipeline {
    sources: Vec<Arc<dyn PostSource>>,
    summarizer: Arc<dyn Summarizer>,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
}

impl BriefPipeline {
    pub fn new(
        sources: Vec<Arc<dyn PostSource>>,
        summarizer: Arc<dyn Summarizer>,
        clock: Arc<dyn Clock>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            sources,
            summarizer,
            clock,
            config,
        }
    }

    /// Fetch from every configured source, then generate the brief
    pub async fn run(&self) -> Result<(Brief, Vec<Post>), PipelineError> {
        if self.sources.is_empty() {
            return Err(PipelineError::NoSources);
        }

        // Sources never search an empty string; the default focus stands in
        // so queries match what the system prompt claims to cover
        let topic = self
            .config
            .topic
            .clone()
            .unwrap_or_else(|| DEFAULT_FOCUS.to_string());
        let single_source = self.sources.len() == 1;
        let mut collected = Vec::new();

        for source in &self.sources {
            let kind = source.kind();
            tracing::info!(source = %kind, lookback_hours = self.config.lookback_hours, "Fetching posts");

            match source.fetch(&topic, self.config.lookback_hours).await {
                Ok(posts) => {
                    tracing::info!(source = %kind, count = posts.len(), "Fetched posts");
                    collected.extend(posts);
                }
                Err(error) if single_source => {
                    return Err(PipelineError::Fetch { kind, error });
                }
                Err(error) => {
                    tracing::warn!(source = %kind, error = %error, "Source failed, skipping");
                }
            }
        }

        self.run_with_posts(collected).await
    }

    /// Generate a brief from an already-collected post set (replay mode)
    pub async fn run_with_posts(
        &self,
        posts: Vec<Post>,
    ) -> Result<(Brief, Vec<Post>), PipelineError> {
        let posts = self.merge(posts);

        tracing::info!(
            posts = posts.len(),
            sort = ?self.config.sort,
            "Generating brief"
        );

        let system_prompt = build_system_prompt(self.config.topic.as_deref());
        let user_payload = build_user_payload(&posts);

        let text = self
            .summarizer
            .summarize(&system_prompt, &user_payload)
            .await?;

        let mut sources: Vec<SourceKind> = posts.iter().map(|p| p.source).collect();
        sources.sort_unstable();
        sources.dedup();

        let brief = Brief {
            topic: self.config.topic.clone(),
            generated_at: self.clock.now(),
            sources,
            post_count: posts.len(),
            text,
        };

        Ok((brief, posts))
    }

    /// Dedupe by `(source, id)` keeping first occurrence, sort, truncate
    fn merge(&self, posts: Vec<Post>) -> Vec<Post> {
        let mut seen: HashSet<(SourceKind, String)> = HashSet::new();
        let mut merged: Vec<Post> = posts
            .into_iter()
            .filter(|p| seen.insert((p.source, p.id.clone())))
            .collect();

        match self.config.sort {
            SortOrder::Recency => {
                merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            SortOrder::Score => {
                merged.sort_by(|a, b| b.score.cmp(&a.score));
            }
        }

        merged.truncate(self.config.max_posts);
        merged
    }
}
