//! Hacker News source adapter
//!
//! Uses the free Algolia HN Search API (no auth required). Per search term,
//! three requests: relevance-ordered stories, date-ordered stories, and a
//! comment search capped at 50 hits. The lookback window is applied through
//! `numericFilters=created_at_i>{cutoff}`, which Algolia treats as exclusive
//! at the boundary.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use time::OffsetDateTime;
use xscout_domain::usecases::build_search_terms;
use xscout_domain::{Post, PostSource, SourceError, SourceKind};

const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";
const USER_AGENT: &str = "xscout/0.1";

/// Algolia-backed Hacker News post source
pub struct HackerNewsSource {
    client: Client,
    base_url: String,
}

impl Default for HackerNewsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HackerNewsSource {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    async fn search(
        &self,
        query: &str,
        cutoff_ts: i64,
        tags: &str,
        endpoint: &str,
        hits_per_page: u32,
    ) -> Result<Vec<Hit>, SourceError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("tags", tags),
                ("numericFilters", &format!("created_at_i>{}", cutoff_ts)),
                ("hitsPerPage", &hits_per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if response.status() == 429 {
            return Err(SourceError::RateLimited(None));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!(
                "HN search returned {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        Ok(search.hits)
    }
}

#[derive(serde::Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(serde::Deserialize)]
struct Hit {
    #[serde(rename = "objectID", default)]
    object_id: String,
    title: Option<String>,
    story_text: Option<String>,
    comment_text: Option<String>,
    url: Option<String>,
    author: Option<String>,
    points: Option<i64>,
    num_comments: Option<i64>,
    created_at_i: Option<i64>,
    story_title: Option<String>,
}

fn parse_created_at(created_at_i: Option<i64>) -> Option<OffsetDateTime> {
    created_at_i.and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
}

fn story_to_post(hit: Hit) -> Option<Post> {
    if hit.object_id.is_empty() {
        return None;
    }

    let url = format!("https://news.ycombinator.com/item?id={}", hit.object_id);
    // Self posts carry story_text; link posts only a URL
    let body = hit
        .story_text
        .or(hit.url)
        .unwrap_or_default();

    Some(Post {
        source: SourceKind::HackerNews,
        id: hit.object_id,
        title: hit.title.unwrap_or_default(),
        body,
        url,
        author: hit.author.unwrap_or_default(),
        score: hit.points.unwrap_or(0),
        comment_count: hit.num_comments.unwrap_or(0),
        created_at: parse_created_at(hit.created_at_i),
    })
}

fn comment_to_post(hit: Hit) -> Option<Post> {
    if hit.object_id.is_empty() {
        return None;
    }

    let title = match hit.story_title.as_deref() {
        Some(story_title) if !story_title.is_empty() => {
            format!("[Comment on: {}]", story_title)
        }
        _ => "[Comment]".to_string(),
    };

    Some(Post {
        source: SourceKind::HackerNews,
        id: format!("comment-{}", hit.object_id),
        title,
        body: hit.comment_text.unwrap_or_default(),
        url: format!("https://news.ycombinator.com/item?id={}", hit.object_id),
        author: hit.author.unwrap_or_default(),
        score: hit.points.unwrap_or(0),
        comment_count: 0,
        created_at: parse_created_at(hit.created_at_i),
    })
}

#[async_trait]
impl PostSource for HackerNewsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::HackerNews
    }

    async fn fetch(&self, topic: &str, lookback_hours: i64) -> Result<Vec<Post>, SourceError> {
        let cutoff_ts =
            (OffsetDateTime::now_utc() - time::Duration::hours(lookback_hours)).unix_timestamp();

        let terms = build_search_terms(topic);
        let mut seen: HashSet<String> = HashSet::new();
        let mut posts = Vec::new();

        for term in &terms {
            tracing::debug!(term = %term, "Searching HN");

            let story_hits = self.search(term, cutoff_ts, "story", "search", 20).await?;
            let recent_hits = self
                .search(term, cutoff_ts, "story", "search_by_date", 20)
                .await?;
            let comment_hits = self.search(term, cutoff_ts, "comment", "search", 50).await?;

            for hit in story_hits.into_iter().chain(recent_hits) {
                if let Some(post) = story_to_post(hit) {
                    if seen.insert(post.id.clone()) {
                        posts.push(post);
                    }
                }
            }

            for hit in comment_hits {
                if let Some(post) = comment_to_post(hit) {
                    if seen.insert(post.id.clone()) {
                        posts.push(post);
                    }
                }
            }
        }

        tracing::info!(count = posts.len(), terms = terms.len(), "Fetched HN posts");
        Ok(posts)
    }
}
