//! Bluesky source adapter
//!
//! Uses the public AT Protocol search endpoint (no auth required). One
//! request per search term; the lookback window goes through the `since`
//! parameter, inclusive at the boundary.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use xscout_domain::usecases::build_search_terms;
use xscout_domain::{Post, PostSource, SourceError, SourceKind};

const DEFAULT_BASE_URL: &str = "https://public.api.bsky.app/xrpc";
const USER_AGENT: &str = "xscout/0.1";

/// Public AT Protocol post source
pub struct BlueskySource {
    client: Client,
    base_url: String,
}

impl Default for BlueskySource {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueskySource {
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

    async fn search(&self, term: &str, since: &str) -> Result<Vec<FeedPost>, SourceError> {
        let url = format!("{}/app.bsky.feed.searchPosts", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", term),
                ("sort", "latest"),
                ("limit", "100"),
                ("since", since),
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
                "Bluesky search returned {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        Ok(search.posts)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    posts: Vec<FeedPost>,
}

#[derive(Deserialize)]
struct FeedPost {
    uri: String,
    author: Author,
    record: Record,
    #[serde(rename = "likeCount", default)]
    like_count: i64,
    #[serde(rename = "replyCount", default)]
    reply_count: i64,
}

#[derive(Deserialize)]
struct Author {
    #[serde(default)]
    did: String,
    #[serde(default)]
    handle: String,
}

#[derive(Deserialize)]
struct Record {
    #[serde(default)]
    text: String,
    #[serde(rename = "createdAt", default)]
    created_at: String,
}

/// Build a bsky.app web URL from an AT URI
///
/// AT URI: `at://did:plc:xxx/app.bsky.feed.post/RKEY`
/// Web URL: `https://bsky.app/profile/DID/post/RKEY`
fn post_url(uri: &str, did: &str) -> String {
    let rkey = uri.rsplit('/').next().unwrap_or_default();
    format!("https://bsky.app/profile/{}/post/{}", did, rkey)
}

fn feed_post_to_post(item: FeedPost) -> Post {
    let handle = if item.author.handle.is_empty() {
        "unknown"
    } else {
        item.author.handle.as_str()
    };

    let created_at = OffsetDateTime::parse(&item.record.created_at, &Rfc3339).ok();

    Post {
        source: SourceKind::Bluesky,
        url: post_url(&item.uri, &item.author.did),
        id: item.uri,
        title: String::new(),
        body: item.record.text,
        author: format!("@{}", handle),
        score: item.like_count,
        comment_count: item.reply_count,
        created_at,
    }
}

#[async_trait]
impl PostSource for BlueskySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Bluesky
    }

    async fn fetch(&self, topic: &str, lookback_hours: i64) -> Result<Vec<Post>, SourceError> {
        let since = (OffsetDateTime::now_utc() - time::Duration::hours(lookback_hours))
            .format(&Rfc3339)
            .map_err(|e| SourceError::Api(e.to_string()))?;

        let terms = build_search_terms(topic);
        let mut seen: HashSet<String> = HashSet::new();
        let mut posts = Vec::new();

        for term in &terms {
            tracing::debug!(term = %term, "Searching Bluesky");

            for item in self.search(term, &since).await? {
                if seen.insert(item.uri.clone()) {
                    posts.push(feed_post_to_post(item));
                }
            }
        }

        tracing::info!(count = posts.len(), terms = terms.len(), "Fetched Bluesky posts");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_post(rkey: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "uri": format!("at://did:plc:abc/app.bsky.feed.post/{}", rkey),
            "author": {"did": "did:plc:abc", "handle": "scout.bsky.social"},
            "record": {"text": text, "createdAt": "2026-02-14T09:30:00Z"},
            "likeCount": 7,
            "replyCount": 2
        })
    }

    #[tokio::test]
    async fn maps_and_dedupes_posts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/app.bsky.feed.searchPosts"))
            .and(query_param("sort", "latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [feed_post("k1", "first"), feed_post("k1", "first"), feed_post("k2", "second")]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let source = BlueskySource::with_base_url(server.uri());
        // Two comma-separated terms -> two requests with overlapping results
        let posts = source.fetch("local llms, quantization", 24).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.source == SourceKind::Bluesky));
        assert_eq!(posts[0].author, "@scout.bsky.social");
        assert_eq!(posts[0].score, 7);
        assert_eq!(posts[0].comment_count, 2);
        assert_eq!(
            posts[0].url,
            "https://bsky.app/profile/did:plc:abc/post/k1"
        );
    }

    #[tokio::test]
    async fn api_failure_surfaces_as_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let source = BlueskySource::with_base_url(server.uri());
        let err = source.fetch("robotics", 24).await.unwrap_err();
        assert!(matches!(err, SourceError::Api(_)));
    }
}
