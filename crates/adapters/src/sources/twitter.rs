//! X/Twitter source adapter
//!
//! Issues one authenticated v2 recent-search request per query built from the
//! topic (or per raw query override), merges and dedupes by tweet ID. The
//! lookback window goes through `start_time`, which the API treats as
//! inclusive.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use xscout_domain::usecases::build_twitter_queries;
use xscout_domain::{Post, PostSource, SourceError, SourceKind};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const TWEET_FIELDS: &str = "author_id,created_at,public_metrics,referenced_tweets";
const USER_FIELDS: &str = "username,name";
const EXPANSIONS: &str = "author_id";

/// X API v2 recent-search post source
pub struct TwitterSource {
    client: Client,
    bearer_token: SecretString,
    base_url: String,
    max_results: u32,
    query_override: Option<Vec<String>>,
}

impl TwitterSource {
    pub fn new(bearer_token: SecretString) -> Self {
        Self::with_base_url(bearer_token, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(bearer_token: SecretString, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            bearer_token,
            base_url,
            max_results: 50,
            query_override: None,
        }
    }

    /// Cap results per search request (clamped to the API's 10..=100)
    pub fn max_results_per_query(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Bypass the query builder with raw X search query strings
    pub fn with_raw_queries(mut self, queries: Vec<String>) -> Self {
        self.query_override = Some(queries);
        self
    }

    /// Exchange an app consumer key/secret pair for a bearer token
    ///
    /// Used once per run when only the consumer pair is configured.
    pub async fn exchange_bearer_token(
        consumer_key: &SecretString,
        consumer_secret: &SecretString,
    ) -> Result<SecretString, SourceError> {
        Self::exchange_bearer_token_at(consumer_key, consumer_secret, DEFAULT_BASE_URL).await
    }

    pub async fn exchange_bearer_token_at(
        consumer_key: &SecretString,
        consumer_secret: &SecretString,
        base_url: &str,
    ) -> Result<SecretString, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let response = client
            .post(format!("{}/oauth2/token", base_url))
            .basic_auth(
                consumer_key.expose_secret(),
                Some(consumer_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!(
                "Token exchange returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        Ok(SecretString::new(token.access_token.into()))
    }

    async fn search(&self, query: &str, start_time: &str) -> Result<SearchResponse, SourceError> {
        let url = format!("{}/2/tweets/search/recent", self.base_url);
        let max_results = self.max_results.clamp(10, 100);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.bearer_token.expose_secret()),
            )
            .query(&[
                ("query", query),
                ("max_results", &max_results.to_string()),
                ("start_time", start_time),
                ("tweet.fields", TWEET_FIELDS),
                ("user.fields", USER_FIELDS),
                ("expansions", EXPANSIONS),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if response.status() == 401 {
            return Err(SourceError::Auth("Invalid bearer token".to_string()));
        }

        if response.status() == 429 {
            let retry_after = response
                .headers()
                .get("x-rate-limit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(|ts| {
                    let now = OffsetDateTime::now_utc().unix_timestamp() as u64;
                    Duration::from_secs(ts.saturating_sub(now))
                });
            return Err(SourceError::RateLimited(retry_after));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!(
                "Search returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Option<Vec<Tweet>>,
    includes: Option<Includes>,
}

#[derive(Deserialize)]
struct Tweet {
    id: String,
    text: String,
    author_id: Option<String>,
    created_at: Option<String>,
    public_metrics: Option<PublicMetrics>,
}

#[derive(Deserialize, Default)]
struct PublicMetrics {
    #[serde(default)]
    like_count: i64,
    #[serde(default)]
    reply_count: i64,
}

#[derive(Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Deserialize)]
struct User {
    id: String,
    username: String,
}

fn tweet_to_post(tweet: Tweet, authors: &HashMap<String, String>) -> Post {
    let username = tweet
        .author_id
        .as_deref()
        .and_then(|id| authors.get(id))
        .map(String::as_str)
        .unwrap_or("unknown");

    let created_at = tweet
        .created_at
        .as_deref()
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok());

    let metrics = tweet.public_metrics.unwrap_or_default();

    Post {
        source: SourceKind::Twitter,
        url: format!("https://x.com/{}/status/{}", username, tweet.id),
        id: tweet.id,
        title: String::new(),
        body: tweet.text,
        author: format!("@{}", username),
        score: metrics.like_count,
        comment_count: metrics.reply_count,
        created_at,
    }
}

#[async_trait]
impl PostSource for TwitterSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Twitter
    }

    async fn fetch(&self, topic: &str, lookback_hours: i64) -> Result<Vec<Post>, SourceError> {
        let start = OffsetDateTime::now_utc() - time::Duration::hours(lookback_hours);
        let start_time = start
            .format(&Rfc3339)
            .map_err(|e| SourceError::Api(e.to_string()))?;

        let queries = match &self.query_override {
            Some(raw) => raw.clone(),
            None => build_twitter_queries(topic),
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut posts = Vec::new();

        for (i, query) in queries.iter().enumerate() {
            tracing::debug!(query = %query, n = i + 1, total = queries.len(), "Searching X");

            let result = self.search(query, &start_time).await?;

            let authors: HashMap<String, String> = result
                .includes
                .map(|inc| inc.users.into_iter().map(|u| (u.id, u.username)).collect())
                .unwrap_or_default();

            for tweet in result.data.unwrap_or_default() {
                if seen.insert(tweet.id.clone()) {
                    posts.push(tweet_to_post(tweet, &authors));
                }
            }
        }

        tracing::info!(count = posts.len(), queries = queries.len(), "Fetched tweets");
        Ok(posts)
    }
}
