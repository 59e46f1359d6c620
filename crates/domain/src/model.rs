//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// A post source platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Twitter,
    HackerNews,
    Bluesky,
}

impl SourceKind {
    /// All known sources, in the order the pipeline fetches them
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Twitter,
        SourceKind::HackerNews,
        SourceKind::Bluesky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Twitter => "twitter",
            SourceKind::HackerNews => "hackernews",
            SourceKind::Bluesky => "bluesky",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(SourceKind::Twitter),
            "hackernews" | "hn" => Ok(SourceKind::HackerNews),
            "bluesky" | "bsky" => Ok(SourceKind::Bluesky),
            other => Err(format!("Unknown source: {}", other)),
        }
    }
}

/// A normalized post from any source
///
/// Immutable once constructed; `(source, id)` is unique after deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Which platform the post came from
    pub source: SourceKind,
    /// Platform-specific post ID, unique within the source
    pub id: String,
    /// Post title (empty for tweets and Bluesky posts)
    #[serde(default)]
    pub title: String,
    /// Post body / tweet text
    pub body: String,
    /// Permalink to the original
    pub url: String,
    /// Username / handle
    pub author: String,
    /// Likes, points, upvotes
    #[serde(default)]
    pub score: i64,
    /// Reply / comment count
    #[serde(default)]
    pub comment_count: i64,
    /// When the post was created, if the source reported it
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Ordering applied to the merged post set before truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first; posts without a timestamp sort last
    #[default]
    Recency,
    /// Highest score first
    Score,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recency" => Ok(SortOrder::Recency),
            "score" => Ok(SortOrder::Score),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// The final LLM-generated brief plus run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    /// Topic focus the brief was generated for, if any
    pub topic: Option<String>,
    /// When the brief was generated
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Sources that contributed posts
    pub sources: Vec<SourceKind>,
    /// How many posts went into the prompt after dedup and truncation
    pub post_count: usize,
    /// Brief text as returned by the model
    pub text: String,
}
