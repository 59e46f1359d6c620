//! xscout adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `sources`: HTTP source adapters (X/Twitter, Hacker News, Bluesky)
//! - `llm`: chat-completions summarizer plus a stub for tests
//! - `archive`: dated brief/post files and the replay loader

pub mod archive;
pub mod llm;
pub mod sources;

pub use archive::{ArchiveError, BriefArchive, load_posts};
pub use llm::{ChatSummarizer, LlmConfig, StubSummarizer};
pub use sources::{BlueskySource, HackerNewsSource, TwitterSource};
