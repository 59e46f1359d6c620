//! Source adapters implementing the [`PostSource`] port
//!
//! [`PostSource`]: xscout_domain::PostSource

pub mod bluesky;
pub mod hackernews;
pub mod twitter;

pub use bluesky::BlueskySource;
pub use hackernews::HackerNewsSource;
pub use twitter::TwitterSource;
