//! Application use cases

pub mod brief;
pub mod prompt;
pub mod queries;

pub use brief::{BriefPipeline, PipelineConfig, PipelineError};
pub use prompt::{DEFAULT_FOCUS, build_system_prompt, build_user_payload};
pub use queries::{build_search_terms, build_twitter_queries};
