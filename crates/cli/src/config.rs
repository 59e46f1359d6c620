//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xscout_domain::SortOrder;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub llm: LlmSection,

    #[serde(default)]
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default topic focus; empty uses the prompt's built-in focus
    #[serde(default)]
    pub focus: String,

    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,

    #[serde(default = "default_max_posts")]
    pub max_posts: usize,

    #[serde(default)]
    pub sort: SortOrder,

    #[serde(default = "default_briefs_dir")]
    pub briefs_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// chat or stub
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    #[serde(default = "default_bearer_token_env")]
    pub bearer_token_env: String,

    #[serde(default = "default_consumer_key_env")]
    pub consumer_key_env: String,

    #[serde(default = "default_consumer_secret_env")]
    pub consumer_secret_env: String,

    #[serde(default = "default_max_results_per_query")]
    pub max_results_per_query: u32,
}

// Default value functions
fn default_lookback_hours() -> i64 {
    24
}

fn default_max_posts() -> usize {
    200
}

fn default_briefs_dir() -> PathBuf {
    PathBuf::from("./briefs")
}

fn default_provider() -> String {
    "chat".to_string()
}

fn default_model() -> String {
    "chatgpt-4o-latest".to_string()
}

fn default_llm_base_url() -> String {
    "https://nano-gpt.com/api/v1".to_string()
}

fn default_llm_api_key_env() -> String {
    "NANOGPT_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f64 {
    0.4
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_bearer_token_env() -> String {
    "X_BEARER_TOKEN".to_string()
}

fn default_consumer_key_env() -> String {
    "X_CONSUMER_KEY".to_string()
}

fn default_consumer_secret_env() -> String {
    "X_API_KEY".to_string()
}

fn default_max_results_per_query() -> u32 {
    50
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            focus: String::new(),
            lookback_hours: default_lookback_hours(),
            max_posts: default_max_posts(),
            sort: SortOrder::default(),
            briefs_dir: default_briefs_dir(),
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_llm_base_url(),
            api_key_env: default_llm_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token_env: default_bearer_token_env(),
            consumer_key_env: default_consumer_key_env(),
            consumer_secret_env: default_consumer_secret_env(),
            max_results_per_query: default_max_results_per_query(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("XSCOUT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# xscout configuration

[general]
# Default topic focus; empty uses the prompt's built-in focus.
# Overridden by --topic and the SCOUT_FOCUS env var.
focus = ""
lookback_hours = 24
max_posts = 200
sort = "recency"  # recency, score
briefs_dir = "./briefs"

[llm]
provider = "chat"  # chat, stub
model = "chatgpt-4o-latest"
base_url = "https://nano-gpt.com/api/v1"
api_key_env = "NANOGPT_API_KEY"
max_tokens = 4000
temperature = 0.4
timeout_secs = 120

[twitter]
bearer_token_env = "X_BEARER_TOKEN"
# Used to exchange for a bearer token when X_BEARER_TOKEN is not set
consumer_key_env = "X_CONSUMER_KEY"
consumer_secret_env = "X_API_KEY"
max_results_per_query = 50
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_toml_parses_back_into_config() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.general.lookback_hours, 24);
        assert_eq!(config.general.sort, SortOrder::Recency);
        assert_eq!(config.llm.provider, "chat");
        assert_eq!(config.twitter.bearer_token_env, "X_BEARER_TOKEN");
    }

    #[test]
    fn defaults_match_the_example() {
        let defaults = AppConfig::default();
        let example: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(defaults.general.max_posts, example.general.max_posts);
        assert_eq!(defaults.llm.model, example.llm.model);
        assert_eq!(defaults.llm.api_key_env, example.llm.api_key_env);
    }
}
