//! Run command - fetch posts, generate the brief, print and optionally save

use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use xscout_adapters::{
    BlueskySource, BriefArchive, ChatSummarizer, HackerNewsSource, LlmConfig, StubSummarizer,
    TwitterSource, archive,
};
use xscout_domain::usecases::{BriefPipeline, PipelineConfig};
use xscout_domain::{Clock, PostSource, SourceKind, Summarizer, SystemClock};

use crate::args::RunArgs;
use crate::config::{AppConfig, TwitterConfig};

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let topic = resolve_topic(&args, &config);
    let pipeline_config = PipelineConfig {
        topic: topic.clone(),
        lookback_hours: args.lookback_hours.unwrap_or(config.general.lookback_hours),
        max_posts: args.max_posts.unwrap_or(config.general.max_posts),
        sort: config.general.sort,
    };

    tracing::info!(
        topic = topic.as_deref().unwrap_or("(default focus)"),
        source = %args.source,
        lookback_hours = pipeline_config.lookback_hours,
        replay = args.from_file.is_some(),
        "Starting xscout run"
    );

    // The LLM key is required up front, even for replay runs
    let summarizer = build_summarizer(&config)?;
    let clock = Arc::new(SystemClock);

    let (brief, posts) = if let Some(path) = &args.from_file {
        tracing::info!(path = %path.display(), "Replaying saved posts");
        let posts = archive::load_posts(path)
            .await
            .with_context(|| format!("Failed to load replay file: {}", path.display()))?;
        let pipeline = BriefPipeline::new(vec![], summarizer, clock.clone(), pipeline_config);
        pipeline.run_with_posts(posts).await?
    } else {
        let sources = build_sources(&args, &config).await?;
        let pipeline = BriefPipeline::new(sources, summarizer, clock.clone(), pipeline_config);
        pipeline.run().await?
    };

    println!("{}", brief.text);

    if args.save || args.save_posts {
        let briefs = BriefArchive::new(&config.general.briefs_dir);
        let date = clock.now().date();

        if args.save {
            let path = briefs.write_brief(date, &brief.text).await?;
            tracing::info!(path = %path.display(), "Saved brief");
        }
        if args.save_posts {
            let path = briefs.write_posts(date, &posts).await?;
            tracing::info!(path = %path.display(), count = posts.len(), "Saved posts");
        }
    }

    Ok(())
}

/// Topic resolution: --topic flag / SCOUT_FOCUS env (via clap) > config focus
fn resolve_topic(args: &RunArgs, config: &AppConfig) -> Option<String> {
    args.topic
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            let focus = config.general.focus.trim();
            if focus.is_empty() {
                None
            } else {
                Some(focus.to_string())
            }
        })
}

fn requested_kinds(source: &str) -> Result<Vec<SourceKind>> {
    if source.eq_ignore_ascii_case("all") {
        Ok(SourceKind::ALL.to_vec())
    } else {
        let kind = source
            .parse::<SourceKind>()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(vec![kind])
    }
}

/// Build the selected source adapters
///
/// A source whose credentials are missing is fatal when it was the single
/// requested source, logged and skipped under "all".
async fn build_sources(args: &RunArgs, config: &AppConfig) -> Result<Vec<Arc<dyn PostSource>>> {
    let kinds = requested_kinds(&args.source)?;

    if !args.queries.is_empty() && !kinds.contains(&SourceKind::Twitter) {
        tracing::warn!("--query only applies to the twitter source");
    }

    let single = kinds.len() == 1;
    let mut sources: Vec<Arc<dyn PostSource>> = Vec::new();

    for kind in kinds {
        match build_source(kind, args, config).await {
            Ok(source) => sources.push(source),
            Err(e) if single => return Err(e),
            Err(e) => {
                tracing::warn!(source = %kind, error = %e, "Source unavailable, skipping");
            }
        }
    }

    if sources.is_empty() {
        bail!("No usable sources for '{}'", args.source);
    }

    Ok(sources)
}

async fn build_source(
    kind: SourceKind,
    args: &RunArgs,
    config: &AppConfig,
) -> Result<Arc<dyn PostSource>> {
    match kind {
        SourceKind::Twitter => {
            let bearer = resolve_bearer_token(&config.twitter).await?;
            let mut source = TwitterSource::new(bearer)
                .max_results_per_query(config.twitter.max_results_per_query);
            if !args.queries.is_empty() {
                source = source.with_raw_queries(args.queries.clone());
            }
            Ok(Arc::new(source))
        }
        SourceKind::HackerNews => Ok(Arc::new(HackerNewsSource::new())),
        SourceKind::Bluesky => Ok(Arc::new(BlueskySource::new())),
    }
}

/// Bearer token from env, or a one-shot exchange from the consumer pair
async fn resolve_bearer_token(config: &TwitterConfig) -> Result<SecretString> {
    if let Ok(token) = std::env::var(&config.bearer_token_env) {
        if !token.trim().is_empty() {
            return Ok(SecretString::new(token.into()));
        }
    }

    let key = std::env::var(&config.consumer_key_env)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let secret = std::env::var(&config.consumer_secret_env)
        .ok()
        .filter(|v| !v.trim().is_empty());

    match (key, secret) {
        (Some(key), Some(secret)) => {
            tracing::info!("Exchanging consumer keys for a bearer token");
            TwitterSource::exchange_bearer_token(
                &SecretString::new(key.into()),
                &SecretString::new(secret.into()),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Bearer token exchange failed: {}", e))
        }
        _ => bail!(
            "Set {} (or {} + {})",
            config.bearer_token_env,
            config.consumer_key_env,
            config.consumer_secret_env
        ),
    }
}

pub(crate) fn build_summarizer(config: &AppConfig) -> Result<Arc<dyn Summarizer>> {
    match config.llm.provider.as_str() {
        "chat" => {
            let api_key = load_api_key(&config.llm.api_key_env, "llm")?;
            Ok(Arc::new(ChatSummarizer::with_base_url(
                api_key,
                config.llm.base_url.clone(),
                LlmConfig {
                    model: config.llm.model.clone(),
                    temperature: config.llm.temperature,
                    max_tokens: config.llm.max_tokens,
                    timeout_secs: config.llm.timeout_secs,
                },
            )))
        }
        "stub" => Ok(Arc::new(StubSummarizer::new("(stub brief)"))),
        other => bail!("Unknown LLM provider: {}", other),
    }
}

pub(crate) fn load_api_key(env_var: &str, purpose: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for {}", purpose);
    }

    let key = std::env::var(env_var)
        .with_context(|| format!("Missing API key env var {} for {}", env_var, purpose))?;

    if key.trim().is_empty() {
        bail!("API key env var {} is empty for {}", env_var, purpose);
    }

    Ok(SecretString::new(key.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_expands_to_every_source() {
        let kinds = requested_kinds("all").unwrap();
        assert_eq!(kinds, SourceKind::ALL.to_vec());
    }

    #[test]
    fn single_source_and_aliases_parse() {
        assert_eq!(
            requested_kinds("hackernews").unwrap(),
            vec![SourceKind::HackerNews]
        );
        assert_eq!(requested_kinds("x").unwrap(), vec![SourceKind::Twitter]);
        assert!(requested_kinds("reddit").is_err());
    }

    #[test]
    fn topic_falls_back_to_config_focus() {
        let args = RunArgs {
            topic: None,
            source: "all".to_string(),
            save: false,
            save_posts: false,
            from_file: None,
            queries: vec![],
            lookback_hours: None,
            max_posts: None,
        };

        let mut config = AppConfig::default();
        assert_eq!(resolve_topic(&args, &config), None);

        config.general.focus = "robotics".to_string();
        assert_eq!(resolve_topic(&args, &config).as_deref(), Some("robotics"));

        let args = RunArgs {
            topic: Some("drones".to_string()),
            ..args
        };
        assert_eq!(resolve_topic(&args, &config).as_deref(), Some("drones"));
    }

    #[test]
    fn stub_provider_needs_no_key() {
        let mut config = AppConfig::default();
        config.llm.provider = "stub".to_string();
        assert!(build_summarizer(&config).is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut config = AppConfig::default();
        config.llm.provider = "oracle".to_string();
        assert!(build_summarizer(&config).is_err());
    }
}
