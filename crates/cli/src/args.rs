//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// xscout: pull recent posts about a topic and generate an LLM intel brief
#[derive(Parser, Debug)]
#[command(name = "xscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch posts, generate a brief, print it to stdout
    Run(RunArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Topic/domain to scout (falls back to config focus, then default)
    #[arg(long, env = "SCOUT_FOCUS")]
    pub topic: Option<String>,

    /// Source to scout: twitter, hackernews, bluesky, or all
    #[arg(long, default_value = "all")]
    pub source: String,

    /// Save the brief to the briefs directory
    #[arg(long)]
    pub save: bool,

    /// Also save the raw post JSON next to the brief
    #[arg(long)]
    pub save_posts: bool,

    /// Replay a previously saved post JSON file instead of fetching
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Raw X search query (repeatable; bypasses the query builder)
    #[arg(long = "query")]
    pub queries: Vec<String>,

    /// Override the lookback window in hours
    #[arg(long)]
    pub lookback_hours: Option<i64>,

    /// Override the maximum posts kept after dedup
    #[arg(long)]
    pub max_posts: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
