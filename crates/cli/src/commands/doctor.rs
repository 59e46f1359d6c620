//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    llm: CheckResult,
    twitter: CheckResult,
    briefs_dir: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        llm: CheckResult::error("Not checked"),
        twitter: CheckResult::error("Not checked"),
        briefs_dir: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.llm = check_llm(config);
        report.twitter = check_twitter(config);
        report.briefs_dir = CheckResult::ok(format!(
            "Briefs directory: {}",
            config.general.briefs_dir.display()
        ));
    }

    // Twitter credentials only warn: the source is skipped under "all"
    let checks = [&report.config, &report.llm, &report.briefs_dir];
    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok()) && report.twitter.is_ok();

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_llm(config: &AppConfig) -> CheckResult {
    let provider = &config.llm.provider;
    let model = &config.llm.model;

    match provider.as_str() {
        "stub" => return CheckResult::ok("Provider: stub (offline)".to_string()),
        "chat" => {}
        other => return CheckResult::error(format!("Unknown LLM provider: {}", other)),
    }

    let api_key_env = &config.llm.api_key_env;
    if api_key_env.is_empty() {
        return CheckResult::error("No API key env var configured for the LLM".to_string());
    }

    // Report presence without revealing the value
    match std::env::var(api_key_env) {
        Ok(val) if !val.trim().is_empty() => CheckResult::ok(format!(
            "Provider: chat, Model: {}, API key: {} (set)",
            model, api_key_env
        )),
        _ => CheckResult::error(format!(
            "Provider: chat, Model: {}, API key: {} (not set)",
            model, api_key_env
        )),
    }
}

fn check_twitter(config: &AppConfig) -> CheckResult {
    let has_bearer = env_is_set(&config.twitter.bearer_token_env);
    let has_pair = env_is_set(&config.twitter.consumer_key_env)
        && env_is_set(&config.twitter.consumer_secret_env);

    if has_bearer {
        CheckResult::ok(format!("Bearer token: {} (set)", config.twitter.bearer_token_env))
    } else if has_pair {
        CheckResult::ok(format!(
            "Consumer pair set, will exchange via {}/{}",
            config.twitter.consumer_key_env, config.twitter.consumer_secret_env
        ))
    } else {
        CheckResult::warn(format!(
            "No credentials: set {} (or {} + {}); twitter will be skipped",
            config.twitter.bearer_token_env,
            config.twitter.consumer_key_env,
            config.twitter.consumer_secret_env
        ))
    }
}

fn env_is_set(name: &str) -> bool {
    !name.is_empty()
        && std::env::var(name)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
}

fn print_report(report: &DoctorReport) {
    println!("xscout doctor");
    println!("=============");
    println!();
    print_check("config", &report.config);
    print_check("llm", &report.llm);
    print_check("twitter", &report.twitter);
    print_check("briefs_dir", &report.briefs_dir);
    println!();
    println!("Overall: {}", report.overall);
}

fn print_check(name: &str, check: &CheckResult) {
    let marker = match check.status.as_str() {
        "ok" => "✓",
        "warn" => "!",
        _ => "✗",
    };
    println!("  {} {:<11} {}", marker, name, check.message);
}
