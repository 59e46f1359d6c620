use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_posts_file(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let posts = serde_json::json!([
        {
            "source": "hackernews",
            "id": "1001",
            "title": "Show HN: tiny inference engine",
            "body": "https://example.com/engine",
            "url": "https://news.ycombinator.com/item?id=1001",
            "author": "builder",
            "score": 120,
            "comment_count": 45,
            "created_at": "2026-02-14T08:00:00Z"
        },
        {
            "source": "twitter",
            "id": "42",
            "title": "",
            "body": "new quantization recipe",
            "url": "https://x.com/someone/status/42",
            "author": "@someone",
            "score": 9,
            "comment_count": 1,
            "created_at": "2026-02-14T09:00:00Z"
        }
    ]);

    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(&posts).unwrap()).expect("write posts");
    path
}

fn base_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("xscout");
    cmd.current_dir(dir.path())
        .env_remove("SCOUT_FOCUS")
        .env_remove("NANOGPT_API_KEY")
        .env_remove("X_BEARER_TOKEN")
        .env_remove("X_CONSUMER_KEY")
        .env_remove("X_API_KEY");
    cmd
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("xscout");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("lookback_hours = 24"));
    assert!(content.contains("briefs_dir"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").unwrap();

    let mut cmd = cargo_bin_cmd!("xscout");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn replay_run_needs_no_source_credentials() {
    let dir = TempDir::new().expect("temp dir");
    let posts = write_posts_file(&dir, "2026-02-14-posts.json");

    base_cmd(&dir)
        .env("XSCOUT__LLM__PROVIDER", "stub")
        .args(["run", "--from-file"])
        .arg(&posts)
        .assert()
        .success()
        .stdout(predicate::str::contains("(stub brief)"));
}

#[test]
fn replay_still_requires_the_llm_key() {
    let dir = TempDir::new().expect("temp dir");
    let posts = write_posts_file(&dir, "posts.json");

    // Default provider is "chat"; its key env var is unset
    base_cmd(&dir)
        .args(["run", "--from-file"])
        .arg(&posts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("NANOGPT_API_KEY"));
}

#[test]
fn missing_replay_file_is_fatal() {
    let dir = TempDir::new().expect("temp dir");

    base_cmd(&dir)
        .env("XSCOUT__LLM__PROVIDER", "stub")
        .args(["run", "--from-file", "nope/missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load replay file"));
}

#[test]
fn save_flags_write_dated_files() {
    let dir = TempDir::new().expect("temp dir");
    let posts = write_posts_file(&dir, "input.json");
    let briefs_dir = dir.path().join("briefs");

    base_cmd(&dir)
        .env("XSCOUT__LLM__PROVIDER", "stub")
        .env("XSCOUT__GENERAL__BRIEFS_DIR", &briefs_dir)
        .args(["run", "--save", "--save-posts", "--from-file"])
        .arg(&posts)
        .assert()
        .success();

    let entries: Vec<String> = fs::read_dir(&briefs_dir)
        .expect("briefs dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    assert!(entries.iter().any(|n| n.ends_with(".md")));
    assert!(entries.iter().any(|n| n.ends_with("-posts.json")));
}

#[test]
fn unknown_source_is_rejected() {
    let dir = TempDir::new().expect("temp dir");

    base_cmd(&dir)
        .env("XSCOUT__LLM__PROVIDER", "stub")
        .args(["run", "--source", "reddit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown source"));
}

#[test]
fn single_twitter_source_without_credentials_is_fatal() {
    let dir = TempDir::new().expect("temp dir");

    base_cmd(&dir)
        .env("XSCOUT__LLM__PROVIDER", "stub")
        .args(["run", "--source", "twitter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("X_BEARER_TOKEN"));
}

#[test]
fn doctor_reports_status_as_json() {
    let dir = TempDir::new().expect("temp dir");

    let output = base_cmd(&dir)
        .env("NANOGPT_API_KEY", "test-key")
        .args(["doctor", "--json"])
        .output()
        .expect("run doctor");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["config"]["status"], "ok");
    assert_eq!(report["llm"]["status"], "ok");
    // No twitter credentials in the environment: warn, not error
    assert_eq!(report["twitter"]["status"], "warn");
}
