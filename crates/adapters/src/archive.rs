//! Brief archive: dated brief/post files and the replay loader

use std::path::{Path, PathBuf};
use time::Date;
use tokio::fs;
use xscout_domain::Post;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes briefs and raw post sets into a dated directory layout
///
/// Brief text goes to `{dir}/{YYYY-MM-DD}.md`, raw posts to
/// `{dir}/{YYYY-MM-DD}-posts.json`. The posts file can be fed back through
/// [`load_posts`] for replay runs.
#[derive(Debug, Clone)]
pub struct BriefArchive {
    dir: PathBuf,
}

impl BriefArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn write_brief(&self, date: Date, text: &str) -> Result<PathBuf, ArchiveError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}.md", date_stem(date)));
        fs::write(&path, text).await?;
        Ok(path)
    }

    pub async fn write_posts(&self, date: Date, posts: &[Post]) -> Result<PathBuf, ArchiveError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}-posts.json", date_stem(date)));
        let json = serde_json::to_string_pretty(posts)?;
        fs::write(&path, json).await?;
        Ok(path)
    }
}

/// Load a previously saved post set for a replay run
pub async fn load_posts(path: &Path) -> Result<Vec<Post>, ArchiveError> {
    let json = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}

fn date_stem(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use time::Month;
    use xscout_domain::SourceKind;

    fn date() -> Date {
        Date::from_calendar_date(2026, Month::February, 14).unwrap()
    }

    fn post(id: &str) -> Post {
        Post {
            source: SourceKind::HackerNews,
            id: id.to_string(),
            title: "Title".to_string(),
            body: "Body".to_string(),
            url: format!("https://news.ycombinator.com/item?id={}", id),
            author: "pg".to_string(),
            score: 10,
            comment_count: 2,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn posts_roundtrip_through_the_archive() {
        let dir = TempDir::new().unwrap();
        let archive = BriefArchive::new(dir.path().join("briefs"));

        let written = archive
            .write_posts(date(), &[post("1"), post("2")])
            .await
            .unwrap();
        assert!(written.ends_with("2026-02-14-posts.json"));

        let loaded = load_posts(&written).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "1");
        assert_eq!(loaded[0].source, SourceKind::HackerNews);
    }

    #[tokio::test]
    async fn brief_gets_a_dated_markdown_file() {
        let dir = TempDir::new().unwrap();
        let archive = BriefArchive::new(dir.path());

        let written = archive.write_brief(date(), "# Brief\n").await.unwrap();
        assert!(written.ends_with("2026-02-14.md"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "# Brief\n");
    }

    #[tokio::test]
    async fn missing_replay_file_is_an_io_error() {
        let err = load_posts(Path::new("/nonexistent/posts.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[tokio::test]
    async fn malformed_replay_file_is_a_serialize_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_posts(&path).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Serialize(_)));
    }
}
