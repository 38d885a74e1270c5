/*
[INPUT]:  Cache file path, TTL, serialized aggregate
[OUTPUT]: File contents when younger than the TTL
[POS]:    Cache layer - local file backend (freshness by modification time)
[UPDATE]: When file layout or freshness rules change
*/

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;

use crate::http::Result;

/// Local file cache; the file's mtime is its write time
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Contents of the file if it exists and was modified less than `ttl` ago
    pub async fn read_fresh(&self, ttl: Duration) -> Option<String> {
        let metadata = fs::metadata(&self.path).await.ok()?;
        let modified = metadata.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age >= ttl {
            tracing::debug!(path = %self.path.display(), age_secs = age.as_secs(), "cache file stale");
            return None;
        }

        match fs::read_to_string(&self.path).await {
            Ok(contents) => Some(contents),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cache file unreadable");
                None
            }
        }
    }

    /// Overwrite the file, creating parent directories as needed
    pub async fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, contents).await?;
        Ok(())
    }
}
