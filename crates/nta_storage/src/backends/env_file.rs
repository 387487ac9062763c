use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use nta_core::{ConfigStore, Error, Result};

use crate::lines::{read_value, rewrite_line};

/// `ConfigStore` backed by a `.env` style file.
///
/// Updates are serialized through an async lock and written to a temporary file in
/// the same directory which then replaces the original, so readers never observe a
/// half-written file.
#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Storage(format!("Cannot read {}: {}", self.path.display(), e))
        })
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path)
        .map_err(|e| Error::Storage(format!("Cannot replace {}: {}", path.display(), e)))?;
    Ok(())
}

#[async_trait]
impl ConfigStore for EnvFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let contents = self.read().await?;
        Ok(read_value(&contents, key))
    }

    async fn upsert(&self, key: &str, value: &str, comment: Option<&str>) -> Result<()> {
        let _guard = self.lock.lock().await;

        let contents = self.read().await?;
        let updated = rewrite_line(&contents, key, value, comment);

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &updated))
            .await
            .map_err(|e| Error::Storage(format!("Config write task failed: {}", e)))??;

        info!("💾 Updated {} in {}", key, self.path.display());
        Ok(())
    }
}
