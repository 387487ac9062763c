use async_trait::async_trait;
use tokio::sync::RwLock;

use nta_core::{ConfigStore, Error, Result};

use crate::lines::{read_value, rewrite_line};

/// In-memory `ConfigStore` holding the file contents as a string.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    contents: RwLock<String>,
    fail_writes: bool,
}

impl MemoryConfigStore {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(contents.into()),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail, for exercising error paths.
    pub fn read_only(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(contents.into()),
            fail_writes: true,
        }
    }

    pub async fn contents(&self) -> String {
        self.contents.read().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(read_value(&self.contents.read().await, key))
    }

    async fn upsert(&self, key: &str, value: &str, comment: Option<&str>) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Storage("store is read-only".to_string()));
        }
        let mut contents = self.contents.write().await;
        *contents = rewrite_line(&contents, key, value, comment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryConfigStore::new("A=1\n");
        store.upsert("B", "2", None).await.unwrap();
        assert_eq!(store.contents().await, "A=1\nB=2\n");
        assert_eq!(store.get("B").await.unwrap().as_deref(), Some("2"));

        let store = MemoryConfigStore::read_only("A=1\n");
        assert!(store.upsert("A", "2", None).await.is_err());
        assert_eq!(store.contents().await, "A=1\n");
    }
}
