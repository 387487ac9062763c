use async_trait::async_trait;

use crate::Result;

/// Key under which the active recipient is stored.
pub const RECIPIENT_KEY: &str = "RECIPIENT_PHONE_NUMBER";

/// Comment appended to the recipient line whenever it is rewritten.
pub const RECIPIENT_COMMENT: &str = "Format: whatsapp:+1234567890";

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads the value stored under `key`, without any trailing comment
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the line holding `key`, or appends one. All other lines are kept as-is.
    async fn upsert(&self, key: &str, value: &str, comment: Option<&str>) -> Result<()>;
}
