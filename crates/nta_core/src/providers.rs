use std::path::Path;

use async_trait::async_trait;

use crate::types::{Article, NewsQuery, OutgoingMessage};
use crate::Result;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns the name of the news provider
    fn name(&self) -> &str;

    /// Fetches one page of headlines. Provider failures degrade to an empty list.
    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<Article>>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Synthesizes MP3 audio for the given text.
    ///
    /// Returns `Error::NoAudio` when the provider answers without an audio stream.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Uploads a local file under `key` and returns its public URL
    async fn upload(&self, path: &Path, key: &str, content_type: &str) -> Result<String>;
}

#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Sends a message and returns the provider's message id
    async fn send(&self, message: &OutgoingMessage) -> Result<String>;
}
