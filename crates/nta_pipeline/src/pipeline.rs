use std::sync::Arc;

use serde::Serialize;

use nta_core::logging::Logger;
use nta_core::{compose_narration, ChannelKind, MessageChannel, NewsQuery, NewsSource, PhoneNumber, Result};
use nta_messaging::deliver_with_fallback;
use nta_speech::AudioPublisher;

/// How a run ended when no unexpected error interrupted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The provider returned no articles; synthesis and delivery were skipped.
    NoArticles,
    /// The narration could not be turned into a published audio file.
    SynthesisFailed { reason: String },
    /// The audio was published but neither messaging channel accepted it.
    DeliveryFailed { audio_url: String, reason: String },
    Delivered {
        articles: usize,
        audio_url: String,
        channel: ChannelKind,
        sid: String,
    },
}

impl PipelineOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PipelineOutcome::Delivered { .. })
    }
}

/// The fetch → compose → publish → deliver chain.
pub struct Pipeline {
    news: Arc<dyn NewsSource>,
    publisher: Arc<AudioPublisher>,
    messenger: Arc<dyn MessageChannel>,
    sender: PhoneNumber,
}

impl Pipeline {
    pub fn new(
        news: Arc<dyn NewsSource>,
        publisher: Arc<AudioPublisher>,
        messenger: Arc<dyn MessageChannel>,
        sender: PhoneNumber,
    ) -> Self {
        Self {
            news,
            publisher,
            messenger,
            sender,
        }
    }

    /// Runs every step in sequence, stopping at the first step without usable output.
    pub async fn run(
        &self,
        recipient: &PhoneNumber,
        query: &NewsQuery,
        file_name: &str,
        logger: &Logger,
    ) -> Result<PipelineOutcome> {
        logger.info(&format!(
            "🦗 Fetching {} {} news articles from {}...",
            query.count, query.category, query.country
        ));
        let articles = self.news.fetch(query).await?;
        if articles.is_empty() {
            logger.warn("📭 No articles found. Skipping synthesis and delivery.");
            return Ok(PipelineOutcome::NoArticles);
        }

        logger.info(&format!("📰 Found {} articles. Preparing text...", articles.len()));
        let narration = compose_narration(&articles);

        logger.info("🗣️ Converting text to speech...");
        let artifact = match self.publisher.publish(&narration, file_name).await {
            Ok(artifact) => artifact,
            Err(e) => {
                logger.error(&format!("❌ Failed to convert text to speech: {}", e));
                return Ok(PipelineOutcome::SynthesisFailed { reason: e.to_string() });
            }
        };

        logger.info(&format!("📤 Sending {} to {}...", artifact.url, recipient));
        match deliver_with_fallback(self.messenger.as_ref(), &self.sender, recipient, &artifact.url).await {
            Ok(delivery) => {
                logger.info("✅ Process completed successfully!");
                Ok(PipelineOutcome::Delivered {
                    articles: articles.len(),
                    audio_url: artifact.url,
                    channel: delivery.channel,
                    sid: delivery.sid,
                })
            }
            Err(e) => {
                logger.error(&format!("❌ Failed to send audio: {}", e));
                Ok(PipelineOutcome::DeliveryFailed {
                    audio_url: artifact.url,
                    reason: e.to_string(),
                })
            }
        }
    }
}
