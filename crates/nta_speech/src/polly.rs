use std::fmt;

use async_trait::async_trait;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{OutputFormat, VoiceId};
use aws_sdk_polly::Client;
use tracing::debug;

use nta_core::{Error, Result, SpeechSynthesizer};

/// Speech synthesis through AWS Polly, always requesting MP3.
pub struct PollySynthesizer {
    client: Client,
    voice: String,
}

impl PollySynthesizer {
    pub fn new(client: Client, voice: String) -> Self {
        Self { client, voice }
    }
}

impl fmt::Debug for PollySynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollySynthesizer")
            .field("client", &"<aws_sdk_polly::Client>")
            .field("voice", &self.voice)
            .finish()
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    fn name(&self) -> &str {
        "AWS Polly"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        debug!("Synthesizing {} characters with voice {}", text.len(), self.voice);
        let output = self
            .client
            .synthesize_speech()
            .text(text)
            .output_format(OutputFormat::Mp3)
            .voice_id(VoiceId::from(self.voice.as_str()))
            .send()
            .await
            .map_err(|e| Error::Speech(DisplayErrorContext(&e).to_string()))?;

        let audio = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| Error::Speech(format!("Failed to read audio stream: {}", e)))?
            .into_bytes();

        if audio.is_empty() {
            return Err(Error::NoAudio);
        }
        Ok(audio.to_vec())
    }
}
