use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use nta_core::{AudioArtifact, AudioStore, Error, Result, SpeechSynthesizer};

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
pub const AUDIO_KEY_PREFIX: &str = "audio";

/// Synthesizes a narration, keeps a local copy and publishes it to object storage.
pub struct AudioPublisher {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn AudioStore>,
    output_dir: PathBuf,
}

impl AudioPublisher {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn AudioStore>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            synthesizer,
            store,
            output_dir,
        }
    }

    /// Runs synthesis, the local write and the upload in sequence.
    ///
    /// The upload is never attempted when synthesis fails or returns no audio.
    pub async fn publish(&self, text: &str, file_name: &str) -> Result<AudioArtifact> {
        let audio = match self.synthesizer.synthesize(text).await {
            Ok(audio) => audio,
            Err(Error::NoAudio) => {
                error!("🔇 No audio stream in the {} response", self.synthesizer.name());
                return Err(Error::NoAudio);
            }
            Err(e) => {
                error!("❌ Error in text-to-speech conversion: {}", e);
                return Err(e);
            }
        };

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let local_path = self.output_dir.join(file_name);
        tokio::fs::write(&local_path, &audio).await?;
        info!("🎧 Audio saved to {} ({} bytes)", local_path.display(), audio.len());

        let key = format!("{}/{}", AUDIO_KEY_PREFIX, file_name);
        let url = self
            .store
            .upload(&local_path, &key, AUDIO_CONTENT_TYPE)
            .await
            .map_err(|e| {
                error!("❌ Upload of {} failed: {}", key, e);
                e
            })?;

        Ok(AudioArtifact { local_path, key, url })
    }
}
