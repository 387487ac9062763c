use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_polly::config::Credentials;
use std::sync::Arc;

use nta_core::Settings;

pub mod polly;
pub mod publisher;
pub mod s3;

pub use polly::PollySynthesizer;
pub use publisher::{AudioPublisher, AUDIO_CONTENT_TYPE};
pub use s3::{public_url, S3AudioStore};

/// Loads the shared AWS configuration, preferring explicit keys from the settings
/// over the SDK's default credential chain.
pub async fn load_aws_config(settings: &Settings) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.aws_region.clone()));

    if let (Some(key_id), Some(secret)) = (&settings.aws_access_key_id, &settings.aws_secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id.clone(),
            secret.clone(),
            None,
            None,
            "nta-settings",
        ));
    }

    loader.load().await
}

/// Builds the Polly + S3 publisher described by the settings.
pub async fn create_publisher(settings: &Settings) -> AudioPublisher {
    let sdk_config = load_aws_config(settings).await;
    let synthesizer = PollySynthesizer::new(
        aws_sdk_polly::Client::new(&sdk_config),
        settings.polly_voice.clone(),
    );
    let store = S3AudioStore::new(
        aws_sdk_s3::Client::new(&sdk_config),
        settings.audio_bucket.clone(),
        settings.aws_region.clone(),
    );
    AudioPublisher::new(Arc::new(synthesizer), Arc::new(store), settings.output_dir.clone())
}

pub mod prelude {
    pub use super::{create_publisher, AudioPublisher, PollySynthesizer, S3AudioStore};
    pub use nta_core::{AudioArtifact, AudioStore, Error, Result, SpeechSynthesizer};
}
