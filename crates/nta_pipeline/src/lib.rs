use std::sync::Arc;

use nta_core::Settings;
use nta_messaging::TwilioClient;
use nta_news::NewsDataClient;

pub mod pipeline;
pub mod runs;

pub use pipeline::{Pipeline, PipelineOutcome};
pub use runs::{CancelResult, RunId, RunRegistry, RunSnapshot, RunState, DEFAULT_FINISHED_RUNS_RETAINED};

/// Wires the newsdata.io, Polly/S3 and Twilio clients described by the settings.
pub async fn build_pipeline(settings: &Settings) -> Pipeline {
    let news = NewsDataClient::from_settings(settings);
    let publisher = nta_speech::create_publisher(settings).await;
    let messenger = TwilioClient::from_settings(settings);
    Pipeline::new(
        Arc::new(news),
        Arc::new(publisher),
        Arc::new(messenger),
        settings.twilio_phone_number.clone(),
    )
}

pub mod prelude {
    pub use super::{build_pipeline, Pipeline, PipelineOutcome, RunId, RunRegistry, RunSnapshot};
    pub use nta_core::{Error, NewsQuery, PhoneNumber, Result};
}
