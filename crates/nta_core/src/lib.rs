pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod storage;
pub mod types;

pub use compose::compose_narration;
pub use config::{Settings, SynthesisFailurePolicy};
pub use error::Error;
pub use providers::{AudioStore, MessageChannel, NewsSource, SpeechSynthesizer};
pub use storage::ConfigStore;
pub use types::*;

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::providers::*;
    pub use crate::storage::ConfigStore;
    pub use crate::types::{Article, AudioArtifact, NewsQuery, PhoneNumber};
    pub use crate::{Error, Result};
}
