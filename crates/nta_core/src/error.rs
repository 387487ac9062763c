use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("News error: {0}")]
    News(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("No audio stream in the synthesis response")]
    NoAudio,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Delivery failed (whatsapp: {primary}; sms: {fallback})")]
    Delivery { primary: String, fallback: String },

    #[error("Run cancelled")]
    Cancelled,

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
