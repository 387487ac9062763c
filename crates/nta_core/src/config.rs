use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::storage::RECIPIENT_KEY;
use crate::types::PhoneNumber;
use crate::{Error, Result};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsdata.io/api/1/news";
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";
pub const DEFAULT_AUDIO_BUCKET: &str = "temp-storage-mp3";
pub const DEFAULT_POLLY_VOICE: &str = "Joanna";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

const ENV_TEMPLATE: &str = "# News API credentials
NEWS_API_KEY=your_news_api_key_here

# AWS credentials
AWS_ACCESS_KEY_ID=your_aws_access_key_here
AWS_SECRET_ACCESS_KEY=your_aws_secret_key_here
AWS_REGION=us-east-1

# Twilio credentials
TWILIO_ACCOUNT_SID=your_twilio_account_sid_here
TWILIO_AUTH_TOKEN=your_twilio_auth_token_here
TWILIO_PHONE_NUMBER=your_twilio_phone_number_here
RECIPIENT_PHONE_NUMBER=recipient_phone_number_here

# Optional overrides
# NEWS_API_URL=https://newsdata.io/api/1/news
# AUDIO_BUCKET=temp-storage-mp3
# POLLY_VOICE=Joanna
# OUTPUT_DIR=output
# TWILIO_API_URL=https://api.twilio.com
# SYNTHESIS_FAILURE_POLICY=complete
";

/// How a run whose narration could not be synthesized is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisFailurePolicy {
    /// The run is marked completed without an error.
    #[default]
    Complete,
    /// The run is marked as failed with the synthesis error.
    Error,
}

impl FromStr for SynthesisFailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "complete" | "completed" => Ok(Self::Complete),
            "error" => Ok(Self::Error),
            other => Err(Error::Config(format!(
                "Invalid SYNTHESIS_FAILURE_POLICY: {} (expected complete or error)",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Settings {
    pub news_api_key: String,
    pub news_api_url: Url,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: String,
    pub audio_bucket: String,
    pub polly_voice: String,
    pub output_dir: PathBuf,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: PhoneNumber,
    pub twilio_api_url: Url,
    pub recipient_phone_number: Option<String>,
    pub synthesis_failure_policy: SynthesisFailurePolicy,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("news_api_key", &"<redacted>")
            .field("news_api_url", &self.news_api_url.as_str())
            .field("aws_access_key_id", &self.aws_access_key_id.as_deref().map(|_| "<redacted>"))
            .field("aws_secret_access_key", &self.aws_secret_access_key.as_deref().map(|_| "<redacted>"))
            .field("aws_region", &self.aws_region)
            .field("audio_bucket", &self.audio_bucket)
            .field("polly_voice", &self.polly_voice)
            .field("output_dir", &self.output_dir)
            .field("twilio_account_sid", &"<redacted>")
            .field("twilio_auth_token", &"<redacted>")
            .field("twilio_phone_number", &self.twilio_phone_number)
            .field("twilio_api_url", &self.twilio_api_url.as_str())
            .field("recipient_phone_number", &self.recipient_phone_number)
            .field("synthesis_failure_policy", &self.synthesis_failure_policy)
            .finish()
    }
}

impl Settings {
    /// Loads `path` into the process environment (if it exists) and reads the settings from it.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        match dotenvy::from_path(path) {
            Ok(()) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {
                tracing::warn!("⚠️ {} not found, using the process environment only", path.display())
            }
            Err(e) => return Err(Error::Config(format!("Failed to load {}: {}", path.display(), e))),
        }
        let settings = Self::from_lookup(|key| std::env::var(key).ok())?;
        settings.log_keys();
        Ok(settings)
    }

    /// Builds the settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| Error::Config(format!("{} is not set", key)))
        };
        let parse_url = |key: &str, default: &str| {
            let raw = get(key).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid {}: {}", key, e)))
        };

        let twilio_phone_number = PhoneNumber::parse(&required("TWILIO_PHONE_NUMBER")?)
            .map_err(|e| Error::Config(format!("TWILIO_PHONE_NUMBER: {}", e)))?;

        Ok(Self {
            news_api_key: required("NEWS_API_KEY")?,
            news_api_url: parse_url("NEWS_API_URL", DEFAULT_NEWS_API_URL)?,
            aws_access_key_id: get("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            aws_region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            audio_bucket: get("AUDIO_BUCKET").unwrap_or_else(|| DEFAULT_AUDIO_BUCKET.to_string()),
            polly_voice: get("POLLY_VOICE").unwrap_or_else(|| DEFAULT_POLLY_VOICE.to_string()),
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            twilio_account_sid: required("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: required("TWILIO_AUTH_TOKEN")?,
            twilio_phone_number,
            twilio_api_url: parse_url("TWILIO_API_URL", DEFAULT_TWILIO_API_URL)?,
            recipient_phone_number: get(RECIPIENT_KEY),
            synthesis_failure_policy: match get("SYNTHESIS_FAILURE_POLICY") {
                Some(raw) => raw.parse()?,
                None => SynthesisFailurePolicy::default(),
            },
        })
    }

    /// The configured recipient, with any inline comment stripped.
    pub fn recipient(&self) -> Result<PhoneNumber> {
        let raw = self
            .recipient_phone_number
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", RECIPIENT_KEY)))?;
        let value = raw.split('#').next().unwrap_or_default().trim_end();
        PhoneNumber::parse(value).map_err(|e| Error::Config(format!("{}: {}", RECIPIENT_KEY, e)))
    }

    pub fn env_template() -> &'static str {
        ENV_TEMPLATE
    }

    fn log_keys(&self) {
        tracing::info!("⚙️ Config loaded:");
        tracing::info!("  NEWS_API_KEY: {}", preview(&self.news_api_key));
        tracing::info!("  NEWS_API_URL: {}", self.news_api_url);
        tracing::info!("  AWS_REGION: {}", self.aws_region);
        tracing::info!("  AUDIO_BUCKET: {}", self.audio_bucket);
        tracing::info!("  TWILIO_ACCOUNT_SID: {}", preview(&self.twilio_account_sid));
        tracing::info!("  TWILIO_PHONE_NUMBER: {}", self.twilio_phone_number);
        tracing::info!("  SYNTHESIS_FAILURE_POLICY: {:?}", self.synthesis_failure_policy);
    }
}

/// First four characters of a secret followed by its length in characters.
fn preview(val: &str) -> String {
    let head: String = val.chars().take(4).collect();
    format!("{}...({} chars)", head, val.chars().count())
}

/// Writes the configuration template to `path`.
pub fn create_env_template(path: &Path) -> Result<()> {
    std::fs::write(path, ENV_TEMPLATE)?;
    tracing::info!("📝 Environment template created at {}", path.display());
    Ok(())
}
