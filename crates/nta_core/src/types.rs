use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

lazy_static! {
    static ref PHONE_PATTERN: Regex = Regex::new(r"^\+[0-9]{1,3}[0-9]{6,14}$")
        .expect("phone pattern is a valid regex");
}

/// A single headline as returned by the news provider.
///
/// Every field is optional; the composer substitutes placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
}

impl Article {
    pub fn new(title: &str, description: &str, source_name: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            source_name: Some(source_name.to_string()),
        }
    }
}

/// A phone number in `+<country><subscriber>` form, 7 to 17 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validates `input` as given; surrounding whitespace is not stripped.
    pub fn parse(input: &str) -> Result<Self> {
        if PHONE_PATTERN.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(Error::InvalidPhone(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address form used on the WhatsApp channel.
    pub fn whatsapp(&self) -> String {
        format!("whatsapp:{}", self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the registration form submits once the phone number has been validated.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub phone: PhoneNumber,
}

/// Parameters of a single news provider request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsQuery {
    pub category: String,
    pub country: String,
    pub count: u32,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            category: "technology".to_string(),
            country: "us".to_string(),
            count: 5,
        }
    }
}

/// The synthesized narration after it has been written locally and uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioArtifact {
    pub local_path: PathBuf,
    pub key: String,
    pub url: String,
}

/// Delivery mode on the messaging provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    WhatsApp,
    Sms,
}

impl ChannelKind {
    /// Formats a phone number as an address on this channel.
    pub fn address(&self, phone: &PhoneNumber) -> String {
        match self {
            ChannelKind::WhatsApp => phone.whatsapp(),
            ChannelKind::Sms => phone.as_str().to_string(),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::WhatsApp => f.write_str("whatsapp"),
            ChannelKind::Sms => f.write_str("sms"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub body: String,
    pub media_urls: Vec<String>,
}
