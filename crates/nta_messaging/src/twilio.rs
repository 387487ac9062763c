use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use nta_core::{Error, MessageChannel, OutgoingMessage, Result, Settings};

#[derive(Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// API root, `https://api.twilio.com` outside of tests
    pub api_url: Url,
}

impl fmt::Debug for TwilioOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioOptions")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    code: Option<i64>,
    message: Option<String>,
}

/// Client for the Twilio Programmable Messaging API.
///
/// The same client serves both the WhatsApp and SMS channels; the channel is
/// selected by the address prefix of the message.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    options: TwilioOptions,
    client: Client,
}

impl TwilioClient {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(TwilioOptions {
            account_sid: settings.twilio_account_sid.clone(),
            auth_token: settings.twilio_auth_token.clone(),
            api_url: settings.twilio_api_url.clone(),
        })
    }

    fn messages_url(&self) -> Result<Url> {
        self.options
            .api_url
            .join(&format!("2010-04-01/Accounts/{}/Messages.json", self.options.account_sid))
            .map_err(|e| Error::Messaging(format!("Invalid Twilio URL: {}", e)))
    }
}

/// Turns a non-2xx Twilio body into a readable reason.
fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<TwilioError>(body) {
        Ok(TwilioError {
            code: Some(code),
            message: Some(message),
        }) => format!("Twilio error {} ({}): {}", code, status, message),
        Ok(TwilioError {
            message: Some(message),
            ..
        }) => format!("Twilio error ({}): {}", status, message),
        _ => format!("Twilio returned {}: {}", status, body),
    }
}

#[async_trait]
impl MessageChannel for TwilioClient {
    async fn send(&self, message: &OutgoingMessage) -> Result<String> {
        let mut form: Vec<(&str, &str)> = vec![
            ("From", message.from.as_str()),
            ("To", message.to.as_str()),
            ("Body", message.body.as_str()),
        ];
        for media_url in &message.media_urls {
            form.push(("MediaUrl", media_url.as_str()));
        }

        debug!("Sending message from {} to {}", message.from, message.to);
        let response = self
            .client
            .post(self.messages_url()?)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Messaging(describe_error(status, &body)));
        }

        let resource = response
            .json::<MessageResource>()
            .await
            .map_err(|e| Error::Messaging(format!("Failed to parse Twilio response: {}", e)))?;
        Ok(resource.sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn client(api_url: &str) -> TwilioClient {
        TwilioClient::new(TwilioOptions {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            api_url: Url::parse(api_url).unwrap(),
        })
    }

    #[test]
    fn test_messages_url() {
        assert_eq!(
            client("https://api.twilio.com").messages_url().unwrap().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_describe_error() {
        let body = r#"{"code": 63016, "message": "Failed to send freeform message", "status": 400}"#;
        assert_eq!(
            describe_error(StatusCode::BAD_REQUEST, body),
            "Twilio error 63016 (400 Bad Request): Failed to send freeform message"
        );
        assert_eq!(
            describe_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "Twilio returned 502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", client("https://api.twilio.com"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"token\""));
    }
}
