use serde::Serialize;
use tracing::{error, info, warn};

use nta_core::{ChannelKind, Error, MessageChannel, OutgoingMessage, PhoneNumber, Result};

pub const NEWS_AUDIO_BODY: &str = "Here's your news audio update for today!";

/// A message the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub channel: ChannelKind,
    pub sid: String,
}

fn message_for(channel: ChannelKind, sender: &PhoneNumber, recipient: &PhoneNumber, media_url: &str) -> OutgoingMessage {
    OutgoingMessage {
        from: channel.address(sender),
        to: channel.address(recipient),
        body: NEWS_AUDIO_BODY.to_string(),
        media_urls: vec![media_url.to_string()],
    }
}

/// Sends the audio link over WhatsApp, falling back once to SMS/MMS.
///
/// Returns `Error::Delivery` carrying both reasons when neither attempt succeeds.
pub async fn deliver_with_fallback(
    channel: &dyn MessageChannel,
    sender: &PhoneNumber,
    recipient: &PhoneNumber,
    media_url: &str,
) -> Result<Delivery> {
    let primary = message_for(ChannelKind::WhatsApp, sender, recipient, media_url);
    let primary_error = match channel.send(&primary).await {
        Ok(sid) => {
            info!("💬 WhatsApp message sent! SID: {}", sid);
            return Ok(Delivery {
                channel: ChannelKind::WhatsApp,
                sid,
            });
        }
        Err(e) => e,
    };

    warn!("⚠️ Error sending WhatsApp message: {}", primary_error);
    warn!("WhatsApp delivery needs an approved sender, an opted-in recipient and an approved template for the first message");
    info!("📱 Attempting to send as SMS with MMS attachment instead...");

    let fallback = message_for(ChannelKind::Sms, sender, recipient, media_url);
    match channel.send(&fallback).await {
        Ok(sid) => {
            info!("📱 SMS message sent! SID: {}", sid);
            Ok(Delivery {
                channel: ChannelKind::Sms,
                sid,
            })
        }
        Err(fallback_error) => {
            error!("❌ Error sending SMS message: {}", fallback_error);
            Err(Error::Delivery {
                primary: primary_error.to_string(),
                fallback: fallback_error.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted results and records every message it was asked to send.
    struct ScriptedChannel {
        replies: Mutex<VecDeque<Result<String>>>,
        sent: Mutex<Vec<OutgoingMessage>>,
    }

    impl ScriptedChannel {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MessageChannel for ScriptedChannel {
        async fn send(&self, message: &OutgoingMessage) -> Result<String> {
            self.sent.lock().unwrap().push(message.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Messaging("unexpected send".to_string())))
        }
    }

    fn numbers() -> (PhoneNumber, PhoneNumber) {
        (
            PhoneNumber::parse("+1234567890").unwrap(),
            PhoneNumber::parse("+0987654321").unwrap(),
        )
    }

    const URL: &str = "https://bucket.s3.us-east-1.amazonaws.com/audio/news_audio.mp3";

    #[tokio::test]
    async fn test_whatsapp_success_sends_once() {
        let channel = ScriptedChannel::new(vec![Ok("SM1".to_string())]);
        let (sender, recipient) = numbers();

        let delivery = deliver_with_fallback(&channel, &sender, &recipient, URL).await.unwrap();

        assert_eq!(delivery, Delivery { channel: ChannelKind::WhatsApp, sid: "SM1".to_string() });
        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "whatsapp:+1234567890");
        assert_eq!(sent[0].to, "whatsapp:+0987654321");
        assert_eq!(sent[0].media_urls, vec![URL.to_string()]);
        assert_eq!(sent[0].body, NEWS_AUDIO_BODY);
    }

    #[tokio::test]
    async fn test_rejection_falls_back_to_sms_once() {
        let channel = ScriptedChannel::new(vec![
            Err(Error::Messaging("63016 recipient not opted in".to_string())),
            Ok("SM2".to_string()),
        ]);
        let (sender, recipient) = numbers();

        let delivery = deliver_with_fallback(&channel, &sender, &recipient, URL).await.unwrap();

        assert_eq!(delivery.channel, ChannelKind::Sms);
        assert_eq!(delivery.sid, "SM2");
        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].from, "+1234567890");
        assert_eq!(sent[1].to, "+0987654321");
        assert_eq!(sent[1].body, sent[0].body);
        assert_eq!(sent[1].media_urls, sent[0].media_urls);
    }

    #[tokio::test]
    async fn test_both_failures_are_reported() {
        let channel = ScriptedChannel::new(vec![
            Err(Error::Messaging("whatsapp down".to_string())),
            Err(Error::Messaging("sms down".to_string())),
        ]);
        let (sender, recipient) = numbers();

        let err = deliver_with_fallback(&channel, &sender, &recipient, URL).await.unwrap_err();

        match err {
            Error::Delivery { primary, fallback } => {
                assert!(primary.contains("whatsapp down"));
                assert!(fallback.contains("sms down"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(channel.sent.lock().unwrap().len(), 2);
    }
}
