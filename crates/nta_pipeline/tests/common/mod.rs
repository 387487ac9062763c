#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use nta_core::{
    Article, AudioStore, Error, MessageChannel, NewsQuery, NewsSource, OutgoingMessage, PhoneNumber, Result,
    SpeechSynthesizer,
};
use nta_pipeline::Pipeline;
use nta_speech::AudioPublisher;

pub enum NewsReply {
    Articles(Vec<Article>),
    Fail(&'static str),
}

pub struct FakeNews {
    pub reply: NewsReply,
    pub calls: AtomicUsize,
    /// When set, `fetch` waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,
}

#[async_trait]
impl NewsSource for FakeNews {
    fn name(&self) -> &str {
        "fake-news"
    }

    async fn fetch(&self, _query: &NewsQuery) -> Result<Vec<Article>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            NewsReply::Articles(articles) => Ok(articles.clone()),
            NewsReply::Fail(reason) => Err(Error::News(reason.to_string())),
        }
    }
}

pub struct FakeSynthesizer {
    pub audio: Option<Vec<u8>>,
    pub texts: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    fn name(&self) -> &str {
        "fake-tts"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.texts.lock().unwrap().push(text.to_string());
        self.audio.clone().ok_or(Error::NoAudio)
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub uploads: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl AudioStore for FakeStore {
    async fn upload(&self, path: &Path, key: &str, _content_type: &str) -> Result<String> {
        self.uploads.lock().unwrap().push((path.to_path_buf(), key.to_string()));
        Ok(format!("https://temp-storage-mp3.s3.us-east-1.amazonaws.com/{}", key))
    }
}

pub struct FakeChannel {
    pub accept_whatsapp: bool,
    pub accept_sms: bool,
    pub sent: Mutex<Vec<OutgoingMessage>>,
}

#[async_trait]
impl MessageChannel for FakeChannel {
    async fn send(&self, message: &OutgoingMessage) -> Result<String> {
        self.sent.lock().unwrap().push(message.clone());
        let whatsapp = message.to.starts_with("whatsapp:");
        if (whatsapp && self.accept_whatsapp) || (!whatsapp && self.accept_sms) {
            Ok(format!("SM{}", self.sent.lock().unwrap().len()))
        } else {
            Err(Error::Messaging("rejected".to_string()))
        }
    }
}

pub struct Harness {
    pub news: Arc<FakeNews>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub store: Arc<FakeStore>,
    pub channel: Arc<FakeChannel>,
    pub output: tempfile::TempDir,
}

impl Harness {
    pub fn new(reply: NewsReply) -> Self {
        Self {
            news: Arc::new(FakeNews {
                reply,
                calls: AtomicUsize::new(0),
                gate: None,
            }),
            synthesizer: Arc::new(FakeSynthesizer {
                audio: Some(b"mp3 bytes".to_vec()),
                texts: Mutex::new(Vec::new()),
            }),
            store: Arc::new(FakeStore::default()),
            channel: Arc::new(FakeChannel {
                accept_whatsapp: true,
                accept_sms: true,
                sent: Mutex::new(Vec::new()),
            }),
            output: tempfile::tempdir().unwrap(),
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        let reply = match Arc::try_unwrap(self.news) {
            Ok(news) => news.reply,
            Err(_) => panic!("news source already shared"),
        };
        self.news = Arc::new(FakeNews {
            reply,
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        });
        self
    }

    pub fn without_audio(mut self) -> Self {
        self.synthesizer = Arc::new(FakeSynthesizer {
            audio: None,
            texts: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn rejecting(mut self, accept_whatsapp: bool, accept_sms: bool) -> Self {
        self.channel = Arc::new(FakeChannel {
            accept_whatsapp,
            accept_sms,
            sent: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn pipeline(&self) -> Arc<Pipeline> {
        let publisher = AudioPublisher::new(
            self.synthesizer.clone(),
            self.store.clone(),
            self.output.path().to_path_buf(),
        );
        Arc::new(Pipeline::new(
            self.news.clone(),
            Arc::new(publisher),
            self.channel.clone(),
            sender(),
        ))
    }

    pub fn sends(&self) -> usize {
        self.channel.sent.lock().unwrap().len()
    }

    pub fn syntheses(&self) -> usize {
        self.synthesizer.texts.lock().unwrap().len()
    }
}

pub fn sender() -> PhoneNumber {
    PhoneNumber::parse("+1234567890").unwrap()
}

pub fn recipient() -> PhoneNumber {
    PhoneNumber::parse("+14155550132").unwrap()
}

pub fn headlines(n: usize) -> Vec<Article> {
    (1..=n)
        .map(|i| Article::new(&format!("Headline {i}"), &format!("Summary {i}"), "Wire"))
        .collect()
}
