#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use nta_core::{
    Article, AudioStore, ConfigStore, MessageChannel, NewsQuery, NewsSource, OutgoingMessage, PhoneNumber, Result,
    SpeechSynthesizer, SynthesisFailurePolicy,
};
use nta_pipeline::{Pipeline, RunRegistry};
use nta_speech::AudioPublisher;
use nta_web::AppState;

#[derive(Default)]
pub struct Counters {
    pub fetches: AtomicUsize,
    pub syntheses: AtomicUsize,
    pub uploads: AtomicUsize,
    pub sends: AtomicUsize,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

struct StubNews {
    articles: Vec<Article>,
    gate: Option<Arc<Notify>>,
    counters: Arc<Counters>,
}

#[async_trait]
impl NewsSource for StubNews {
    fn name(&self) -> &str {
        "stub-news"
    }

    async fn fetch(&self, _query: &NewsQuery) -> Result<Vec<Article>> {
        self.counters.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.articles.clone())
    }
}

struct StubSynthesizer(Arc<Counters>);

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    fn name(&self) -> &str {
        "stub-tts"
    }

    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        self.0.syntheses.fetch_add(1, Ordering::SeqCst);
        Ok(b"mp3".to_vec())
    }
}

struct StubStore(Arc<Counters>);

#[async_trait]
impl AudioStore for StubStore {
    async fn upload(&self, _path: &Path, key: &str, _content_type: &str) -> Result<String> {
        self.0.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://bucket.example/{}", key))
    }
}

struct StubChannel(Arc<Counters>);

#[async_trait]
impl MessageChannel for StubChannel {
    async fn send(&self, _message: &OutgoingMessage) -> Result<String> {
        let n = self.0.sends.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("SM{}", n))
    }
}

pub struct TestApp {
    pub counters: Arc<Counters>,
    pub registry: Arc<RunRegistry>,
    pub output: tempfile::TempDir,
}

impl TestApp {
    pub fn new(articles: Vec<Article>, gate: Option<Arc<Notify>>) -> Self {
        let counters = Arc::new(Counters::default());
        let output = tempfile::tempdir().unwrap();
        let publisher = AudioPublisher::new(
            Arc::new(StubSynthesizer(counters.clone())),
            Arc::new(StubStore(counters.clone())),
            output.path().to_path_buf(),
        );
        let pipeline = Pipeline::new(
            Arc::new(StubNews {
                articles,
                gate,
                counters: counters.clone(),
            }),
            Arc::new(publisher),
            Arc::new(StubChannel(counters.clone())),
            PhoneNumber::parse("+1234567890").unwrap(),
        );
        let registry = RunRegistry::new(Arc::new(pipeline), SynthesisFailurePolicy::Complete);
        Self {
            counters,
            registry,
            output,
        }
    }

    pub fn state(&self, store: Arc<dyn ConfigStore>) -> AppState {
        AppState::new(self.registry.clone(), store)
    }
}
