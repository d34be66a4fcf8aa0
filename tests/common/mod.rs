//! Fakes and router wiring shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use openai_api_rs::v1::chat_completion::ChatCompletionMessage;
use recap::core::history::HistoryStore;
use recap::core::models::VideoMetadata;
use recap::errors::UpstreamError;
use recap::features::{ContentResolver, Pipeline, SummaryGenerator};
use recap::traits::{MetadataSource, SummaryModel, TranscriptSource};
use recap::utils::retry::RetryPolicy;

#[derive(Default)]
pub struct Counters {
    pub metadata: AtomicUsize,
    pub transcript: AtomicUsize,
    pub model: AtomicUsize,
}

impl Counters {
    pub fn upstream_calls(&self) -> usize {
        self.metadata.load(Ordering::SeqCst)
            + self.transcript.load(Ordering::SeqCst)
            + self.model.load(Ordering::SeqCst)
    }
}

/// Scripted upstream behaviour for one test.
#[derive(Clone)]
pub struct Upstream {
    pub metadata: Result<VideoMetadata, UpstreamError>,
    pub transcript: Result<String, UpstreamError>,
    pub summary: Result<String, UpstreamError>,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            metadata: Ok(metadata("abc123", "T")),
            transcript: Ok("hello world".to_string()),
            summary: Ok("A generated summary.".to_string()),
        }
    }
}

pub fn metadata(video_id: &str, title: &str) -> VideoMetadata {
    VideoMetadata {
        video_id: video_id.to_string(),
        title: title.to_string(),
        thumbnail_url: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
        channel_title: "Test Channel".to_string(),
        published_at: "2024-03-01T12:00:00Z".parse().unwrap(),
    }
}

struct Fake {
    upstream: Upstream,
    counters: Arc<Counters>,
}

#[async_trait]
impl MetadataSource for Fake {
    async fn fetch_metadata(&self, _video_id: &str) -> Result<VideoMetadata, UpstreamError> {
        self.counters.metadata.fetch_add(1, Ordering::SeqCst);
        self.upstream.metadata.clone()
    }
}

#[async_trait]
impl TranscriptSource for Fake {
    async fn fetch_transcript(&self, _video_id: &str) -> Result<String, UpstreamError> {
        self.counters.transcript.fetch_add(1, Ordering::SeqCst);
        self.upstream.transcript.clone()
    }
}

#[async_trait]
impl SummaryModel for Fake {
    async fn complete(&self, _prompt: Vec<ChatCompletionMessage>) -> Result<String, UpstreamError> {
        self.counters.model.fetch_add(1, Ordering::SeqCst);
        self.upstream.summary.clone()
    }
}

pub fn pipeline(upstream: Upstream) -> (Arc<Pipeline>, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let fake = Arc::new(Fake {
        upstream,
        counters: counters.clone(),
    });

    let resolver = ContentResolver::new(
        fake.clone(),
        fake.clone(),
        Duration::from_secs(1),
        RetryPolicy::single_attempt(),
    );
    let generator = SummaryGenerator::new(fake, Duration::from_secs(1));
    let pipeline = Pipeline::new(resolver, generator, Arc::new(HistoryStore::new()));

    (Arc::new(pipeline), counters)
}

/// Build the same Router the binary uses, over fake upstreams.
pub fn test_router(upstream: Upstream) -> (Router, Arc<Pipeline>, Arc<Counters>) {
    let (pipeline, counters) = pipeline(upstream);
    (recap::api::router(pipeline.clone()), pipeline, counters)
}
