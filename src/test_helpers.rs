//! Counting fakes for the upstream seams.
//!
//! Available only under `#[cfg(test)]`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content};

use crate::core::models::VideoMetadata;
use crate::errors::UpstreamError;
use crate::traits::{MetadataSource, SummaryModel, TranscriptSource};

pub fn sample_metadata(video_id: &str, title: &str) -> VideoMetadata {
    VideoMetadata {
        video_id: video_id.to_string(),
        title: title.to_string(),
        thumbnail_url: format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"),
        channel_title: "Test Channel".to_string(),
        published_at: "2024-03-01T12:00:00Z".parse().unwrap(),
    }
}

/// Shared behaviour: a canned reply, an optional delay, and a number of
/// leading calls that fail with a given error.
struct Script<T> {
    reply: Result<T, UpstreamError>,
    delay: Option<Duration>,
    fail_first: usize,
    fail_with: Option<UpstreamError>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(reply: Result<T, UpstreamError>) -> Self {
        Self {
            reply,
            delay: None,
            fail_first: 0,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    async fn play(&self) -> Result<T, UpstreamError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if n < self.fail_first
            && let Some(e) = &self.fail_with
        {
            return Err(e.clone());
        }
        self.reply.clone()
    }
}

// ============================================================================
// Metadata
// ============================================================================

pub struct FakeMetadata(Script<VideoMetadata>);

impl FakeMetadata {
    pub fn ok(meta: VideoMetadata) -> Self {
        Self(Script::new(Ok(meta)))
    }

    pub fn err(e: UpstreamError) -> Self {
        Self(Script::new(Err(e)))
    }

    pub fn failing_first(mut self, n: usize, e: UpstreamError) -> Self {
        self.0.fail_first = n;
        self.0.fail_with = Some(e);
        self
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn fetch_metadata(&self, _video_id: &str) -> Result<VideoMetadata, UpstreamError> {
        self.0.play().await
    }
}

// ============================================================================
// Transcripts
// ============================================================================

pub struct FakeTranscripts(Script<String>);

impl FakeTranscripts {
    pub fn ok(text: &str) -> Self {
        Self(Script::new(Ok(text.to_string())))
    }

    pub fn err(e: UpstreamError) -> Self {
        Self(Script::new(Err(e)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn fetch_transcript(&self, _video_id: &str) -> Result<String, UpstreamError> {
        self.0.play().await
    }
}

// ============================================================================
// Model
// ============================================================================

pub struct FakeModel {
    script: Script<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn ok(reply: &str) -> Self {
        Self {
            script: Script::new(Ok(reply.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn err(e: UpstreamError) -> Self {
        Self {
            script: Script::new(Err(e)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.script.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    /// Text of every prompt received, one entry per call.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryModel for FakeModel {
    async fn complete(&self, prompt: Vec<ChatCompletionMessage>) -> Result<String, UpstreamError> {
        let text = prompt
            .iter()
            .filter_map(|m| match &m.content {
                Content::Text(t) => Some(t.clone()),
                Content::ImageUrl(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(text);
        self.script.play().await
    }
}
