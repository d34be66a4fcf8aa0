//! Seams to the three upstream services.
//!
//! The production implementations are [`crate::ai::LlmClient`] and
//! [`crate::video::VideoClient`]; tests substitute counting fakes.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::ChatCompletionMessage;

use crate::core::models::VideoMetadata;
use crate::errors::UpstreamError;

/// Looks up title, thumbnail, channel and publish date for a video.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, UpstreamError>;
}

/// Fetches the spoken transcript of a video as plain text.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Result<String, UpstreamError>;
}

/// A hosted generative model that turns a prompt into text.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn complete(&self, prompt: Vec<ChatCompletionMessage>) -> Result<String, UpstreamError>;
}
