use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::models::{ContentRequest, ResolvedContent, SourceKind, VideoMetadata};
use crate::errors::{SummaryError, UpstreamError};
use crate::traits::{MetadataSource, TranscriptSource};
use crate::utils::retry::RetryPolicy;

/// Turns a validated request into summarizable text plus optional video metadata.
pub struct ContentResolver {
    metadata: Arc<dyn MetadataSource>,
    transcripts: Arc<dyn TranscriptSource>,
    lookup_timeout: Duration,
    retry: RetryPolicy,
}

impl ContentResolver {
    #[must_use]
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        transcripts: Arc<dyn TranscriptSource>,
        lookup_timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            metadata,
            transcripts,
            lookup_timeout,
            retry,
        }
    }

    /// Text and transcript sources pass straight through. Video sources need
    /// both the metadata and the transcript lookup to succeed; there is no
    /// partial result.
    ///
    /// # Errors
    ///
    /// `MetadataUnavailable` or `TranscriptUnavailable` naming the lookup that
    /// failed. When both fail the metadata failure is reported.
    pub async fn resolve(&self, request: &ContentRequest) -> Result<ResolvedContent, SummaryError> {
        match request.kind() {
            SourceKind::Text | SourceKind::Transcript => Ok(ResolvedContent {
                text: request.payload().to_string(),
                metadata: None,
            }),
            SourceKind::Video => self.resolve_video(request.payload()).await,
        }
    }

    async fn resolve_video(&self, video_id: &str) -> Result<ResolvedContent, SummaryError> {
        let (metadata, transcript) = tokio::join!(
            self.lookup_metadata(video_id),
            self.lookup_transcript(video_id)
        );

        let metadata = metadata.map_err(|e| {
            warn!(video_id, error = %e, "Video metadata lookup failed");
            SummaryError::MetadataUnavailable(e)
        })?;
        let text = transcript.map_err(|e| {
            warn!(video_id, error = %e, "Video transcript lookup failed");
            SummaryError::TranscriptUnavailable(e)
        })?;

        info!(video_id, chars = text.len(), "Resolved video content");
        Ok(ResolvedContent {
            text,
            metadata: Some(metadata),
        })
    }

    async fn lookup_metadata(&self, video_id: &str) -> Result<VideoMetadata, UpstreamError> {
        self.retry
            .run("metadata_lookup", || async {
                tokio::time::timeout(self.lookup_timeout, self.metadata.fetch_metadata(video_id))
                    .await?
            })
            .await
    }

    async fn lookup_transcript(&self, video_id: &str) -> Result<String, UpstreamError> {
        let text = self
            .retry
            .run("transcript_lookup", || async {
                tokio::time::timeout(
                    self.lookup_timeout,
                    self.transcripts.fetch_transcript(video_id),
                )
                .await?
            })
            .await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(UpstreamError::NotFound("transcript is empty".to_string()));
        }
        Ok(text.to_string())
    }
}
