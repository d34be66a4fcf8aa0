use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SummaryError;
use crate::video::id::parse_video_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Transcript,
    Video,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Transcript => "transcript",
            SourceKind::Video => "video",
        }
    }

    /// Request field that carries the payload for this source.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            SourceKind::Text => "content",
            SourceKind::Transcript => "transcript",
            SourceKind::Video => "videoId",
        }
    }
}

/// A validated summarization input. Fields are private so the payload can
/// only be set through the checking constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    kind: SourceKind,
    payload: String,
}

impl ContentRequest {
    /// # Errors
    ///
    /// Returns `SummaryError::Validation` if the payload is absent or blank,
    /// or, for video sources, not a recognizable video id or URL.
    pub fn new(kind: SourceKind, payload: Option<&str>) -> Result<Self, SummaryError> {
        let raw = payload
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SummaryError::Validation(format!("{} is required", kind.field_name())))?;

        // Text bodies are kept as sent; only the emptiness check ignores whitespace.
        let payload = match kind {
            SourceKind::Text | SourceKind::Transcript => raw.to_string(),
            SourceKind::Video => parse_video_id(raw.trim()).ok_or_else(|| {
                SummaryError::Validation(format!("{} is not a valid video id", kind.field_name()))
            })?,
        };

        Ok(Self { kind, payload })
    }

    /// # Errors
    pub fn text(content: Option<&str>) -> Result<Self, SummaryError> {
        Self::new(SourceKind::Text, content)
    }

    /// # Errors
    pub fn transcript(transcript: Option<&str>) -> Result<Self, SummaryError> {
        Self::new(SourceKind::Transcript, transcript)
    }

    /// # Errors
    pub fn video(video_id: Option<&str>) -> Result<Self, SummaryError> {
        Self::new(SourceKind::Video, video_id)
    }

    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub text: String,
    pub metadata: Option<VideoMetadata>,
}

/// Summary verbosity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthMode {
    /// Anything other than `short` or `long` (case-insensitive) falls back to medium.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "short" => LengthMode::Short,
            "long" => LengthMode::Long,
            _ => LengthMode::Medium,
        }
    }

    #[must_use]
    pub fn from_option(label: Option<&str>) -> Self {
        label.map(Self::from_label).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub text: String,
}

/// What the pipeline hands back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub summary: String,
    pub metadata: Option<VideoMetadata>,
    pub transcript: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_payload_is_rejected_with_field_name() {
        let err = ContentRequest::text(Some("   ")).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("content is required"));

        let err = ContentRequest::transcript(None).unwrap_err();
        assert!(err.to_string().contains("transcript is required"));

        let err = ContentRequest::video(None).unwrap_err();
        assert!(err.to_string().contains("videoId is required"));
    }

    #[test]
    fn test_text_payload_is_kept_verbatim() {
        let req = ContentRequest::text(Some("  The quick brown fox \n")).unwrap();
        assert_eq!(req.kind(), SourceKind::Text);
        assert_eq!(req.payload(), "  The quick brown fox \n");

        let req = ContentRequest::transcript(Some("\tA: hi\nB: hello\n")).unwrap();
        assert_eq!(req.payload(), "\tA: hi\nB: hello\n");
    }

    #[test]
    fn test_video_input_is_trimmed_before_parsing() {
        let req = ContentRequest::video(Some("  abc123\n")).unwrap();
        assert_eq!(req.payload(), "abc123");
    }

    #[test]
    fn test_video_url_is_reduced_to_id() {
        let req = ContentRequest::video(Some("https://youtu.be/abc123")).unwrap();
        assert_eq!(req.kind(), SourceKind::Video);
        assert_eq!(req.payload(), "abc123");
    }

    #[test]
    fn test_malformed_video_id_is_validation_error() {
        let err = ContentRequest::video(Some("not a video id!")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_length_mode_fallback() {
        assert_eq!(LengthMode::from_label("short"), LengthMode::Short);
        assert_eq!(LengthMode::from_label("LONG"), LengthMode::Long);
        assert_eq!(LengthMode::from_label("medium"), LengthMode::Medium);
        assert_eq!(LengthMode::from_label("epic"), LengthMode::Medium);
        assert_eq!(LengthMode::from_option(None), LengthMode::Medium);
    }

    #[test]
    fn test_video_metadata_serializes_camel_case() {
        let meta = VideoMetadata {
            video_id: "abc123".into(),
            title: "T".into(),
            thumbnail_url: "https://i.ytimg.com/vi/abc123/hqdefault.jpg".into(),
            channel_title: "Channel".into(),
            published_at: "2024-01-02T03:04:05Z".parse().unwrap(),
        };
        let v = serde_json::to_value(&meta).unwrap();
        assert_eq!(v["videoId"], "abc123");
        assert_eq!(v["thumbnailUrl"], "https://i.ytimg.com/vi/abc123/hqdefault.jpg");
        assert_eq!(v["channelTitle"], "Channel");
        assert_eq!(v["publishedAt"], "2024-01-02T03:04:05Z");
    }
}
