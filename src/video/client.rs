//! YouTube client module
//!
//! Metadata comes from the Data API v3 `videos` endpoint; transcripts come
//! from the caption tracks advertised on the public watch page.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::transcript::{extract_caption_tracks, parse_timed_text, select_track};
use crate::core::models::VideoMetadata;
use crate::errors::UpstreamError;
use crate::traits::{MetadataSource, TranscriptSource};

const DATA_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_BASE: &str = "https://www.youtube.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn best_url(self) -> String {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
            .unwrap_or_default()
    }
}

/// YouTube metadata and transcript client
pub struct VideoClient {
    http: Client,
    api_key: String,
    transcript_language: String,
    data_api_base: String,
    watch_base: String,
}

impl VideoClient {
    #[must_use]
    pub fn new(api_key: String, transcript_language: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key,
            transcript_language,
            data_api_base: DATA_API_BASE.to_string(),
            watch_base: WATCH_BASE.to_string(),
        }
    }

    /// Points both lookups at another host (used against local fakes).
    #[must_use]
    pub fn with_base_urls(mut self, data_api_base: &str, watch_base: &str) -> Self {
        self.data_api_base = data_api_base.trim_end_matches('/').to_string();
        self.watch_base = watch_base.trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String, UpstreamError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl MetadataSource for VideoClient {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, UpstreamError> {
        debug!(video_id, "Fetching video metadata");

        let body = self
            .get_text(
                self.http
                    .get(format!("{}/videos", self.data_api_base))
                    .query(&[("part", "snippet"), ("id", video_id), ("key", self.api_key.as_str())]),
            )
            .await?;

        let list: VideoListResponse = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Malformed(format!("videos response: {e}")))?;

        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::NotFound(format!("video {video_id}")))?;

        info!(video_id, title = %item.snippet.title, "Fetched video metadata");

        Ok(VideoMetadata {
            video_id: item.id,
            title: item.snippet.title,
            thumbnail_url: item.snippet.thumbnails.best_url(),
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
        })
    }
}

#[async_trait]
impl TranscriptSource for VideoClient {
    async fn fetch_transcript(&self, video_id: &str) -> Result<String, UpstreamError> {
        debug!(video_id, "Fetching video transcript");

        let page = self
            .get_text(
                self.http
                    .get(format!("{}/watch", self.watch_base))
                    .query(&[("v", video_id)]),
            )
            .await?;

        let tracks = extract_caption_tracks(&page)?;
        let track = select_track(&tracks, &self.transcript_language)
            .ok_or_else(|| UpstreamError::NotFound("no caption track".to_string()))?;

        let xml = self.get_text(self.http.get(&track.base_url)).await?;
        let transcript = parse_timed_text(&xml)?;

        info!(
            video_id,
            language = %track.language_code,
            chars = transcript.len(),
            "Fetched video transcript"
        );
        Ok(transcript)
    }
}
