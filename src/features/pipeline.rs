//! Composition root: resolve → generate → (optionally) save.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{error, info};

use super::resolve::ContentResolver;
use super::summarize::SummaryGenerator;
use crate::ai::LlmClient;
use crate::core::config::AppConfig;
use crate::core::history::{HistoryItem, HistoryStore};
use crate::core::models::{ContentRequest, LengthMode, SourceKind, SummaryOutcome};
use crate::errors::SummaryError;
use crate::video::VideoClient;

pub struct Pipeline {
    resolver: ContentResolver,
    generator: SummaryGenerator,
    history: Arc<HistoryStore>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        resolver: ContentResolver,
        generator: SummaryGenerator,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            resolver,
            generator,
            history,
        }
    }

    /// Wires the production OpenAI and YouTube clients from configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let llm = Arc::new(LlmClient::new(
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.model_name().to_string(),
            config.base_url().to_string(),
            config.model_timeout,
        ));
        let video = Arc::new(VideoClient::new(
            config.youtube_api_key.clone(),
            config.transcript_language.clone(),
            config.lookup_timeout,
        ));

        let resolver = ContentResolver::new(
            video.clone(),
            video,
            config.lookup_timeout,
            config.retry_policy(),
        );
        let generator = SummaryGenerator::new(llm, config.model_timeout);

        Self::new(resolver, generator, Arc::new(HistoryStore::new()))
    }

    #[must_use]
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// # Errors
    ///
    /// Propagates resolution and generation failures unchanged; nothing is
    /// returned for a request that failed part-way.
    #[tracing::instrument(
        level = "info",
        skip(self, request, mode),
        fields(source_kind = request.kind().as_str(), mode = ?mode)
    )]
    pub async fn summarize(
        &self,
        request: &ContentRequest,
        mode: LengthMode,
    ) -> Result<SummaryOutcome, SummaryError> {
        let outcome = async {
            let resolved = self.resolver.resolve(request).await?;
            let summary = self.generator.generate(&resolved, mode).await?;

            let transcript = (request.kind() == SourceKind::Video).then(|| resolved.text.clone());
            Ok::<_, SummaryError>(SummaryOutcome {
                summary: summary.text,
                metadata: resolved.metadata,
                transcript,
            })
        }
        .await;

        match &outcome {
            Ok(o) => info!(summary_chars = o.summary.len(), "Summarization succeeded"),
            Err(e) => error!(
                operation = "summarize",
                source_kind = request.kind().as_str(),
                error_kind = e.kind(),
                error = %e,
                "Summarization failed"
            ),
        }
        outcome
    }

    /// Runs [`Pipeline::summarize`] and records the result in history on success.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::summarize`]; nothing is saved on failure.
    pub async fn summarize_and_save(
        &self,
        request: &ContentRequest,
        mode: LengthMode,
    ) -> Result<(SummaryOutcome, HistoryItem), SummaryError> {
        let outcome = self.summarize(request, mode).await?;
        let item = self.history.save(history_record(&outcome));
        Ok((outcome, item))
    }
}

/// `{videoData?, summary, transcript?}` as stored in history.
#[must_use]
pub fn history_record(outcome: &SummaryOutcome) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(meta) = &outcome.metadata {
        match serde_json::to_value(meta) {
            Ok(v) => {
                fields.insert("videoData".to_string(), v);
            }
            Err(e) => error!(
                operation = "history_record",
                video_id = %meta.video_id,
                error = %e,
                "Failed to serialize video metadata for history"
            ),
        }
    }
    fields.insert("summary".to_string(), Value::String(outcome.summary.clone()));
    if let Some(t) = &outcome.transcript {
        fields.insert("transcript".to_string(), Value::String(t.clone()));
    }
    fields
}
