use std::sync::Arc;
use std::time::Duration;

use crate::ai::prompt_builder::build_prompt;
use crate::core::models::{LengthMode, ResolvedContent, SummaryResult};
use crate::errors::{SummaryError, UpstreamError};
use crate::traits::SummaryModel;

/// Builds the length-controlled prompt and asks the model exactly once.
///
/// Holds no mutable state and does not log; callers decide what to report.
pub struct SummaryGenerator {
    model: Arc<dyn SummaryModel>,
    timeout: Duration,
}

impl SummaryGenerator {
    #[must_use]
    pub fn new(model: Arc<dyn SummaryModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// # Errors
    ///
    /// `GenerationFailed` if the model call fails, exceeds the timeout, or
    /// returns no text.
    pub async fn generate(
        &self,
        content: &ResolvedContent,
        mode: LengthMode,
    ) -> Result<SummaryResult, SummaryError> {
        let prompt = build_prompt(&content.text, mode);

        let text = tokio::time::timeout(self.timeout, self.model.complete(prompt))
            .await
            .map_err(UpstreamError::from)
            .and_then(|r| r)
            .map_err(SummaryError::GenerationFailed)?;

        if text.trim().is_empty() {
            return Err(SummaryError::GenerationFailed(UpstreamError::Malformed(
                "model returned empty text".to_string(),
            )));
        }

        Ok(SummaryResult { text })
    }
}
