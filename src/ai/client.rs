//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the Responses API call used to generate summaries.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::UpstreamError;
use crate::traits::SummaryModel;

const MAX_CONTEXT_TOKENS: usize = 128_000;
const MAX_OUTPUT_TOKENS: usize = 4_096;
const MIN_OUTPUT_TOKENS: usize = 256;
const TOKEN_BUFFER: usize = 250;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Output budget left after the prompt, or `None` if the prompt does not fit.
#[must_use]
pub fn output_token_budget(prompt: &[ChatCompletionMessage]) -> Option<usize> {
    let estimated_input_tokens = prompt
        .iter()
        .map(|msg| match &msg.content {
            Content::Text(t) => estimate_tokens(t),
            Content::ImageUrl(_) => 0,
        })
        .sum::<usize>();

    let budget = MAX_CONTEXT_TOKENS
        .saturating_sub(estimated_input_tokens)
        .saturating_sub(TOKEN_BUFFER)
        .min(MAX_OUTPUT_TOKENS);

    (budget >= MIN_OUTPUT_TOKENS).then_some(budget)
}

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    base_url: String,
}

impl LlmClient {
    #[must_use]
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        base_url: String,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key,
            org_id,
            model_name,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the prompt does not fit the context window, the
    /// HTTP request fails, or the response carries no output text.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, UpstreamError> {
        #[cfg(feature = "debug-logs")]
        debug!("Using model prompt:\n{:?}", prompt);

        let max_output_tokens = output_token_budget(&prompt).ok_or_else(|| {
            let estimated = prompt
                .iter()
                .map(|m| estimate_tokens(&format!("{:?}", m.content)))
                .sum();
            UpstreamError::TooLarge(estimated)
        })?;

        info!(
            model = %self.model_name,
            messages = prompt.len(),
            max_output_tokens,
            "Requesting summary from model"
        );

        let request_body = ResponsesRequest {
            model: &self.model_name,
            input: responses_input(&prompt),
            max_output_tokens,
        };

        let mut request = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body);

        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(format!("Failed to parse model response: {e}")))?;

        let text = extract_output_text(&response_json)
            .ok_or_else(|| UpstreamError::Malformed("No text in response".to_string()))?;

        debug!(chars = text.len(), "Model returned summary");
        Ok(text)
    }
}

#[async_trait]
impl SummaryModel for LlmClient {
    async fn complete(&self, prompt: Vec<ChatCompletionMessage>) -> Result<String, UpstreamError> {
        self.generate_summary(prompt).await
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    max_output_tokens: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputPart<'a> {
    InputText { text: &'a str },
}

/// Maps chat messages onto Responses API input.
/// Assistant turns are dropped since the Responses API treats them as output,
/// and non-text content has no place in a summary prompt.
pub(crate) fn responses_input(prompt: &[ChatCompletionMessage]) -> Vec<InputMessage<'_>> {
    prompt
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                MessageRole::assistant => return None,
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
            };
            let Content::Text(text) = &m.content else {
                return None;
            };
            Some(InputMessage {
                role,
                content: vec![InputPart::InputText { text }],
            })
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesBody {
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputPart>,
}

#[derive(Debug, Deserialize)]
struct OutputPart {
    #[serde(rename = "type")]
    kind: String,
    text: Option<PartText>,
}

/// Output text shows up either as a plain string or as `{ "value": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PartText {
    Plain(String),
    Wrapped { value: String },
}

impl PartText {
    fn into_string(self) -> String {
        match self {
            Self::Plain(s) | Self::Wrapped { value: s } => s,
        }
    }
}

/// Pulls the generated text out of a Responses API body.
///
/// Prefers the top-level `output_text` convenience field; otherwise joins
/// every `output_text` part found under `output[].content[]`. Blank output
/// counts as no output.
#[must_use]
pub fn extract_output_text(body: &Value) -> Option<String> {
    let parsed = ResponsesBody::deserialize(body).unwrap_or_default();

    let text = match parsed.output_text {
        Some(top) => top,
        None => parsed
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.map(PartText::into_string))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    (!text.trim().is_empty()).then_some(text)
}
