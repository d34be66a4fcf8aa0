use thiserror::Error;

/// Why a single upstream call (model, metadata, transcript) did not produce a usable answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("prompt too large: ~{0} tokens")]
    TooLarge(usize),
}

impl UpstreamError {
    /// Transient causes worth another attempt: timeouts, connection failures,
    /// throttling and server-side errors. Bad credentials, unknown ids and
    /// unparseable payloads are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Timeout | UpstreamError::Network(_) => true,
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::NotFound(_)
            | UpstreamError::Malformed(_)
            | UpstreamError::TooLarge(_) => false,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            UpstreamError::Timeout
        } else if error.is_decode() {
            UpstreamError::Malformed(error.to_string())
        } else if let Some(status) = error.status() {
            UpstreamError::Status {
                status: status.as_u16(),
                body: error.to_string(),
            }
        } else {
            UpstreamError::Network(error.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for UpstreamError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        UpstreamError::Timeout
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to fetch video metadata: {0}")]
    MetadataUnavailable(#[source] UpstreamError),

    #[error("Failed to fetch video transcript: {0}")]
    TranscriptUnavailable(#[source] UpstreamError),

    #[error("Failed to generate summary: {0}")]
    GenerationFailed(#[source] UpstreamError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SummaryError {
    /// Caller errors are surfaced verbatim; everything else is a service failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, SummaryError::Validation(_))
    }

    /// Short tag used in structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::Validation(_) => "validation",
            SummaryError::MetadataUnavailable(_) => "metadata_unavailable",
            SummaryError::TranscriptUnavailable(_) => "transcript_unavailable",
            SummaryError::GenerationFailed(_) => "generation_failed",
            SummaryError::Config(_) => "config",
        }
    }
}
