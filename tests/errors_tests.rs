use std::error::Error;
use recap::errors::{SummaryError, UpstreamError};

#[test]
fn test_summary_error_implements_error_trait() {
    // Verify SummaryError implements the Error trait
    fn assert_error<T: Error>(_: &T) {}

    let error = SummaryError::Validation("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_summary_error_display() {
    let error = SummaryError::Validation("content is required".to_string());
    assert_eq!(format!("{error}"), "Invalid request: content is required");

    let error = SummaryError::MetadataUnavailable(UpstreamError::Timeout);
    assert_eq!(
        format!("{error}"),
        "Failed to fetch video metadata: request timed out"
    );

    let error = SummaryError::TranscriptUnavailable(UpstreamError::NotFound(
        "video has no captions available".to_string(),
    ));
    assert_eq!(
        format!("{error}"),
        "Failed to fetch video transcript: not found: video has no captions available"
    );

    let error = SummaryError::GenerationFailed(UpstreamError::Status {
        status: 429,
        body: "quota exceeded".to_string(),
    });
    assert_eq!(
        format!("{error}"),
        "Failed to generate summary: upstream returned status 429: quota exceeded"
    );
}

#[test]
fn test_upstream_cause_is_exposed_as_source() {
    let error = SummaryError::GenerationFailed(UpstreamError::Timeout);
    let source = error.source().expect("upstream cause");
    assert_eq!(source.to_string(), "request timed out");

    assert!(SummaryError::Validation("x".into()).source().is_none());
}

#[test]
fn test_error_kinds_are_distinct() {
    let kinds = [
        SummaryError::Validation("x".into()).kind(),
        SummaryError::MetadataUnavailable(UpstreamError::Timeout).kind(),
        SummaryError::TranscriptUnavailable(UpstreamError::Timeout).kind(),
        SummaryError::GenerationFailed(UpstreamError::Timeout).kind(),
        SummaryError::Config("x".into()).kind(),
    ];
    let unique: std::collections::HashSet<_> = kinds.iter().collect();
    assert_eq!(unique.len(), kinds.len());
}

#[test]
fn test_retryable_classification() {
    assert!(UpstreamError::Timeout.is_retryable());
    assert!(UpstreamError::Network("reset".into()).is_retryable());
    assert!(UpstreamError::Status { status: 503, body: String::new() }.is_retryable());
    assert!(UpstreamError::Status { status: 429, body: String::new() }.is_retryable());

    assert!(!UpstreamError::Status { status: 401, body: String::new() }.is_retryable());
    assert!(!UpstreamError::NotFound("video".into()).is_retryable());
    assert!(!UpstreamError::Malformed("json".into()).is_retryable());
    assert!(!UpstreamError::TooLarge(1_000_000).is_retryable());

    // We can't easily build a reqwest::Error directly, but we can verify
    // that the From<reqwest::Error> conversion exists
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> UpstreamError {
        UpstreamError::from(err)
    }
}
