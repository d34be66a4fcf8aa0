//! recap - summarizes text, transcripts and videos with a hosted language model.
//!
//! A request names its source (raw text, a raw transcript, or a video id).
//! Video sources are resolved into a transcript plus metadata, the resolved
//! text is summarized at the requested length, and the result can be kept in
//! an in-memory history.
//!
//! # Architecture
//!
//! The system uses:
//! - axum for the HTTP surface
//! - the `OpenAI` Responses API for generation
//! - the YouTube Data API and public caption tracks for video lookups
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use recap::core::config::AppConfig;
//! use recap::core::models::{ContentRequest, LengthMode};
//! use recap::features::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     recap::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let pipeline = Pipeline::from_config(&config);
//!
//!     let request = ContentRequest::video(Some("https://youtu.be/dQw4w9WgXcQ"))?;
//!     let (outcome, item) = pipeline
//!         .summarize_and_save(&request, LengthMode::Short)
//!         .await?;
//!
//!     println!("{} ({})", outcome.summary, item.id);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod features;
pub mod traits;
pub mod utils;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use errors::{SummaryError, UpstreamError};

/// Configure structured JSON logging.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`. Safe to call more
/// than once; only the first call installs a subscriber.
///
/// # Example
///
/// ```
/// recap::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
