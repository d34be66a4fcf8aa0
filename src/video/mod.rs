//! Video platform lookups

pub mod client;
pub mod id;
pub mod transcript;

pub use client::VideoClient;
pub use id::parse_video_id;
