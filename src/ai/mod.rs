//! Prompt construction and the hosted model client.

pub mod client;
pub mod prompt_builder;

pub use client::{LlmClient, estimate_tokens, extract_output_text};
pub use prompt_builder::build_prompt;
