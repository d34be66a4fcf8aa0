//! Deterministic prompt construction for summaries.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};

use crate::core::models::LengthMode;

/// Directives that follow the length instruction in every prompt.
pub const SUMMARY_DIRECTIVES: [&str; 3] = [
    "Preserve the key ideas, concepts, and conclusions.",
    "Preserve the original tone of the content.",
    "Produce a coherent, readable summary.",
];

/// Natural-language length instruction for each mode.
#[must_use]
pub fn length_instruction(mode: LengthMode) -> &'static str {
    match mode {
        LengthMode::Short => "very concise, 2-3 sentences",
        LengthMode::Medium => "comprehensive, 4-6 sentences",
        LengthMode::Long => "detailed, covering all main points in approximately 8-10 sentences",
    }
}

/// Length instruction, then the fixed directives, then the content verbatim.
#[must_use]
pub fn compose_prompt(content: &str, mode: LengthMode) -> String {
    let directives = SUMMARY_DIRECTIVES
        .iter()
        .map(|d| format!("- {d}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Summarize the following content. The summary should be {}.\n{}\n\nContent:\n{}",
        length_instruction(mode),
        directives,
        content
    )
}

/// Wraps the composed prompt as the single user message sent to the model.
#[must_use]
pub fn build_prompt(content: &str, mode: LengthMode) -> Vec<ChatCompletionMessage> {
    vec![ChatCompletionMessage {
        role: MessageRole::user,
        content: Content::Text(compose_prompt(content, mode)),
        name: None,
        tool_calls: None,
        tool_call_id: None,
    }]
}
