//! Prompt construction and summarization
//!
//! Turns a batch of messages into one prompt and hands it to a
//! [`LanguageModel`].

use std::sync::Arc;

use crate::error::Result;
use crate::llm::LanguageModel;
use crate::outlook::types::Message;

/// Returned for an empty batch; the model is not called
pub const NO_MESSAGES: &str = "No emails to summarize.";

/// Instructions placed before the rendered messages
pub const PREAMBLE: &str = "You are an assistant that summarizes emails. Given the following list of emails, \
summarize the key topics, senders, and dates.\n\n";

/// Summarizes message batches with a language model
pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Summarize `messages`, returning the model output verbatim
    pub async fn summarize(&self, messages: &[Message]) -> Result<String> {
        if messages.is_empty() {
            return Ok(NO_MESSAGES.to_string());
        }

        let prompt = build_prompt(messages);
        tracing::debug!(
            model = self.model.model_name(),
            messages = messages.len(),
            "Sending summarization prompt"
        );
        self.model.generate(&prompt).await
    }
}

/// Render one message as a three-line block
pub fn render_message(message: &Message) -> String {
    format!(
        "From: {}\nSubject: {}\nBody: {}",
        message.sender(),
        message.subject,
        message.body_preview
    )
}

/// Build the full prompt: preamble, then blocks separated by a blank line
pub fn build_prompt(messages: &[Message]) -> String {
    let blocks = messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}{}", PREAMBLE, blocks)
}
