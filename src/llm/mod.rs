//! Language model abstraction

use async_trait::async_trait;

use crate::error::Result;

pub mod gemini;

pub use gemini::GeminiClient;

/// Single-prompt text generation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}
