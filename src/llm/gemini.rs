//! Gemini implementation
//!
//! Uses the Generative Language REST API (`models/{model}:generateContent`).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::LanguageModel;
use crate::config::Config;
use crate::error::{Result, SummarizationError};

/// Gemini generateContent request
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,

    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Gemini client
pub struct GeminiClient {
    model_name: String,
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            model_name: config.model.clone(),
            base_url: config.model_base_url.trim_end_matches('/').to_string(),
            api_key: config.model_api_key.clone(),
            client,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_name)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model_name, prompt_len = prompt.len(), "Gemini: generating content");

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SummarizationError::RequestFailed {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let body: GenerateContentResponse = response.json().await?;
        Ok(completion_text(body)?)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Concatenated text of the first candidate
fn completion_text(
    response: GenerateContentResponse,
) -> std::result::Result<String, SummarizationError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(SummarizationError::NoCandidates {
            reason: response.prompt_feedback.and_then(|f| f.block_reason),
        });
    };

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        return Err(SummarizationError::EmptyCompletion);
    }
    Ok(texts.concat())
}
