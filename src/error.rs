//! Error types for the Outlook summary server
//!
//! One enum per pipeline stage, wrapped by [`SummarizerError`].

use thiserror::Error;

/// Main error type for the Outlook summary server
#[derive(Error, Debug)]
pub enum SummarizerError {
    /// Identity provider errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Mail API errors
    #[error("Graph API error: {0}")]
    Fetch(#[from] FetchError),

    /// Language model errors
    #[error("Summarization error: {0}")]
    Summarization(#[from] SummarizationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Identity provider errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to obtain token: {description}")]
    TokenRejected { description: String },

    #[error("Unexpected token endpoint response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Mail API errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("Malformed message list: {message}")]
    MalformedResponse { message: String },
}

/// Language model errors
#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("Model request failed ({status}): {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Model returned no candidates{}", blocked_suffix(.reason))]
    NoCandidates { reason: Option<String> },

    #[error("Model returned a candidate without text")]
    EmptyCompletion,
}

fn blocked_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (blocked: {})", r))
        .unwrap_or_default()
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, SummarizerError>;
