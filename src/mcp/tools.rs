//! MCP tool definition and handler
//!
//! Exposes one tool, `summarize_outlook_emails`, which runs the
//! token → fetch → summarize pipeline and always answers with text.

use std::error::Error as StdError;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{McpError, Result};
use crate::mcp::types::{CallToolResult, Tool};
use crate::outlook::auth::TokenProvider;
use crate::outlook::client::MessageSource;
use crate::summarizer::Summarizer;

/// Registered tool name
pub const SUMMARIZE_TOOL: &str = "summarize_outlook_emails";

/// Prefix of every failure text returned by the tool
pub const FAILURE_PREFIX: &str = "Failed to summarize emails: ";

/// Number of messages fetched when the caller does not say
pub const DEFAULT_LIMIT: i64 = 5;

/// Arguments of `summarize_outlook_emails`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SummarizeArgs {
    /// Number of emails to fetch.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Tool handler
pub struct ToolHandler {
    tokens: Arc<dyn TokenProvider>,
    messages: Arc<dyn MessageSource>,
    summarizer: Summarizer,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        messages: Arc<dyn MessageSource>,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            tokens,
            messages,
            summarizer,
        }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: SUMMARIZE_TOOL.to_string(),
            description: Some(
                "Fetches the latest Outlook emails and summarizes them using Gemini.".to_string(),
            ),
            input_schema: summarize_schema(),
        }]
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        match name {
            SUMMARIZE_TOOL => self.handle_summarize(args).await,
            _ => CallToolResult::error(McpError::UnknownTool { name: name.to_string() }.to_string()),
        }
    }

    async fn handle_summarize(&self, args: Value) -> CallToolResult {
        // Hosts omit `arguments` entirely when every parameter is defaulted
        let args = if args.is_null() { json!({}) } else { args };

        let args: SummarizeArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => {
                return CallToolResult::error(
                    McpError::InvalidArguments { message: e.to_string() }.to_string(),
                )
            }
        };

        CallToolResult::text(self.summarize_recent_messages(args.limit).await)
    }

    /// Fetch the latest `limit` emails and summarize them.
    ///
    /// Never fails: any error is logged and returned as text starting with
    /// [`FAILURE_PREFIX`].
    pub async fn summarize_recent_messages(&self, limit: i64) -> String {
        tracing::info!(limit, "Summarizing recent emails");

        match self.run_pipeline(limit).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(limit, error = %e, chain = %error_chain(&e), "Error summarizing emails");
                format!("{}{}", FAILURE_PREFIX, e)
            }
        }
    }

    async fn run_pipeline(&self, limit: i64) -> Result<String> {
        let token = self.tokens.acquire_token().await?;
        let messages = self.messages.fetch_messages(&token, limit).await?;
        drop(token);
        self.summarizer.summarize(&messages).await
    }
}

/// Render an error and all of its sources as `outer: inner: ...`
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

fn summarize_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(SummarizeArgs))
        .unwrap_or_else(|_| json!({"type": "object", "properties": {"limit": {"type": "integer"}}}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, FetchError, SummarizationError, SummarizerError};
    use crate::llm::LanguageModel;
    use crate::outlook::auth::AccessToken;
    use crate::outlook::types::{EmailAddress, Message, Recipient};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum TokenOutcome {
        Ok,
        Rejected(&'static str),
    }

    struct FakeTokens(TokenOutcome);

    #[async_trait]
    impl TokenProvider for FakeTokens {
        async fn acquire_token(&self) -> Result<AccessToken> {
            match self.0 {
                TokenOutcome::Ok => Ok(AccessToken::new("token")),
                TokenOutcome::Rejected(description) => Err(AuthError::TokenRejected {
                    description: description.to_string(),
                }
                .into()),
            }
        }
    }

    struct FakeMailbox {
        messages: Vec<Message>,
        status: Option<u16>,
        limits: Mutex<Vec<i64>>,
    }

    impl FakeMailbox {
        fn with(messages: Vec<Message>) -> Arc<Self> {
            Arc::new(Self {
                messages,
                status: None,
                limits: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                messages: Vec::new(),
                status: Some(status),
                limits: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl MessageSource for FakeMailbox {
        async fn fetch_messages(&self, token: &AccessToken, limit: i64) -> Result<Vec<Message>> {
            assert_eq!(token.secret(), "token");
            self.limits.lock().unwrap().push(limit);
            if let Some(status) = self.status {
                return Err(FetchError::Status {
                    status,
                    body: "denied".to_string(),
                }
                .into());
            }
            let take = usize::try_from(limit).unwrap_or(0);
            Ok(self.messages.iter().take(take).cloned().collect())
        }
    }

    struct FakeModel {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeModel {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl LanguageModel for FakeModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SummarizationError::EmptyCompletion.into());
            }
            Ok("summary".to_string())
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    fn message(sender: &str, subject: &str) -> Message {
        Message {
            from: Some(Recipient {
                email_address: EmailAddress {
                    name: sender.to_string(),
                    address: String::new(),
                },
            }),
            subject: subject.to_string(),
            ..Default::default()
        }
    }

    fn handler(
        tokens: TokenOutcome,
        mailbox: Arc<FakeMailbox>,
        model: Arc<FakeModel>,
    ) -> ToolHandler {
        ToolHandler::new(
            Arc::new(FakeTokens(tokens)),
            mailbox,
            Summarizer::new(model),
        )
    }

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0] {
            crate::mcp::types::ToolResultContent::Text { text } => text,
        }
    }

    #[test]
    fn test_list_tools() {
        let handler = handler(TokenOutcome::Ok, FakeMailbox::with(vec![]), FakeModel::new(false));
        let tools = handler.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, SUMMARIZE_TOOL);
        assert_eq!(tools[0].input_schema["type"], "object");
        assert_eq!(tools[0].input_schema["properties"]["limit"]["type"], "integer");
        assert_eq!(tools[0].input_schema["properties"]["limit"]["default"], 5);
    }

    #[tokio::test]
    async fn test_default_limit_when_arguments_missing() {
        let mailbox = FakeMailbox::with(vec![]);
        let handler = handler(TokenOutcome::Ok, mailbox.clone(), FakeModel::new(false));

        handler.call_tool(SUMMARIZE_TOOL, Value::Null).await;
        handler.call_tool(SUMMARIZE_TOOL, json!({})).await;
        assert_eq!(*mailbox.limits.lock().unwrap(), vec![5, 5]);
    }

    #[tokio::test]
    async fn test_limit_passed_through_unchanged() {
        let mailbox = FakeMailbox::with(vec![]);
        let handler = handler(TokenOutcome::Ok, mailbox.clone(), FakeModel::new(false));

        handler.call_tool(SUMMARIZE_TOOL, json!({"limit": -3})).await;
        handler.call_tool(SUMMARIZE_TOOL, json!({"limit": 100000})).await;
        assert_eq!(*mailbox.limits.lock().unwrap(), vec![-3, 100000]);
    }

    #[tokio::test]
    async fn test_success_returns_model_text() {
        let model = FakeModel::new(false);
        let handler = handler(
            TokenOutcome::Ok,
            FakeMailbox::with(vec![message("Alice", "Meeting tomorrow")]),
            model.clone(),
        );

        let result = handler.call_tool(SUMMARIZE_TOOL, json!({"limit": 1})).await;
        assert!(!result.is_error);
        assert_eq!(result_text(&result), "summary");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_becomes_text() {
        let model = FakeModel::new(false);
        let mailbox = FakeMailbox::with(vec![message("Alice", "Meeting tomorrow")]);
        let handler = handler(
            TokenOutcome::Rejected("AADSTS700016: Application not found"),
            mailbox.clone(),
            model.clone(),
        );

        let text = handler.summarize_recent_messages(5).await;
        assert!(text.starts_with("Failed to summarize emails:"));
        assert!(text.contains("AADSTS700016: Application not found"));
        assert!(mailbox.limits.lock().unwrap().is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_contains_status() {
        let model = FakeModel::new(false);
        let handler = handler(TokenOutcome::Ok, FakeMailbox::failing(401), model.clone());

        let text = handler.summarize_recent_messages(5).await;
        assert!(text.starts_with(FAILURE_PREFIX));
        assert!(text.contains("401"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_returns_no_partial_result() {
        let handler = handler(
            TokenOutcome::Ok,
            FakeMailbox::with(vec![message("Bob", "Invoice due")]),
            FakeModel::new(true),
        );

        let result = handler.call_tool(SUMMARIZE_TOOL, json!({})).await;
        let text = result_text(&result);
        assert!(!result.is_error);
        assert!(text.starts_with(FAILURE_PREFIX));
        assert!(!text.contains("Invoice due"));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let handler = handler(TokenOutcome::Ok, FakeMailbox::with(vec![]), FakeModel::new(false));
        let result = handler.call_tool(SUMMARIZE_TOOL, json!({"limit": "five"})).await;
        assert!(result.is_error);
        assert!(result_text(&result).contains("Invalid tool arguments"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let handler = handler(TokenOutcome::Ok, FakeMailbox::with(vec![]), FakeModel::new(false));
        let result = handler.call_tool("send_email", json!({})).await;
        assert!(result.is_error);
        assert!(result_text(&result).contains("Unknown tool: send_email"));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = SummarizerError::from(io);
        assert_eq!(
            error_chain(&err),
            "I/O error: connection refused: connection refused"
        );
    }
}
