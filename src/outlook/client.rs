//! Microsoft Graph mail client
//!
//! Fetches a single page of recent messages with a bearer token.

use async_trait::async_trait;

use crate::config::{graph::MESSAGE_FIELDS, Config};
use crate::error::{FetchError, Result};
use crate::outlook::auth::AccessToken;
use crate::outlook::types::{parse_message_list, Message};

/// Source of recent mailbox messages
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch at most `limit` messages, most recent first.
    ///
    /// `limit` is forwarded as `$top` unchanged; the provider decides what to
    /// do with zero, negative or oversized values.
    async fn fetch_messages(&self, token: &AccessToken, limit: i64) -> Result<Vec<Message>>;
}

/// Graph API client
pub struct OutlookClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Collection URL for the mailbox's messages
    messages_url: String,
}

impl OutlookClient {
    /// Create a new Graph client
    pub fn new(config: &Config, http_client: reqwest::Client) -> Self {
        let base = config.graph_base_url.trim_end_matches('/');
        let messages_url = match &config.mailbox {
            Some(mailbox) => format!("{}/users/{}/messages", base, urlencoding::encode(mailbox)),
            None => format!("{}/me/messages", base),
        };

        Self {
            http_client,
            messages_url,
        }
    }

    /// Collection URL for messages
    pub(crate) fn messages_url(&self) -> &str {
        &self.messages_url
    }
}

#[async_trait]
impl MessageSource for OutlookClient {
    async fn fetch_messages(&self, token: &AccessToken, limit: i64) -> Result<Vec<Message>> {
        let top = limit.to_string();
        let params = [("$top", top.as_str()), ("$select", MESSAGE_FIELDS)];

        let response = self
            .http_client
            .get(&self.messages_url)
            .bearer_auth(token.secret())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != reqwest::StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "Graph rejected message list request");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let mut messages = parse_message_list(&text)?;
        if let Ok(max) = usize::try_from(limit) {
            if max > 0 && messages.len() > max {
                tracing::debug!(returned = messages.len(), limit, "Graph ignored $top, truncating");
                messages.truncate(max);
            }
        }
        tracing::debug!(count = messages.len(), limit, "Fetched messages");
        Ok(messages)
    }
}
