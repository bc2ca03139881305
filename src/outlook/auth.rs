//! Client-credentials authentication against Entra ID
//!
//! Every call requests a fresh token. Nothing is cached or persisted.

use std::fmt;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AuthError, Result};

/// Bearer token for the Graph API
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self(SecretString::new(token.into_boxed_str()))
    }

    /// Raw token for the `Authorization` header
    pub fn secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Source of bearer tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a token for the configured scope
    async fn acquire_token(&self) -> Result<AccessToken>;
}

/// Token endpoint response; either a token or an error description
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,

    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    error_description: Option<String>,
}

/// Confidential client using the OAuth 2.0 client-credentials grant
pub struct ClientCredentialsProvider {
    http_client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    scope: String,
}

impl ClientCredentialsProvider {
    /// Create a provider for the configured tenant and scopes
    pub fn new(config: &Config, http_client: reqwest::Client) -> Self {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            config.authority_host.trim_end_matches('/'),
            urlencoding::encode(&config.tenant_id)
        );

        Self {
            http_client,
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scopes.join(" "),
        }
    }

    /// Token endpoint URL
    pub(crate) fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn acquire_token(&self) -> Result<AccessToken> {
        tracing::debug!(url = %self.token_url, scope = %self.scope, "Requesting access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let token = token_from_body(status.as_u16(), &text)?;
        tracing::debug!("Access token acquired");
        Ok(token)
    }
}

/// Interpret a token endpoint body regardless of HTTP status
fn token_from_body(status: u16, body: &str) -> std::result::Result<AccessToken, AuthError> {
    let parsed: TokenResponse =
        serde_json::from_str(body).map_err(|_| AuthError::UnexpectedResponse {
            status,
            body: body.to_string(),
        })?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
        _ => Err(AuthError::TokenRejected {
            description: parsed
                .error_description
                .or(parsed.error)
                .unwrap_or_else(|| format!("no access token in response (HTTP {})", status)),
        }),
    }
}
