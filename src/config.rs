//! Configuration for the Outlook summary server
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file by the binary). Required values are not validated here; a missing one
//! surfaces as an authentication or model failure on first use.

use secrecy::SecretString;

/// Configuration for the Outlook summary server
#[derive(Debug, Clone)]
pub struct Config {
    /// Entra ID tenant
    pub tenant_id: String,

    /// Application (client) ID
    pub client_id: String,

    /// Client secret for the client-credentials grant
    pub client_secret: SecretString,

    /// Scopes requested for the Graph token
    pub scopes: Vec<String>,

    /// Mailbox to read; `None` reads `/me`
    pub mailbox: Option<String>,

    /// Gemini API key
    pub model_api_key: SecretString,

    /// Gemini model identifier, e.g. `gemini-1.5-flash`
    pub model: String,

    /// Identity provider host
    pub authority_host: String,

    /// Graph API base URL
    pub graph_base_url: String,

    /// Gemini API base URL
    pub model_base_url: String,
}

impl Config {
    /// Build a configuration from the process environment
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        let var_or = |name: &str, default: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            tenant_id: var(env::TENANT_ID),
            client_id: var(env::CLIENT_ID),
            client_secret: SecretString::new(var(env::CLIENT_SECRET).into()),
            scopes: vec![graph::DEFAULT_SCOPE.to_string()],
            mailbox: std::env::var(env::MAILBOX).ok().filter(|v| !v.is_empty()),
            model_api_key: SecretString::new(var(env::GOOGLE_API_KEY).into()),
            model: var(env::GEMINI_MODEL),
            authority_host: var_or(env::AUTHORITY_HOST, identity::AUTHORITY_HOST),
            graph_base_url: var_or(env::GRAPH_API_BASE_URL, graph::API_BASE_URL),
            model_base_url: var_or(env::GEMINI_API_BASE_URL, gemini::API_BASE_URL),
        }
    }

    /// Names of required environment variables that resolved to empty values
    pub fn missing_fields(&self) -> Vec<&'static str> {
        use secrecy::ExposeSecret;

        let mut missing = Vec::new();
        if self.tenant_id.is_empty() {
            missing.push(env::TENANT_ID);
        }
        if self.client_id.is_empty() {
            missing.push(env::CLIENT_ID);
        }
        if self.client_secret.expose_secret().is_empty() {
            missing.push(env::CLIENT_SECRET);
        }
        if self.model_api_key.expose_secret().is_empty() {
            missing.push(env::GOOGLE_API_KEY);
        }
        if self.model.is_empty() {
            missing.push(env::GEMINI_MODEL);
        }
        missing
    }
}

/// Environment variable names
pub mod env {
    pub const TENANT_ID: &str = "TENANT_ID";
    pub const CLIENT_ID: &str = "CLIENT_ID";
    pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    pub const MAILBOX: &str = "OUTLOOK_MAILBOX";
    pub const AUTHORITY_HOST: &str = "AUTHORITY_HOST";
    pub const GRAPH_API_BASE_URL: &str = "GRAPH_API_BASE_URL";
    pub const GEMINI_API_BASE_URL: &str = "GEMINI_API_BASE_URL";
}

/// Entra ID constants
pub mod identity {
    /// Public cloud authority host
    pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
}

/// Microsoft Graph constants
pub mod graph {
    /// Base URL for Graph API
    pub const API_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

    /// Application permission scope covering every granted Graph permission
    pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

    /// Field projection for the message list
    pub const MESSAGE_FIELDS: &str = "subject,bodyPreview,receivedDateTime,from";
}

/// Gemini constants
pub mod gemini {
    /// Base URL for the Generative Language API
    pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
}
