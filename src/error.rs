//! Error types for the Clino authentication and provider configuration flows.

use crate::merge::Mode;
use std::time::Duration;
use thiserror::Error;

/// Authentication flow errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to subscribe to auth updates: {0}")]
    Subscribe(String),

    #[error("Auth status subscription closed{}", .0.as_ref().map(|r| format!(": {}", r)).unwrap_or_default())]
    SubscriptionClosed(Option<String>),

    #[error("Authentication timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("Account service error: {0}")]
    Transport(String),
}

impl AuthError {
    /// True when the wait ran out of time rather than losing its subscription.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AuthError::Timeout(_))
    }
}

/// Input validation errors. Raised before any state is changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("provider is required. Use --provider or -p flag")]
    MissingProvider,

    #[error("API key is required for {0} provider. Use --apikey or -k flag")]
    MissingApiKey(String),

    #[error("model ID is required. Use --modelid or -m flag")]
    MissingModelId,

    #[error("model ID cannot be empty")]
    EmptyModelId,

    #[error("invalid provider '{0}'. Supported providers: {1}")]
    UnsupportedProvider(String, String),

    #[error("provider '{0}' is not supported for quick setup. Please use interactive setup: clino auth")]
    QuickSetupUnsupported(String),

    #[error("bedrock provider is not supported for quick setup due to complex authentication requirements. Please use interactive setup: clino auth")]
    BedrockQuickSetup,

    #[error("base URL is only supported for OpenAI and OpenAI-compatible providers")]
    BaseUrlNotSupported,
}

/// Configuration errors: CLI settings and provider state persistence
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to apply provider update to {mode} mode: {message}")]
    Apply { mode: Mode, message: String },

    #[error("Provider update applied to {succeeded} mode only; {failed} mode failed: {message}")]
    Partial {
        succeeded: Mode,
        failed: Mode,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Errors raised by a backend collaborator
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Transport(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            ServiceError::Transport(format!("Connection error: {}", err))
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(format!("HTTP error: {}", err))
        }
    }
}

/// Top-level command error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to get user input: {0}")]
    Prompt(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("{0}")]
    Catalog(String),

    #[error("{0}")]
    Account(String),
}
