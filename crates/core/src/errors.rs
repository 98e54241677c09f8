//! Error types for prompt-manager
//!
//! One error enum covers the three domain failures a prompt operation can
//! produce (validation, missing row, store failure) plus the ambient
//! failures of the command, RPC and server layers. Every variant has a
//! user-facing message suitable for inline display in a dialog.

use thiserror::Error;

/// Result type alias for prompt-manager operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Message shown when a create or update is submitted with an empty field
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Main error type for prompt-manager
#[derive(Debug, Error)]
pub enum PromptError {
    /// A required text field was empty after trimming
    #[error("Validation error: {0}")]
    Validation(String),

    /// No prompt exists with the given id
    #[error("Prompt {0} not found")]
    NotFound(i64),

    /// Persistence failure, including an unreachable store or a timeout
    #[error("Store error: {0}")]
    Store(String),

    /// Command not found in registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid command arguments
    #[error("Invalid arguments for command '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Client registry error
    #[error("Hub error: {0}")]
    HubError(String),

    /// Generic error (catch-all)
    #[error("{0}")]
    Other(String),
}

impl From<sqlx::Error> for PromptError {
    fn from(err: sqlx::Error) -> Self {
        PromptError::Store(err.to_string())
    }
}

impl From<anyhow::Error> for PromptError {
    fn from(err: anyhow::Error) -> Self {
        PromptError::Other(err.to_string())
    }
}

impl From<String> for PromptError {
    fn from(err: String) -> Self {
        PromptError::Other(err)
    }
}

impl From<&str> for PromptError {
    fn from(err: &str) -> Self {
        PromptError::Other(err.to_string())
    }
}

impl PromptError {
    /// Get user-friendly error message for inline display
    pub fn user_message(&self) -> String {
        match self {
            PromptError::Validation(msg) => msg.clone(),
            PromptError::NotFound(id) => format!("Prompt {} no longer exists", id),
            PromptError::Store(msg) => format!("Could not reach the prompt store: {}", msg),
            PromptError::CommandNotFound(cmd) => {
                format!("Command '{}' not found. Call 'ping' to check the connection.", cmd)
            },
            PromptError::InvalidArgs { command, reason } => {
                format!("Invalid arguments for '{}': {}", command, reason)
            },
            _ => self.to_string(),
        }
    }

    /// Get error category for logging/telemetry
    pub fn category(&self) -> &'static str {
        match self {
            PromptError::Validation(_) => "validation",
            PromptError::NotFound(_) => "not_found",
            PromptError::Store(_) => "store",
            PromptError::CommandNotFound(_) => "command",
            PromptError::InvalidArgs { .. } => "arguments",
            PromptError::SerdeError(_) => "serialization",
            PromptError::IoError(_) => "io",
            PromptError::ConfigError(_) => "config",
            PromptError::HubError(_) => "hub",
            PromptError::Other(_) => "other",
        }
    }

    /// Map to a JSON-RPC 2.0 error code
    ///
    /// Standard codes for protocol-level failures, application codes in the
    /// -32000..-32099 server range for domain failures.
    pub fn to_jsonrpc_code(&self) -> i32 {
        match self {
            PromptError::SerdeError(_) => -32700,
            PromptError::CommandNotFound(_) => -32601,
            PromptError::InvalidArgs { .. } | PromptError::Validation(_) => -32602,
            PromptError::NotFound(_) => -32004,
            PromptError::Store(_) => -32010,
            _ => -32603,
        }
    }

    /// Shorthand for the empty-field validation failure
    pub fn fields_required() -> Self {
        PromptError::Validation(ALL_FIELDS_REQUIRED.to_string())
    }
}
