//! Error types for Followup Assist.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Mailbox source error: {0}")]
    Source(#[from] SourceError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Structurally invalid input handed to the engine.
///
/// Missing optional fields never produce these; only an absent message
/// collection or an empty current-user identity does.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Message collection is missing")]
    MissingMessages,

    #[error("Current user identity is missing or has no usable address")]
    MissingIdentity,
}

/// Errors raised by a mailbox retrieval collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Fetch from {source_name} failed: {reason}")]
    FetchFailed { source_name: String, reason: String },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
