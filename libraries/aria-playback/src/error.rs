//! Error types for session management

use thiserror::Error;

/// Session errors
///
/// Commands rejected by the active state are not errors; they are reported
/// through [`crate::SessionDelegate::unavailable_action`]. These variants
/// cover the crate's own plumbing.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration sources could not be read or merged
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// The session owning the mailbox has been dropped
    #[error("Session mailbox disconnected")]
    Disconnected,
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
