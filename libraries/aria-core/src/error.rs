/// Core error types for Aria
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `PlayerError`
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Terminal fault of a load attempt
///
/// Any of these drives the session into the failed state. Cancellation is a
/// distinct variant so callers can tell a deliberate abort from a broken asset.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerError {
    /// One of the requested asset keys did not load
    #[error("The media failed to load the key \"{key}\" because of error: {message}")]
    FailedLoadKey { key: String, message: String },

    /// Asset loading was cancelled before it completed
    #[error("The media loading is cancelled")]
    LoadingCancelled,

    /// The asset is not playable or carries protected content
    #[error("Item cannot be played, asset.isPlayable is false or asset.hasProtectedContent is true")]
    ContentsUnavailable,

    /// The item never became ready to play
    #[error("The media loading is failed")]
    LoadingFailed,
}

impl PlayerError {
    /// Build a key-loading failure from any displayable engine error
    pub fn failed_load_key(key: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::FailedLoadKey {
            key: key.into(),
            message: error.to_string(),
        }
    }

    /// Whether this is a cancellation rather than a real failure
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::LoadingCancelled)
    }
}

/// Why a command was refused by the active state
///
/// Not a fault: the session stays where it is and the reason is reported to
/// the delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableActionReason {
    AlreadyPaused,
    AlreadyPlaying,
    AlreadyStopped,
    AlreadyTryingToPlay,
    SeekPositionNotAvailable,
    LoadMediaFirst,
    WaitingForEstablishedNetwork,
    WaitTillMediaLoaded,
}

impl UnavailableActionReason {
    /// Human readable description
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyPaused => "Already Paused",
            Self::AlreadyPlaying => "Already Playing",
            Self::AlreadyStopped => "Already Stopped",
            Self::AlreadyTryingToPlay => "Wait a moment, already trying to play",
            Self::SeekPositionNotAvailable => "Seek position not available",
            Self::LoadMediaFirst => "Load a media first",
            Self::WaitingForEstablishedNetwork => "Wait network to be established before",
            Self::WaitTillMediaLoaded => "Wait media to be loaded before",
        }
    }
}

impl std::fmt::Display for UnavailableActionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_load_key_message_names_the_key() {
        let error = PlayerError::failed_load_key("duration", "timed out");
        assert_eq!(
            error.to_string(),
            "The media failed to load the key \"duration\" because of error: timed out"
        );
    }

    #[test]
    fn only_cancellation_is_cancellation() {
        assert!(PlayerError::LoadingCancelled.is_cancellation());
        assert!(!PlayerError::LoadingFailed.is_cancellation());
        assert!(!PlayerError::ContentsUnavailable.is_cancellation());
    }

    #[test]
    fn reason_descriptions() {
        assert_eq!(UnavailableActionReason::AlreadyPaused.to_string(), "Already Paused");
        assert_eq!(
            UnavailableActionReason::AlreadyTryingToPlay.to_string(),
            "Wait a moment, already trying to play"
        );
        assert_eq!(UnavailableActionReason::LoadMediaFirst.to_string(), "Load a media first");
    }

    #[test]
    fn error_serializes_with_kind_tag() {
        let json = serde_json::to_string(&PlayerError::LoadingFailed).unwrap();
        assert_eq!(json, r#"{"kind":"loading_failed"}"#);

        let back: PlayerError =
            serde_json::from_str(r#"{"kind":"failed_load_key","key":"playable","message":"x"}"#)
                .unwrap();
        assert_eq!(back, PlayerError::failed_load_key("playable", "x"));
    }
}
