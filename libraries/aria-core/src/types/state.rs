/// Session state names
use serde::{Deserialize, Serialize};

/// The externally visible state of a playback session
///
/// Exactly one is active at a time; it is always the declared state of the
/// session's active controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Initialization,
    Loading,
    Loaded,
    Buffering,
    Playing,
    Paused,
    Stopped,
    WaitingForNetwork,
    Failed,
}

impl PlaybackState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Buffering => "buffering",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::WaitingForNetwork => "waiting_for_network",
            Self::Failed => "failed",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "initialization" => Some(Self::Initialization),
            "loading" => Some(Self::Loading),
            "loaded" => Some(Self::Loaded),
            "buffering" => Some(Self::Buffering),
            "playing" => Some(Self::Playing),
            "paused" => Some(Self::Paused),
            "stopped" => Some(Self::Stopped),
            "waiting_for_network" => Some(Self::WaitingForNetwork),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// States in which the requested playback rate is pushed to the engine
    #[must_use]
    pub fn applies_rate(&self) -> bool {
        matches!(self, Self::Buffering | Self::Playing | Self::WaitingForNetwork)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
