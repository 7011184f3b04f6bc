//! Session configuration
//!
//! Defaults mirror a typical video player: half-second time ticks, a ten
//! second buffering budget polled every 300ms, nanosecond timescale.
//! [`Configuration::load`] layers an optional file and `ARIA_*` environment
//! variables on top of the defaults.

use crate::error::{Result, SessionError};
use aria_core::MediaTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Interval of periodic time reports (default: 0.5s)
    pub periodic_playing_time_secs: f64,

    /// Timescale used when converting seconds to media time (default: 1e9)
    pub preferred_timescale: u32,

    /// Asset keys the engine must load before an item is created
    pub item_loaded_asset_keys: Vec<String>,

    /// How long buffering may take before giving up (default: 10s)
    pub buffer_observing_timeout_secs: f64,

    /// Poll interval of the buffering timeout (default: 0.3s)
    pub buffer_observing_interval_secs: f64,

    /// Audio session applied when the session is built
    pub audio_session: AudioSessionPolicy,

    /// Publish "now playing" metadata and playback info
    pub now_playing_enabled: bool,

    /// Accept commands from remote controls
    pub remote_commands_enabled: bool,

    /// Resume when an interruption that paused playback ends
    pub resume_after_interruption: bool,

    /// Skip interval of the skip-forward/backward remote commands (default: 15s)
    pub skip_interval_secs: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            periodic_playing_time_secs: 0.5,
            preferred_timescale: MediaTime::DEFAULT_TIMESCALE,
            item_loaded_asset_keys: [
                "playable",
                "duration",
                "commonMetadata",
                "metadata",
                "availableMetadataFormats",
                "lyrics",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            buffer_observing_timeout_secs: 10.0,
            buffer_observing_interval_secs: 0.3,
            audio_session: AudioSessionPolicy::default(),
            now_playing_enabled: true,
            remote_commands_enabled: true,
            resume_after_interruption: true,
            skip_interval_secs: 15.0,
        }
    }
}

impl Configuration {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// Environment variables use the `ARIA_` prefix and `__` for nesting,
    /// e.g. `ARIA_AUDIO_SESSION__MODE=spoken_audio`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(true));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ARIA")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("item_loaded_asset_keys")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("periodic_playing_time_secs", self.periodic_playing_time_secs),
            ("buffer_observing_timeout_secs", self.buffer_observing_timeout_secs),
            ("buffer_observing_interval_secs", self.buffer_observing_interval_secs),
            ("skip_interval_secs", self.skip_interval_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SessionError::Config(format!(
                    "{name} must be a positive number of seconds, got {value}"
                )));
            }
        }

        if self.preferred_timescale == 0 {
            return Err(SessionError::Config(
                "preferred_timescale must be non-zero".to_string(),
            ));
        }

        if self.item_loaded_asset_keys.is_empty() {
            return Err(SessionError::Config(
                "item_loaded_asset_keys must name at least one key".to_string(),
            ));
        }

        Ok(())
    }

    pub fn periodic_playing_interval(&self) -> Duration {
        seconds(self.periodic_playing_time_secs)
    }

    pub fn buffer_observing_timeout(&self) -> Duration {
        seconds(self.buffer_observing_timeout_secs)
    }

    pub fn buffer_observing_interval(&self) -> Duration {
        seconds(self.buffer_observing_interval_secs)
    }

    /// Seconds to media time at the preferred timescale
    pub fn media_time(&self, seconds: f64) -> MediaTime {
        MediaTime::from_seconds(seconds, self.preferred_timescale)
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Audio session category requested from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSessionCategory {
    Ambient,
    SoloAmbient,
    #[default]
    Playback,
    Record,
    PlayAndRecord,
    MultiRoute,
}

/// Audio session mode requested from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSessionMode {
    Default,
    #[default]
    MoviePlayback,
    SpokenAudio,
    VideoChat,
    VoiceChat,
    Measurement,
}

/// Audio session category options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSessionOption {
    MixWithOthers,
    DuckOthers,
    AllowBluetooth,
    AllowAirPlay,
    DefaultToSpeaker,
}

/// Category, mode and options applied to the platform audio session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSessionPolicy {
    pub category: AudioSessionCategory,
    pub mode: AudioSessionMode,
    pub options: Vec<AudioSessionOption>,
}
