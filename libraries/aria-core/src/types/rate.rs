/// Playback rate presets
use serde::{Deserialize, Serialize};

/// Requested playback speed
///
/// Eight named presets from a quarter speed up to double speed, plus any
/// custom value. Two rates are equal when their numeric values are equal,
/// so `Custom(1.0) == Normal`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackRate {
    Slowest,
    Slower,
    Slow,
    #[default]
    Normal,
    Fast,
    Faster,
    Fastest,
    Superfast,
    Custom(f32),
}

impl PlaybackRate {
    /// Named presets in cycling order
    pub const PRESETS: [Self; 8] = [
        Self::Slowest,
        Self::Slower,
        Self::Slow,
        Self::Normal,
        Self::Fast,
        Self::Faster,
        Self::Fastest,
        Self::Superfast,
    ];

    /// Numeric rate (1.0 is real time, negative is reverse)
    #[must_use]
    pub fn value(self) -> f32 {
        match self {
            Self::Slowest => 0.25,
            Self::Slower => 0.5,
            Self::Slow => 0.75,
            Self::Normal => 1.0,
            Self::Fast => 1.25,
            Self::Faster => 1.5,
            Self::Fastest => 1.75,
            Self::Superfast => 2.0,
            Self::Custom(value) => value,
        }
    }

    /// Display name of the preset
    #[must_use]
    pub fn title(self) -> String {
        let title = match self {
            Self::Slowest => "Slowest",
            Self::Slower => "Slower",
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Faster => "Faster",
            Self::Fastest => "Fastest",
            Self::Superfast => "Super Fast",
            Self::Custom(value) => return format!("{value}x"),
        };
        title.to_string()
    }

    /// Multiplier label, e.g. `1.5x`
    #[must_use]
    pub fn rate_title(self) -> String {
        format!("{}x", self.value())
    }

    /// Next preset, wrapping from the fastest to the slowest
    ///
    /// A custom rate restarts the cycle at normal speed.
    #[must_use]
    pub fn next(self) -> Self {
        match Self::PRESETS.iter().position(|p| p.is_same_preset(self)) {
            Some(index) => Self::PRESETS[(index + 1) % Self::PRESETS.len()],
            None => Self::Normal,
        }
    }

    /// Whether this is a named preset rather than a custom value
    #[must_use]
    pub fn is_preset(self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    fn is_same_preset(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

impl From<f32> for PlaybackRate {
    fn from(value: f32) -> Self {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.value() == value)
            .unwrap_or(Self::Custom(value))
    }
}

impl PartialEq for PlaybackRate {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl std::fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
