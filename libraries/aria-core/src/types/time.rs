/// Rational media time and time ranges
use serde::{Deserialize, Serialize};

/// A point on the media timeline
///
/// Times are rational (`value / timescale` seconds) so they survive round
/// trips through engines that count in samples or nanoseconds. Live streams
/// report an `Indefinite` duration; engines without a current item report
/// `Invalid` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaTime {
    /// A finite time
    Numeric { value: i64, timescale: u32 },
    /// Unbounded (live content)
    Indefinite,
    /// Unknown or not applicable
    #[default]
    Invalid,
}

impl MediaTime {
    /// Nanosecond precision, matches the default configuration
    pub const DEFAULT_TIMESCALE: u32 = 1_000_000_000;

    /// The start of the timeline
    pub const ZERO: Self = Self::Numeric {
        value: 0,
        timescale: 1,
    };

    /// Build a numeric time; a zero timescale yields `Invalid`
    #[must_use]
    pub fn new(value: i64, timescale: u32) -> Self {
        if timescale == 0 {
            return Self::Invalid;
        }
        Self::Numeric { value, timescale }
    }

    /// Convert seconds using the given timescale
    ///
    /// Non-finite input (NaN, ±∞) becomes `Invalid`.
    #[must_use]
    pub fn from_seconds(seconds: f64, timescale: u32) -> Self {
        if !seconds.is_finite() || timescale == 0 {
            return Self::Invalid;
        }
        let value = (seconds * f64::from(timescale)).round() as i64;
        Self::Numeric { value, timescale }
    }

    /// Seconds, if the time is numeric
    #[must_use]
    pub fn seconds(&self) -> Option<f64> {
        match *self {
            Self::Numeric { value, timescale } => Some(value as f64 / f64::from(timescale)),
            Self::Indefinite | Self::Invalid => None,
        }
    }

    /// Seconds, falling back to zero for non-numeric times
    #[must_use]
    pub fn seconds_or_zero(&self) -> f64 {
        self.seconds().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. })
    }

    #[must_use]
    pub fn is_indefinite(&self) -> bool {
        matches!(self, Self::Indefinite)
    }
}

impl std::fmt::Display for MediaTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.seconds() {
            Some(seconds) => write!(f, "{seconds:.3}s"),
            None if self.is_indefinite() => write!(f, "indefinite"),
            None => write!(f, "invalid"),
        }
    }
}

/// A span of the timeline, `[start, start + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: MediaTime,
    pub duration: MediaTime,
}

impl TimeRange {
    pub fn new(start: MediaTime, duration: MediaTime) -> Self {
        Self { start, duration }
    }

    /// Range between two second offsets
    #[must_use]
    pub fn from_seconds(start: f64, end: f64, timescale: u32) -> Self {
        Self {
            start: MediaTime::from_seconds(start, timescale),
            duration: MediaTime::from_seconds(end - start, timescale),
        }
    }

    /// End of the range in seconds, if both bounds are numeric
    #[must_use]
    pub fn end_seconds(&self) -> Option<f64> {
        Some(self.start.seconds()? + self.duration.seconds()?)
    }

    /// Whether `time` lies in the half-open range
    #[must_use]
    pub fn contains(&self, time: MediaTime) -> bool {
        match (time.seconds(), self.start.seconds(), self.end_seconds()) {
            (Some(t), Some(start), Some(end)) => start <= t && t < end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_trip_at_default_timescale() {
        let time = MediaTime::from_seconds(12.5, MediaTime::DEFAULT_TIMESCALE);
        assert_eq!(time.seconds(), Some(12.5));
        assert!(time.is_numeric());
    }

    #[test]
    fn non_finite_seconds_are_invalid() {
        assert_eq!(MediaTime::from_seconds(f64::NAN, 600), MediaTime::Invalid);
        assert_eq!(MediaTime::from_seconds(f64::INFINITY, 600), MediaTime::Invalid);
        assert_eq!(MediaTime::new(10, 0), MediaTime::Invalid);
    }

    #[test]
    fn non_numeric_times_have_no_seconds() {
        assert_eq!(MediaTime::Indefinite.seconds(), None);
        assert_eq!(MediaTime::Invalid.seconds_or_zero(), 0.0);
        assert_eq!(MediaTime::default(), MediaTime::Invalid);
    }

    #[test]
    fn display() {
        assert_eq!(MediaTime::from_seconds(1.25, 1000).to_string(), "1.250s");
        assert_eq!(MediaTime::Indefinite.to_string(), "indefinite");
        assert_eq!(MediaTime::Invalid.to_string(), "invalid");
    }

    #[test]
    fn range_is_half_open() {
        let range = TimeRange::from_seconds(10.0, 20.0, 1000);
        assert!(range.contains(MediaTime::from_seconds(10.0, 1000)));
        assert!(range.contains(MediaTime::from_seconds(19.999, 1000)));
        assert!(!range.contains(MediaTime::from_seconds(20.0, 1000)));
        assert!(!range.contains(MediaTime::from_seconds(9.0, 1000)));
        assert!(!range.contains(MediaTime::Indefinite));
    }
}
