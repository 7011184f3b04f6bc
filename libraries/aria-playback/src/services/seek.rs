//! Seek bounding
//!
//! Validates an absolute seek target against what the engine can actually
//! reach:
//! - non-numeric, zero or negative targets pass through untouched
//! - with a known duration, anything at or past the end is refused
//! - with an unknown duration (live), the target must fall inside a
//!   seekable or loaded range

use crate::engine::PlaybackEngine;
use aria_core::{MediaTime, TimeRange, UnavailableActionReason};
use tracing::debug;

/// Snapshot of the engine's reachable timeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeekBounds {
    pub duration: MediaTime,
    pub ranges: Vec<TimeRange>,
}

impl SeekBounds {
    pub fn new(duration: MediaTime, ranges: Vec<TimeRange>) -> Self {
        Self { duration, ranges }
    }

    /// Capture duration plus seekable and loaded ranges of the current item
    pub fn capture(engine: &dyn PlaybackEngine) -> Self {
        let mut ranges = engine.seekable_ranges();
        ranges.extend(engine.loaded_ranges());
        Self {
            duration: engine.duration(),
            ranges,
        }
    }

    /// Bounded target, or the reason it cannot be reached
    pub fn bound(&self, time: MediaTime) -> Result<MediaTime, UnavailableActionReason> {
        let Some(seconds) = time.seconds() else {
            return Ok(time);
        };
        if seconds <= 0.0 {
            return Ok(time);
        }

        match self.duration.seconds() {
            Some(duration) if seconds >= duration => {
                debug!(
                    target: "aria::service",
                    %time,
                    duration = %self.duration,
                    "seek past the end"
                );
                Err(UnavailableActionReason::SeekPositionNotAvailable)
            }
            Some(_) => Ok(time),
            None if self.ranges.iter().any(|range| range.contains(time)) => Ok(time),
            None => {
                debug!(target: "aria::service", %time, "seek outside seekable ranges");
                Err(UnavailableActionReason::SeekPositionNotAvailable)
            }
        }
    }
}
