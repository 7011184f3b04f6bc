//! Session → caller callbacks

use aria_core::{
    Media, MediaTime, PlaybackRate, PlaybackState, PlayerError, UnavailableActionReason,
};

/// Receives session notifications
///
/// Every method runs on the session's owner thread, inside
/// [`crate::Session`] calls or [`crate::Session::pump`]. All methods default
/// to no-ops.
pub trait SessionDelegate {
    /// A transition installed a new active state
    fn did_state_change(&mut self, _state: PlaybackState) {}

    /// `load` replaced the current media
    fn did_current_media_change(&mut self, _media: &Media) {}

    /// Periodic position report
    fn did_current_time_change(&mut self, _time: MediaTime) {}

    /// Duration became known after loading
    fn did_item_duration_change(&mut self, _duration: MediaTime) {}

    /// A command was refused by the active state
    fn unavailable_action(&mut self, _reason: UnavailableActionReason) {}

    fn did_item_play_to_end_time(&mut self, _end_time: MediaTime) {}

    /// A load attempt failed; cancellations are not reported here
    fn did_failed_with(&mut self, _error: &PlayerError) {}

    fn did_playback_rate_change(&mut self, _rate: PlaybackRate) {}
}
