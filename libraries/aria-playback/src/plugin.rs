//! Lifecycle hooks for add-ons (analytics, logging, ad insertion, …)

use aria_core::{Media, MediaTime, PlayerError};

/// Fire-and-forget hooks called at lifecycle points
///
/// Plugins observe; they cannot veto or redirect a transition. All methods
/// default to no-ops.
pub trait Plugin {
    fn did_init(&mut self) {}

    fn will_start_loading(&mut self, _media: &Media) {}

    fn did_start_loading(&mut self, _media: &Media) {}

    fn did_start_buffering(&mut self, _media: &Media) {}

    /// `load` replaced `previous` with `media`
    fn did_change(&mut self, _media: &Media, _previous: Option<&Media>) {}

    fn did_load(&mut self, _media: &Media, _duration: MediaTime) {}

    fn will_start_playing(&mut self, _media: &Media) {}

    fn did_start_playing(&mut self, _media: &Media, _at: MediaTime) {}

    fn did_paused(&mut self, _media: &Media, _at: MediaTime) {}

    fn did_stopped(&mut self, _media: &Media, _at: MediaTime) {}

    fn did_start_waiting_for_network(&mut self, _media: &Media) {}

    fn did_failed(&mut self, _media: &Media, _error: &PlayerError) {}

    fn did_play_to_end(&mut self, _media: &Media, _at: MediaTime) {}
}
