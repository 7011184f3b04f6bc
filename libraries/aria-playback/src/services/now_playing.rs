//! "Now playing" surface (lock screen, media keys overlay, system widgets)

use aria_core::{DynamicMetadata, StaticMetadata};

/// Platform sink for now-playing information
///
/// Static metadata is pushed when an item starts loading or finishes loading;
/// playback info whenever the state or position changes.
pub trait NowPlayingPublisher {
    fn set_now_playing_metadata(&mut self, metadata: &StaticMetadata);

    fn set_now_playing_playback_info(&mut self, info: &DynamicMetadata);

    /// Called when the session is dropped
    fn clear(&mut self) {}
}
