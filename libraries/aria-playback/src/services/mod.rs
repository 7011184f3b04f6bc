//! Services used by the state controllers
//!
//! - `seek`: bounds absolute seek targets
//! - `buffer`: one-shot buffer readiness verdict
//! - `rate`: playback rate admission
//! - `now_playing`, `audio_session`: platform surfaces
//! - `remote`: remote-control command mapping

pub mod audio_session;
pub(crate) mod buffer;
pub mod now_playing;
pub mod rate;
pub mod remote;
pub mod seek;
