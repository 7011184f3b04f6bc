//! Playback rate admission
//!
//! Classifies a requested rate by direction and magnitude and checks the
//! matching engine capability before the rate is applied.

use crate::engine::EngineCapabilities;
use aria_core::PlaybackRate;

/// Capability a rate depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateCapability {
    FastForward,
    SlowForward,
    Reverse,
    SlowReverse,
    FastReverse,
}

/// Outcome of a rate request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Apply the rate
    Allowed,
    /// The item lacks the capability; fall back to normal speed
    Denied(RateCapability),
    /// A zero rate means pause
    Pause,
}

/// Capability needed for `rate`, `None` for real-time-or-faster-up-to-2x and zero
pub fn required_capability(rate: f32) -> Option<RateCapability> {
    if rate >= 2.0 {
        Some(RateCapability::FastForward)
    } else if rate >= 1.0 {
        None
    } else if rate > 0.0 {
        Some(RateCapability::SlowForward)
    } else if rate == 0.0 {
        None
    } else if rate == -1.0 {
        Some(RateCapability::Reverse)
    } else if rate > -1.0 {
        Some(RateCapability::SlowReverse)
    } else {
        Some(RateCapability::FastReverse)
    }
}

/// Decide whether `rate` can be applied given `capabilities`
pub fn admit(rate: PlaybackRate, capabilities: &EngineCapabilities) -> Admission {
    let value = rate.value();
    if value == 0.0 {
        return Admission::Pause;
    }

    let Some(capability) = required_capability(value) else {
        return Admission::Allowed;
    };

    let supported = match capability {
        RateCapability::FastForward => capabilities.can_play_fast_forward,
        RateCapability::SlowForward => capabilities.can_play_slow_forward,
        RateCapability::Reverse => capabilities.can_play_reverse,
        RateCapability::SlowReverse => capabilities.can_play_slow_reverse,
        RateCapability::FastReverse => capabilities.can_play_fast_reverse,
    };

    if supported {
        Admission::Allowed
    } else {
        Admission::Denied(capability)
    }
}
