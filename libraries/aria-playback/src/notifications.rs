//! Route-change and interruption notifications
//!
//! Platform notification centers are injected as a [`SignalSource`] serving
//! [`Topic::RouteChange`] and [`Topic::Interruption`]. The default source
//! never fires.

use crate::signal::{ObserverToken, SignalSink, SignalSource, Topic};
use serde::{Deserialize, Serialize};

/// Why the audio route changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteChangeReason {
    Unknown,
    NewDeviceAvailable,
    OldDeviceUnavailable,
    CategoryChange,
    Override,
    WakeFromSleep,
    NoSuitableRouteForCategory,
    RouteConfigurationChange,
}

impl RouteChangeReason {
    /// Route changes after which playback must not continue on its own
    pub fn requires_pause(&self) -> bool {
        matches!(self, Self::OldDeviceUnavailable | Self::Unknown)
    }
}

/// Audio session interruption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interruption {
    Began,
    Ended { should_resume: bool },
}

/// Notification source that never fires
#[derive(Debug, Default)]
pub struct NullNotifications;

impl SignalSource for NullNotifications {
    fn subscribe(&mut self, topic: Topic, sink: SignalSink) {
        tracing::trace!(
            target: "aria::lifecycle",
            ?topic,
            token = %sink.token(),
            "no notification source installed"
        );
    }

    fn unsubscribe(&mut self, _token: ObserverToken) {}
}
