//! Session Events
//!
//! Event-based forwarding of delegate callbacks, for UIs that live on
//! another thread. [`ChannelDelegate`] turns each callback into a
//! [`SessionEvent`] and sends it over a crossbeam channel:
//! - State changes (one per transition)
//! - Media changes (one per `load`)
//! - Time and duration updates
//! - Rejected commands and load failures
//! - Rate changes

use crate::delegate::SessionDelegate;
use aria_core::{
    Media, MediaTime, PlaybackRate, PlaybackState, PlayerError, UnavailableActionReason,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Events emitted by a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The active state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A new media replaced the current one
    MediaChanged {
        /// URL of the new media
        url: String,
    },

    /// Position update (periodic, `periodic_playing_time_secs`)
    TimeChanged {
        /// Current playback position
        time: MediaTime,
    },

    /// Item duration became known
    DurationChanged {
        /// Duration, `indefinite` for live content
        duration: MediaTime,
    },

    /// A command was refused by the active state
    Unavailable {
        /// Why the command was refused
        reason: UnavailableActionReason,
    },

    /// The item played to its end
    PlayedToEnd {
        /// Position at the end
        time: MediaTime,
    },

    /// Loading failed
    Failed {
        /// The failure
        error: PlayerError,
    },

    /// Effective playback rate changed
    RateChanged {
        /// New rate
        rate: PlaybackRate,
    },
}

/// Delegate that forwards every callback as a [`SessionEvent`]
#[derive(Debug, Clone)]
pub struct ChannelDelegate {
    tx: Sender<SessionEvent>,
}

impl ChannelDelegate {
    /// Create a delegate and the receiver its events arrive on
    pub fn new() -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn emit(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(target: "aria::lifecycle", "session event receiver dropped");
        }
    }
}

impl SessionDelegate for ChannelDelegate {
    fn did_state_change(&mut self, state: PlaybackState) {
        self.emit(SessionEvent::StateChanged { state });
    }

    fn did_current_media_change(&mut self, media: &Media) {
        self.emit(SessionEvent::MediaChanged {
            url: media.url.clone(),
        });
    }

    fn did_current_time_change(&mut self, time: MediaTime) {
        self.emit(SessionEvent::TimeChanged { time });
    }

    fn did_item_duration_change(&mut self, duration: MediaTime) {
        self.emit(SessionEvent::DurationChanged { duration });
    }

    fn unavailable_action(&mut self, reason: UnavailableActionReason) {
        self.emit(SessionEvent::Unavailable { reason });
    }

    fn did_item_play_to_end_time(&mut self, end_time: MediaTime) {
        self.emit(SessionEvent::PlayedToEnd { time: end_time });
    }

    fn did_failed_with(&mut self, error: &PlayerError) {
        self.emit(SessionEvent::Failed {
            error: error.clone(),
        });
    }

    fn did_playback_rate_change(&mut self, rate: PlaybackRate) {
        self.emit(SessionEvent::RateChanged { rate });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_become_events() {
        let (mut delegate, rx) = ChannelDelegate::new();
        delegate.did_state_change(PlaybackState::Buffering);
        delegate.unavailable_action(UnavailableActionReason::AlreadyPlaying);
        delegate.did_playback_rate_change(PlaybackRate::Fast);

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::StateChanged {
                    state: PlaybackState::Buffering
                },
                SessionEvent::Unavailable {
                    reason: UnavailableActionReason::AlreadyPlaying
                },
                SessionEvent::RateChanged {
                    rate: PlaybackRate::Fast
                },
            ]
        );
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (mut delegate, rx) = ChannelDelegate::new();
        drop(rx);
        delegate.did_state_change(PlaybackState::Paused);
    }

    #[test]
    fn event_wire_shape() {
        let json = serde_json::to_value(SessionEvent::StateChanged {
            state: PlaybackState::WaitingForNetwork,
        })
        .unwrap();
        assert_eq!(json["event"], "state_changed");
        assert_eq!(json["state"], "waiting_for_network");
    }
}
