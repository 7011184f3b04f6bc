//! Signals and the session mailbox
//!
//! Everything that happens outside the session's owner thread (engine
//! callbacks, route/interruption notifications, timer ticks, seek
//! completions) arrives as a [`Signal`] tagged with the [`ObserverToken`] of
//! the subscription that asked for it. The token lets the session drop
//! signals addressed to a controller that has already been replaced.
//!
//! ```text
//! Engine / timer / notification thread         Session owner thread
//!        │                                              │
//!        │  sink.emit(Signal::TimeControlStatus(..))    │
//!        │─────────────────────────────────────────────>│ mailbox
//!        │                                              │ pump(): token live?
//!        │                                              │   yes → controller.on_signal
//!        │                                              │   no  → dropped
//! ```

use crate::engine::{BufferStatus, ItemId, ItemStatus, PlaybackProgress, TimeControlStatus};
use crate::notifications::{Interruption, RouteChangeReason};
use crate::session::SessionCommand;
use aria_core::{MediaTime, PlayerError};
use crossbeam_channel::Sender;
use std::time::Duration;

/// Identity of one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverToken(u64);

impl ObserverToken {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObserverToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which collaborator serves a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Engine,
    Notifications,
    Timer,
}

/// What a subscription listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Readiness of the current item
    ItemStatus,
    /// Playback position, reported every `interval`
    PeriodicTime { interval: Duration },
    /// Paused / waiting / playing
    TimeControlStatus,
    /// Likely-to-keep-up, full and empty buffer flags
    BufferStatus,
    /// End of item, failure to reach the end, stalls
    PlaybackProgress,
    /// Audio route changes
    RouteChange,
    /// Audio session interruptions
    Interruption,
    /// Wall clock tick every `interval`
    Tick { interval: Duration },
}

impl Topic {
    pub fn origin(&self) -> Origin {
        match self {
            Self::ItemStatus
            | Self::PeriodicTime { .. }
            | Self::TimeControlStatus
            | Self::BufferStatus
            | Self::PlaybackProgress => Origin::Engine,
            Self::RouteChange | Self::Interruption => Origin::Notifications,
            Self::Tick { .. } => Origin::Timer,
        }
    }

    /// Same topic, ignoring intervals
    pub fn same_kind(&self, other: &Topic) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// An external event on its way to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Asynchronous item creation finished
    ItemPrepared(Result<ItemId, PlayerError>),
    ItemStatus(ItemStatus),
    PeriodicTime(MediaTime),
    TimeControlStatus(TimeControlStatus),
    BufferStatus(BufferStatus),
    PlaybackProgress(PlaybackProgress),
    RouteChanged(RouteChangeReason),
    Interruption(Interruption),
    Tick,
    /// Deferred play request scheduled by the loaded state
    AutoPlay,
    SeekCompleted { finished: bool },
}

/// Mailbox entry
#[derive(Debug)]
pub enum Envelope {
    Signal { token: ObserverToken, signal: Signal },
    Command(SessionCommand),
}

/// Write end handed to a signal source for one subscription
///
/// Cloneable and `Send`; emitting from any thread is fine.
#[derive(Debug, Clone)]
pub struct SignalSink {
    token: ObserverToken,
    tx: Sender<Envelope>,
}

impl SignalSink {
    pub(crate) fn new(token: ObserverToken, tx: Sender<Envelope>) -> Self {
        Self { token, tx }
    }

    pub fn token(&self) -> ObserverToken {
        self.token
    }

    /// Post a signal; returns false once the session is gone
    pub fn emit(&self, signal: Signal) -> bool {
        self.tx
            .send(Envelope::Signal {
                token: self.token,
                signal,
            })
            .is_ok()
    }
}

/// Completion handle for one engine seek
///
/// The engine must complete every ticket exactly once, with `false` when the
/// seek was cancelled or superseded.
#[derive(Debug)]
pub struct SeekTicket {
    sink: SignalSink,
}

impl SeekTicket {
    pub(crate) fn new(sink: SignalSink) -> Self {
        Self { sink }
    }

    pub fn complete(self, finished: bool) {
        self.sink.emit(Signal::SeekCompleted { finished });
    }
}

/// Something that can be subscribed to
///
/// Implemented by the playback engine, the notification source and the timer.
/// A source must stop emitting for a token once it is unsubscribed; signals
/// already in flight are filtered by the session.
pub trait SignalSource {
    fn subscribe(&mut self, topic: Topic, sink: SignalSink);

    fn unsubscribe(&mut self, token: ObserverToken);
}
