//! Ancillary observers
//!
//! An [`Observer`] is a single-callback subscription to one [`Topic`]. It is
//! owned by exactly one state controller and follows an explicit lifecycle:
//!
//! - `start` allocates a fresh token and subscribes to the topic's source
//! - `stop(clear_callbacks = false)` unsubscribes, but signals already in the
//!   mailbox are still delivered
//! - `stop(clear_callbacks = true)` also retires the token, so nothing
//!   addressed to it reaches any controller again
//!
//! Controllers stop every observer with `clear_callbacks = true` before the
//! session installs their successor.

use crate::context::SessionContext;
use crate::engine::{BufferStatus, ItemStatus, PlaybackProgress, TimeControlStatus};
use crate::notifications::{Interruption, RouteChangeReason};
use crate::signal::{ObserverToken, Signal, Topic};
use aria_core::MediaTime;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Allocates tokens and tracks which ones may still deliver
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    next: u64,
    live: HashSet<ObserverToken>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a live token
    pub fn allocate(&mut self) -> ObserverToken {
        self.next += 1;
        let token = ObserverToken::new(self.next);
        self.live.insert(token);
        token
    }

    /// Stop accepting signals for `token`
    pub fn retire(&mut self, token: ObserverToken) {
        self.live.remove(&token);
    }

    pub fn is_live(&self, token: ObserverToken) -> bool {
        self.live.contains(&token)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// One subscription with a typed decoder
pub struct Observer<T> {
    name: &'static str,
    topic: Topic,
    decode: fn(&Signal) -> Option<T>,
    token: Option<ObserverToken>,
    subscribed: bool,
}

impl<T> Observer<T> {
    pub fn new(name: &'static str, topic: Topic, decode: fn(&Signal) -> Option<T>) -> Self {
        Self {
            name,
            topic,
            decode,
            token: None,
            subscribed: false,
        }
    }

    /// Subscribe with a fresh token; no-op while already subscribed
    pub fn start(&mut self, ctx: &mut SessionContext) {
        if self.subscribed {
            return;
        }
        if let Some(stale) = self.token.take() {
            ctx.observers.retire(stale);
        }

        let token = ctx.observers.allocate();
        ctx.subscribe(self.topic, token);
        self.token = Some(token);
        self.subscribed = true;
        debug!(target: "aria::lifecycle", observer = self.name, %token, "observer started");
    }

    /// Unsubscribe; with `clear_callbacks` also drop anything still in flight
    pub fn stop(&mut self, ctx: &mut SessionContext, clear_callbacks: bool) {
        let Some(token) = self.token else {
            return;
        };

        if self.subscribed {
            ctx.unsubscribe(self.topic.origin(), token);
            self.subscribed = false;
        }

        if clear_callbacks {
            ctx.observers.retire(token);
            self.token = None;
        }
        debug!(
            target: "aria::lifecycle",
            observer = self.name,
            %token,
            clear_callbacks,
            "observer stopped"
        );
    }

    /// Decode `signal` if it is addressed to this observer
    pub fn deliver(&self, token: ObserverToken, signal: &Signal) -> Option<T> {
        if self.token != Some(token) {
            return None;
        }
        (self.decode)(signal)
    }

    pub fn is_running(&self) -> bool {
        self.subscribed
    }

    pub fn token(&self) -> Option<ObserverToken> {
        self.token
    }
}

pub type TimeObserver = Observer<MediaTime>;
pub type TimeControlObserver = Observer<TimeControlStatus>;
pub type RouteChangeObserver = Observer<RouteChangeReason>;
pub type InterruptionObserver = Observer<Interruption>;
pub type PlaybackProgressObserver = Observer<PlaybackProgress>;
pub type ItemStatusObserver = Observer<ItemStatus>;
pub type BufferStatusObserver = Observer<BufferStatus>;
pub type TickObserver = Observer<()>;

impl Observer<MediaTime> {
    /// Periodic position reports
    pub fn periodic_time(interval: Duration) -> Self {
        Self::new("time", Topic::PeriodicTime { interval }, |signal| match signal {
            Signal::PeriodicTime(time) => Some(*time),
            _ => None,
        })
    }
}

impl Observer<TimeControlStatus> {
    pub fn time_control() -> Self {
        Self::new("time_control", Topic::TimeControlStatus, |signal| match signal {
            Signal::TimeControlStatus(status) => Some(*status),
            _ => None,
        })
    }
}

impl Observer<RouteChangeReason> {
    pub fn route_change() -> Self {
        Self::new("route_change", Topic::RouteChange, |signal| match signal {
            Signal::RouteChanged(reason) => Some(*reason),
            _ => None,
        })
    }
}

impl Observer<Interruption> {
    pub fn interruption() -> Self {
        Self::new("interruption", Topic::Interruption, |signal| match signal {
            Signal::Interruption(interruption) => Some(*interruption),
            _ => None,
        })
    }
}

impl Observer<PlaybackProgress> {
    /// End of item, failure to reach the end, stalls
    pub fn playback_progress() -> Self {
        Self::new("playback", Topic::PlaybackProgress, |signal| match signal {
            Signal::PlaybackProgress(progress) => Some(*progress),
            _ => None,
        })
    }
}

impl Observer<ItemStatus> {
    pub fn item_status() -> Self {
        Self::new("item_status", Topic::ItemStatus, |signal| match signal {
            Signal::ItemStatus(status) => Some(*status),
            _ => None,
        })
    }
}

impl Observer<BufferStatus> {
    pub fn buffer_status() -> Self {
        Self::new("buffer", Topic::BufferStatus, |signal| match signal {
            Signal::BufferStatus(status) => Some(*status),
            _ => None,
        })
    }
}

impl Observer<()> {
    pub fn tick(interval: Duration) -> Self {
        Self::new("tick", Topic::Tick { interval }, |signal| match signal {
            Signal::Tick => Some(()),
            _ => None,
        })
    }
}
