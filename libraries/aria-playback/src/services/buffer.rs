//! Buffer readiness
//!
//! One-shot service used while buffering. It settles exactly once:
//! - `Ready` as soon as the engine reports a full or likely-to-keep-up buffer
//! - `NotReady` when the buffer is reported empty or the observing timeout
//!   runs out
//!
//! Between buffer-status signals the engine is re-polled on every tick.

use crate::config::Configuration;
use crate::context::SessionContext;
use crate::engine::BufferStatus;
use crate::observers::{BufferStatusObserver, Observer, TickObserver};
use crate::signal::{ObserverToken, Signal};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferVerdict {
    Ready,
    NotReady,
}

pub struct BufferReadiness {
    status: BufferStatusObserver,
    tick: TickObserver,
    interval: Duration,
    remaining: Duration,
    settled: bool,
}

impl BufferReadiness {
    pub fn new(config: &Configuration) -> Self {
        let interval = config.buffer_observing_interval();
        Self {
            status: Observer::buffer_status(),
            tick: Observer::tick(interval),
            interval,
            remaining: config.buffer_observing_timeout(),
            settled: false,
        }
    }

    /// Begin observing; returns a verdict right away if the engine already has one
    pub fn start(&mut self, ctx: &mut SessionContext) -> Option<BufferVerdict> {
        if self.settled {
            return None;
        }
        if ctx.engine.buffer_status().is_ready() {
            return Some(self.settle(ctx, BufferVerdict::Ready));
        }
        self.status.start(ctx);
        self.tick.start(ctx);
        None
    }

    /// Feed a mailbox signal; returns the verdict once it settles
    pub fn deliver(
        &mut self,
        ctx: &mut SessionContext,
        token: ObserverToken,
        signal: &Signal,
    ) -> Option<BufferVerdict> {
        if self.settled {
            return None;
        }

        if let Some(status) = self.status.deliver(token, signal) {
            return self.evaluate(ctx, status);
        }

        if self.tick.deliver(token, signal).is_some() {
            let polled = ctx.engine.buffer_status();
            if polled.is_ready() {
                return Some(self.settle(ctx, BufferVerdict::Ready));
            }
            self.remaining = self.remaining.saturating_sub(self.interval);
            if self.remaining.is_zero() {
                debug!(target: "aria::service", "buffer observing timed out");
                return Some(self.settle(ctx, BufferVerdict::NotReady));
            }
        }
        None
    }

    /// Whether `token` belongs to this service
    pub fn owns(&self, token: ObserverToken) -> bool {
        self.status.token() == Some(token) || self.tick.token() == Some(token)
    }

    pub fn stop(&mut self, ctx: &mut SessionContext) {
        self.status.stop(ctx, true);
        self.tick.stop(ctx, true);
    }

    fn evaluate(
        &mut self,
        ctx: &mut SessionContext,
        status: BufferStatus,
    ) -> Option<BufferVerdict> {
        if status.is_ready() {
            Some(self.settle(ctx, BufferVerdict::Ready))
        } else if status.empty {
            Some(self.settle(ctx, BufferVerdict::NotReady))
        } else {
            None
        }
    }

    fn settle(&mut self, ctx: &mut SessionContext, verdict: BufferVerdict) -> BufferVerdict {
        self.settled = true;
        self.stop(ctx);
        debug!(target: "aria::service", ?verdict, "buffer readiness settled");
        verdict
    }
}
