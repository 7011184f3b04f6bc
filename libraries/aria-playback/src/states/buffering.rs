use super::{reject, StateController, Transition};
use crate::config::Configuration;
use crate::context::SessionContext;
use crate::engine::TimeControlStatus;
use crate::notifications::Interruption;
use crate::observers::{
    InterruptionObserver, Observer, RouteChangeObserver, TimeControlObserver, TimeObserver,
};
use crate::services::buffer::{BufferReadiness, BufferVerdict};
use crate::signal::{ObserverToken, Signal};
use aria_core::{PlaybackState, UnavailableActionReason};
use tracing::debug;

/// Waiting for enough data to start or resume playback
///
/// A fresh [`BufferReadiness`] is created for every entry and settles once:
/// ready → playing, starved or timed out → waiting for network.
pub(crate) struct BufferingController {
    issue_play: bool,
    readiness: BufferReadiness,
    time: TimeObserver,
    time_control: TimeControlObserver,
    route: RouteChangeObserver,
    interruption: InterruptionObserver,
}

impl BufferingController {
    pub fn new(config: &Configuration, issue_play: bool) -> Self {
        Self {
            issue_play,
            readiness: BufferReadiness::new(config),
            time: Observer::periodic_time(config.periodic_playing_interval()),
            time_control: Observer::time_control(),
            route: Observer::route_change(),
            interruption: Observer::interruption(),
        }
    }

    fn settle(ctx: &mut SessionContext, verdict: BufferVerdict) -> Transition {
        match verdict {
            BufferVerdict::Ready => {
                ctx.plugins(|p, media| p.will_start_playing(media));
                Transition::Playing
            }
            BufferVerdict::NotReady => Transition::WaitingForNetwork,
        }
    }
}

impl StateController for BufferingController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Buffering
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.plugins(|p, media| p.did_start_buffering(media));

        self.time.start(ctx);
        self.interruption.start(ctx);
        self.route.start(ctx);
        self.time_control.start(ctx);

        if self.issue_play {
            ctx.engine.play();
        }
        ctx.publish_playback_info();

        self.readiness
            .start(ctx)
            .map(|verdict| Self::settle(ctx, verdict))
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::AlreadyTryingToPlay)
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        // Cleared before the transition so a trailing paused status cannot
        // re-enter paused from here.
        self.time_control.stop(ctx, true);
        self.readiness.stop(ctx);
        Some(Transition::PAUSED)
    }

    fn stop(&mut self, _ctx: &mut SessionContext) -> Option<Transition> {
        Some(Transition::STOPPED)
    }

    fn on_signal(
        &mut self,
        ctx: &mut SessionContext,
        token: ObserverToken,
        signal: &Signal,
    ) -> Option<Transition> {
        if self.readiness.owns(token) {
            return self
                .readiness
                .deliver(ctx, token, signal)
                .map(|verdict| Self::settle(ctx, verdict));
        }

        if let Some(time) = self.time.deliver(token, signal) {
            ctx.report_time(time);
            return None;
        }

        if let Some(status) = self.time_control.deliver(token, signal) {
            debug!(target: "aria::state", ?status, "time control status while buffering");
            return match status {
                TimeControlStatus::Paused => self.pause(ctx),
                _ => None,
            };
        }

        if let Some(reason) = self.route.deliver(token, signal) {
            if reason.requires_pause() {
                debug!(target: "aria::state", ?reason, "route lost while buffering");
                return self.pause(ctx);
            }
            return None;
        }

        if let Some(Interruption::Began) = self.interruption.deliver(token, signal) {
            self.time_control.stop(ctx, true);
            return Some(Transition::Paused {
                after_interruption: true,
            });
        }
        None
    }

    fn teardown(&mut self, ctx: &mut SessionContext) {
        self.readiness.stop(ctx);
        self.time.stop(ctx, true);
        self.time_control.stop(ctx, true);
        self.route.stop(ctx, true);
        self.interruption.stop(ctx, true);
    }
}
