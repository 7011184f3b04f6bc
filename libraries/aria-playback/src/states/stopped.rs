use super::{reject, StateController, Transition};
use crate::config::Configuration;
use crate::context::SessionContext;
use crate::observers::{Observer, TimeObserver};
use crate::signal::{ObserverToken, Signal};
use aria_core::{MediaTime, PlaybackState, UnavailableActionReason};
use tracing::debug;

/// Engine paused at the start of the item, or at its end after a natural
/// end-of-item
pub(crate) struct StoppedController {
    reached_end: bool,
    time: TimeObserver,
}

impl StoppedController {
    pub fn new(config: &Configuration, reached_end: bool) -> Self {
        Self {
            reached_end,
            time: Observer::periodic_time(config.periodic_playing_interval()),
        }
    }

    fn at_end(ctx: &SessionContext) -> bool {
        match (
            ctx.engine.current_time().seconds(),
            ctx.engine.duration().seconds(),
        ) {
            (Some(current), Some(duration)) => current >= duration,
            _ => false,
        }
    }
}

impl StateController for StoppedController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Stopped
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.engine.pause();
        let at = ctx.engine.current_time();
        ctx.plugins(|p, media| p.did_stopped(media, at));

        let has_item = ctx.engine.has_current_item();
        if has_item {
            self.time.start(ctx);
        }
        if has_item && !self.reached_end {
            ctx.seek_engine(MediaTime::ZERO, None);
        }

        ctx.publish_playback_info();
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        if ctx.has_ready_item() {
            if Self::at_end(ctx) {
                debug!(target: "aria::state", "rewinding before replay");
                ctx.seek_engine(MediaTime::ZERO, None);
            }
            return Some(Transition::Buffering { issue_play: true });
        }
        if ctx.media.is_some() {
            return Some(Transition::Loading {
                auto_play: true,
                position: None,
            });
        }
        reject(ctx, UnavailableActionReason::LoadMediaFirst)
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::AlreadyStopped)
    }

    fn stop(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::AlreadyStopped)
    }

    fn step(&mut self, ctx: &mut SessionContext, count: i32) {
        ctx.step_engine(count);
    }

    fn on_signal(
        &mut self,
        ctx: &mut SessionContext,
        token: ObserverToken,
        signal: &Signal,
    ) -> Option<Transition> {
        if let Some(time) = self.time.deliver(token, signal) {
            ctx.report_time(time);
        }
        None
    }

    fn teardown(&mut self, ctx: &mut SessionContext) {
        self.time.stop(ctx, true);
    }
}
