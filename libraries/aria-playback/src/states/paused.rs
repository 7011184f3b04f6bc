use super::{reject, StateController, Transition};
use crate::config::Configuration;
use crate::context::SessionContext;
use crate::engine::TimeControlStatus;
use crate::notifications::Interruption;
use crate::observers::{InterruptionObserver, Observer, TimeControlObserver, TimeObserver};
use crate::signal::{ObserverToken, Signal};
use aria_core::{PlaybackState, UnavailableActionReason};
use tracing::{debug, info};

pub(crate) struct PausedController {
    after_interruption: bool,
    interruption: InterruptionObserver,
    time: TimeObserver,
    time_control: TimeControlObserver,
}

impl PausedController {
    pub fn new(config: &Configuration, after_interruption: bool) -> Self {
        Self {
            after_interruption,
            interruption: Observer::interruption(),
            time: Observer::periodic_time(config.periodic_playing_interval()),
            time_control: Observer::time_control(),
        }
    }

    fn leave(&mut self, ctx: &mut SessionContext, transition: Transition) -> Option<Transition> {
        self.time_control.stop(ctx, true);
        Some(transition)
    }
}

impl StateController for PausedController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Paused
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.engine.pause();
        let at = ctx.engine.current_time();
        ctx.plugins(|p, media| p.did_paused(media, at));

        self.interruption.start(ctx);
        if ctx.engine.has_current_item() {
            self.time.start(ctx);
        }
        self.time_control.start(ctx);

        ctx.publish_playback_info();
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        if ctx.has_ready_item() {
            return self.leave(ctx, Transition::Buffering { issue_play: true });
        }
        if ctx.media.is_some() {
            debug!(target: "aria::state", "no ready item, reloading");
            let position = ctx.last_known_time;
            return self.leave(
                ctx,
                Transition::Loading {
                    auto_play: true,
                    position,
                },
            );
        }
        reject(ctx, UnavailableActionReason::LoadMediaFirst)
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::AlreadyPaused)
    }

    fn stop(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        self.leave(ctx, Transition::STOPPED)
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
            return None;
        }

        if let Some(TimeControlStatus::Playing) = self.time_control.deliver(token, signal) {
            return self.leave(ctx, Transition::Playing);
        }

        if let Some(Interruption::Ended { should_resume }) =
            self.interruption.deliver(token, signal)
        {
            if should_resume && self.after_interruption && ctx.config.resume_after_interruption {
                info!(target: "aria::state", "interruption ended, resuming");
                return self.play(ctx);
            }
        }
        None
    }

    fn teardown(&mut self, ctx: &mut SessionContext) {
        self.interruption.stop(ctx, true);
        self.time.stop(ctx, true);
        self.time_control.stop(ctx, true);
    }
}
