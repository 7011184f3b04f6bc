use super::{StateController, Transition};
use crate::config::Configuration;
use crate::context::SessionContext;
use crate::engine::{TimeControlStatus, WaitingReason};
use crate::observers::{Observer, TimeControlObserver, TimeObserver};
use crate::signal::{ObserverToken, Signal};
use aria_core::PlaybackState;
use tracing::debug;

/// Playback stalled on the network
///
/// Leaves as soon as the engine reports it is playing again, or on an
/// explicit command. The time control callbacks are cleared before any
/// transition out of this state.
pub(crate) struct WaitingForNetworkController {
    time_control: TimeControlObserver,
    time: TimeObserver,
}

impl WaitingForNetworkController {
    pub fn new(config: &Configuration) -> Self {
        Self {
            time_control: Observer::time_control(),
            time: Observer::periodic_time(config.periodic_playing_interval()),
        }
    }

    fn leave(&mut self, ctx: &mut SessionContext, transition: Transition) -> Option<Transition> {
        self.time_control.stop(ctx, true);
        Some(transition)
    }
}

impl StateController for WaitingForNetworkController {
    fn state(&self) -> PlaybackState {
        PlaybackState::WaitingForNetwork
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.plugins(|p, media| p.did_start_waiting_for_network(media));
        self.time_control.start(ctx);
        self.time.start(ctx);
        ctx.publish_playback_info();
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        match ctx.engine.reason_for_waiting_to_play() {
            Some(WaitingReason::EvaluatingBufferingRate) => {
                let current = ctx.engine.current_time();
                debug!(target: "aria::state", %current, "reloading at current position");
                let position = current.is_numeric().then_some(current);
                self.leave(
                    ctx,
                    Transition::Loading {
                        auto_play: true,
                        position,
                    },
                )
            }
            _ => self.leave(ctx, Transition::Buffering { issue_play: true }),
        }
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        self.leave(ctx, Transition::PAUSED)
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

        match self.time_control.deliver(token, signal)? {
            TimeControlStatus::Paused => self.pause(ctx),
            TimeControlStatus::WaitingToPlayAtSpecifiedRate => {
                debug!(target: "aria::state", "still waiting to play at specified rate");
                None
            }
            TimeControlStatus::Playing => self.leave(ctx, Transition::Playing),
        }
    }

    fn teardown(&mut self, ctx: &mut SessionContext) {
        self.time_control.stop(ctx, true);
        self.time.stop(ctx, true);
    }
}
