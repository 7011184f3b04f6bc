use super::{reject, StateController, Transition};
use crate::config::Configuration;
use crate::context::SessionContext;
use crate::engine::{PlaybackProgress, TimeControlStatus};
use crate::notifications::Interruption;
use crate::observers::{
    BufferStatusObserver, InterruptionObserver, Observer, PlaybackProgressObserver,
    RouteChangeObserver, TimeControlObserver, TimeObserver,
};
use crate::signal::{ObserverToken, Signal};
use aria_core::{PlaybackState, UnavailableActionReason};
use tracing::{debug, info};

pub(crate) struct PlayingController {
    progress: PlaybackProgressObserver,
    buffer: BufferStatusObserver,
    time_control: TimeControlObserver,
    route: RouteChangeObserver,
    interruption: InterruptionObserver,
    time: TimeObserver,
}

impl PlayingController {
    pub fn new(config: &Configuration) -> Self {
        Self {
            progress: Observer::playback_progress(),
            buffer: Observer::buffer_status(),
            time_control: Observer::time_control(),
            route: Observer::route_change(),
            interruption: Observer::interruption(),
            time: Observer::periodic_time(config.periodic_playing_interval()),
        }
    }

    fn played_to_end(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        let end = ctx.engine.current_time();
        info!(target: "aria::state", %end, "item played to end");
        ctx.delegate(|d| d.did_item_play_to_end_time(end));
        ctx.plugins(|p, media| p.did_play_to_end(media, end));
        self.time_control.stop(ctx, true);
        Some(Transition::Stopped { reached_end: true })
    }
}

impl StateController for PlayingController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Playing
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        let at = ctx.engine.current_time();
        ctx.plugins(|p, media| p.did_start_playing(media, at));

        self.progress.start(ctx);
        self.buffer.start(ctx);
        self.interruption.start(ctx);
        self.time.start(ctx);
        self.route.start(ctx);
        self.time_control.start(ctx);

        ctx.publish_playback_info();
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::AlreadyPlaying)
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        self.time_control.stop(ctx, true);
        Some(Transition::PAUSED)
    }

    fn stop(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        self.time_control.stop(ctx, true);
        Some(Transition::STOPPED)
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

        if let Some(progress) = self.progress.deliver(token, signal) {
            return match progress {
                PlaybackProgress::PlayedToEnd => self.played_to_end(ctx),
                PlaybackProgress::FailedToPlayToEnd | PlaybackProgress::Stalled => {
                    debug!(target: "aria::state", ?progress, "playback stalled");
                    Some(Transition::WaitingForNetwork)
                }
            };
        }

        if let Some(status) = self.buffer.deliver(token, signal) {
            if status.empty && !status.is_ready() {
                debug!(target: "aria::state", "buffer ran empty");
                return Some(Transition::WaitingForNetwork);
            }
            return None;
        }

        if let Some(status) = self.time_control.deliver(token, signal) {
            return match status {
                TimeControlStatus::Paused => self.pause(ctx),
                TimeControlStatus::WaitingToPlayAtSpecifiedRate => {
                    Some(Transition::Buffering { issue_play: false })
                }
                TimeControlStatus::Playing => None,
            };
        }

        if let Some(reason) = self.route.deliver(token, signal) {
            if reason.requires_pause() {
                debug!(target: "aria::state", ?reason, "route lost while playing");
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
        self.progress.stop(ctx, true);
        self.buffer.stop(ctx, true);
        self.time_control.stop(ctx, true);
        self.route.stop(ctx, true);
        self.interruption.stop(ctx, true);
        self.time.stop(ctx, true);
    }
}
