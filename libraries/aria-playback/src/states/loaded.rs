use super::{StateController, Transition};
use crate::config::Configuration;
use crate::context::SessionContext;
use crate::observers::{Observer, TimeObserver};
use crate::signal::{ObserverToken, Signal};
use aria_core::{MediaMetadata, MediaTime, PlaybackState};
use tracing::{debug, warn};

/// Item ready, nothing playing yet
///
/// Entry publishes duration and metadata, seeks to the requested start
/// position and schedules auto-play through the mailbox so it runs after
/// the transition into this state has completed.
pub(crate) struct LoadedController {
    auto_play: bool,
    position: Option<MediaTime>,
    auto_play_token: Option<ObserverToken>,
    time: TimeObserver,
}

impl LoadedController {
    pub fn new(config: &Configuration, auto_play: bool, position: Option<MediaTime>) -> Self {
        Self {
            auto_play,
            position,
            auto_play_token: None,
            time: Observer::periodic_time(config.periodic_playing_interval()),
        }
    }
}

impl StateController for LoadedController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Loaded
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.asset_metadata = Some(MediaMetadata::from_items(&ctx.engine.common_metadata()));

        let duration = ctx.engine.duration();
        debug!(target: "aria::state", %duration, "item loaded");
        ctx.delegate(|d| d.did_item_duration_change(duration));
        ctx.plugins(|p, media| p.did_load(media, duration));

        self.time.start(ctx);

        match self.position {
            Some(position) => match ctx.bounded(position) {
                Ok(time) => ctx.seek_engine(time, None),
                Err(reason) => {
                    warn!(
                        target: "aria::unavailable",
                        %reason,
                        %position,
                        "start position ignored"
                    );
                }
            },
            None => {
                let time = ctx.engine.current_time();
                ctx.delegate(|d| d.did_current_time_change(time));
            }
        }

        if self.auto_play {
            let token = ctx.observers.allocate();
            ctx.post(token, Signal::AutoPlay);
            self.auto_play_token = Some(token);
        }

        ctx.publish_metadata();
        None
    }

    fn play(&mut self, _ctx: &mut SessionContext) -> Option<Transition> {
        Some(Transition::Buffering { issue_play: true })
    }

    fn pause(&mut self, _ctx: &mut SessionContext) -> Option<Transition> {
        Some(Transition::PAUSED)
    }

    fn stop(&mut self, _ctx: &mut SessionContext) -> Option<Transition> {
        Some(Transition::STOPPED)
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
        if self.auto_play_token == Some(token) && *signal == Signal::AutoPlay {
            ctx.observers.retire(token);
            self.auto_play_token = None;
            return self.play(ctx);
        }

        if let Some(time) = self.time.deliver(token, signal) {
            ctx.report_time(time);
        }
        None
    }

    fn teardown(&mut self, ctx: &mut SessionContext) {
        if let Some(token) = self.auto_play_token.take() {
            ctx.observers.retire(token);
        }
        self.time.stop(ctx, true);
    }
}
