use super::{reject, reject_seek, StateController, Transition};
use crate::context::{SeekCompletion, SessionContext};
use crate::signal::{ObserverToken, Signal};
use aria_core::{MediaTime, PlaybackState, PlayerError, UnavailableActionReason};
use tracing::{error, info};

/// The last load attempt failed; `play` retries it
pub(crate) struct FailedController {
    error: PlayerError,
}

impl FailedController {
    pub fn new(error: PlayerError) -> Self {
        Self { error }
    }
}

impl StateController for FailedController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Failed
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        if self.error.is_cancellation() {
            info!(target: "aria::state", "loading cancelled");
        } else {
            error!(target: "aria::state", error = %self.error, "playback failed");
            let failure = self.error.clone();
            ctx.delegate(|d| d.did_failed_with(&failure));
        }

        let failure = &self.error;
        ctx.plugins(|p, media| p.did_failed(media, failure));
        ctx.publish_playback_info();
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        if ctx.media.is_none() {
            return reject(ctx, UnavailableActionReason::LoadMediaFirst);
        }
        Some(Transition::Loading {
            auto_play: true,
            position: ctx.last_known_time,
        })
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::LoadMediaFirst)
    }

    fn stop(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::LoadMediaFirst)
    }

    fn seek(
        &mut self,
        ctx: &mut SessionContext,
        _time: MediaTime,
        completion: Option<SeekCompletion>,
    ) -> Option<Transition> {
        reject_seek(ctx, UnavailableActionReason::WaitTillMediaLoaded, completion)
    }

    fn on_signal(
        &mut self,
        _ctx: &mut SessionContext,
        _token: ObserverToken,
        _signal: &Signal,
    ) -> Option<Transition> {
        None
    }

    fn teardown(&mut self, _ctx: &mut SessionContext) {}
}
