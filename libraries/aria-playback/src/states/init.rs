use super::{reject, reject_seek, StateController, Transition};
use crate::context::{SeekCompletion, SessionContext};
use crate::signal::{ObserverToken, Signal};
use aria_core::{MediaTime, PlaybackState, UnavailableActionReason};
use tracing::debug;

/// Nothing loaded yet; only `load` does anything
#[derive(Debug, Default)]
pub(crate) struct InitController;

impl InitController {
    pub fn new() -> Self {
        Self
    }
}

impl StateController for InitController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Initialization
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        debug!(target: "aria::state", "session initialized");
        for plugin in &mut ctx.plugins {
            plugin.did_init();
        }
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::LoadMediaFirst)
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
        reject_seek(ctx, UnavailableActionReason::LoadMediaFirst, completion)
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
