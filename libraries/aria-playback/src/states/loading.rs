use super::{reject, reject_seek, StateController, Transition};
use crate::context::{SeekCompletion, SessionContext};
use crate::engine::ItemStatus;
use crate::notifications::Interruption;
use crate::observers::{InterruptionObserver, ItemStatusObserver, Observer};
use crate::signal::{ObserverToken, Signal};
use aria_core::{MediaTime, PlaybackState, PlayerError, UnavailableActionReason};
use tracing::{debug, error};

/// Asynchronous item creation in flight
///
/// Entry resets the engine (pause, drop the current item, cancel prior
/// preparation and seeks) and asks the engine to prepare the media stored in
/// the context. The prepared item is observed until it is ready or failed.
pub(crate) struct LoadingController {
    auto_play: bool,
    position: Option<MediaTime>,
    preparation: Option<ObserverToken>,
    item_status: ItemStatusObserver,
    interruption: InterruptionObserver,
}

impl LoadingController {
    pub fn new(auto_play: bool, position: Option<MediaTime>) -> Self {
        Self {
            auto_play,
            position,
            preparation: None,
            item_status: Observer::item_status(),
            interruption: Observer::interruption(),
        }
    }

    fn on_item_status(&self, status: ItemStatus) -> Option<Transition> {
        match status {
            ItemStatus::ReadyToPlay => Some(Transition::Loaded {
                auto_play: self.auto_play,
                position: self.position,
            }),
            ItemStatus::Failed => {
                error!(target: "aria::state", "item did not become ready to play");
                Some(Transition::Failed(PlayerError::LoadingFailed))
            }
            ItemStatus::Unknown => None,
        }
    }

    fn finish_preparation(&mut self, ctx: &mut SessionContext, token: ObserverToken) {
        ctx.observers.retire(token);
        self.preparation = None;
    }
}

impl StateController for LoadingController {
    fn state(&self) -> PlaybackState {
        PlaybackState::Loading
    }

    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.engine.pause();
        ctx.cancel_loading();

        ctx.plugins(|p, media| p.will_start_loading(media));

        let token = ctx.observers.allocate();
        let sink = ctx.sink(token);
        let Some(media) = ctx.media.as_ref() else {
            error!(target: "aria::state", "loading without media");
            ctx.observers.retire(token);
            return Some(Transition::Failed(PlayerError::LoadingFailed));
        };
        debug!(
            target: "aria::state",
            url = %media.url,
            auto_play = self.auto_play,
            "preparing item"
        );
        ctx.engine
            .prepare_item(media, &ctx.config.item_loaded_asset_keys, sink);
        self.preparation = Some(token);

        ctx.plugins(|p, media| p.did_start_loading(media));
        self.interruption.start(ctx);
        ctx.publish_metadata();
        ctx.publish_playback_info();
        None
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        reject(ctx, UnavailableActionReason::WaitTillMediaLoaded)
    }

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.cancel_loading();
        Some(Transition::PAUSED)
    }

    fn stop(&mut self, ctx: &mut SessionContext) -> Option<Transition> {
        ctx.cancel_loading();
        Some(Transition::STOPPED)
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
        ctx: &mut SessionContext,
        token: ObserverToken,
        signal: &Signal,
    ) -> Option<Transition> {
        if self.preparation == Some(token) {
            return match signal {
                Signal::ItemPrepared(Ok(item)) => {
                    self.finish_preparation(ctx, token);
                    ctx.engine.replace_current_item(Some(*item));
                    self.item_status.start(ctx);
                    self.on_item_status(ctx.engine.item_status())
                }
                Signal::ItemPrepared(Err(e)) => {
                    self.finish_preparation(ctx, token);
                    error!(
                        target: "aria::state",
                        error = %e,
                        "asset failed to prepare for playback"
                    );
                    Some(Transition::Failed(e.clone()))
                }
                _ => None,
            };
        }

        if let Some(status) = self.item_status.deliver(token, signal) {
            return self.on_item_status(status);
        }

        if let Some(Interruption::Began) = self.interruption.deliver(token, signal) {
            ctx.cancel_loading();
            return Some(Transition::Paused {
                after_interruption: true,
            });
        }
        None
    }

    fn teardown(&mut self, ctx: &mut SessionContext) {
        if let Some(token) = self.preparation.take() {
            ctx.observers.retire(token);
        }
        self.item_status.stop(ctx, true);
        self.interruption.stop(ctx, true);
    }
}
