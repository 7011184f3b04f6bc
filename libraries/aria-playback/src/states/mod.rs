//! State controllers
//!
//! One controller per [`PlaybackState`]. A controller owns the observers it
//! starts, answers the command surface for its state and returns a
//! [`Transition`] when the session should move on. The session tears the
//! controller down (observers stopped, callbacks cleared) before the
//! successor is installed.

mod buffering;
mod failed;
mod init;
mod loaded;
mod loading;
mod paused;
mod playing;
mod stopped;
mod waiting;

pub(crate) use buffering::BufferingController;
pub(crate) use failed::FailedController;
pub(crate) use init::InitController;
pub(crate) use loaded::LoadedController;
pub(crate) use loading::LoadingController;
pub(crate) use paused::PausedController;
pub(crate) use playing::PlayingController;
pub(crate) use stopped::StoppedController;
pub(crate) use waiting::WaitingForNetworkController;

use crate::config::Configuration;
use crate::context::{SeekCompletion, SessionContext};
use crate::signal::{ObserverToken, Signal};
use aria_core::{MediaTime, PlaybackState, PlayerError, UnavailableActionReason};

/// Where the session goes next
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Transition {
    Loading {
        auto_play: bool,
        position: Option<MediaTime>,
    },
    Loaded {
        auto_play: bool,
        position: Option<MediaTime>,
    },
    Buffering {
        issue_play: bool,
    },
    Playing,
    Paused {
        after_interruption: bool,
    },
    Stopped {
        reached_end: bool,
    },
    WaitingForNetwork,
    Failed(PlayerError),
}

impl Transition {
    pub const PAUSED: Self = Self::Paused {
        after_interruption: false,
    };

    pub const STOPPED: Self = Self::Stopped { reached_end: false };

    pub fn state(&self) -> PlaybackState {
        match self {
            Self::Loading { .. } => PlaybackState::Loading,
            Self::Loaded { .. } => PlaybackState::Loaded,
            Self::Buffering { .. } => PlaybackState::Buffering,
            Self::Playing => PlaybackState::Playing,
            Self::Paused { .. } => PlaybackState::Paused,
            Self::Stopped { .. } => PlaybackState::Stopped,
            Self::WaitingForNetwork => PlaybackState::WaitingForNetwork,
            Self::Failed(_) => PlaybackState::Failed,
        }
    }

    pub fn into_controller(self, config: &Configuration) -> Box<dyn StateController> {
        match self {
            Self::Loading {
                auto_play,
                position,
            } => Box::new(LoadingController::new(auto_play, position)),
            Self::Loaded {
                auto_play,
                position,
            } => Box::new(LoadedController::new(config, auto_play, position)),
            Self::Buffering { issue_play } => {
                Box::new(BufferingController::new(config, issue_play))
            }
            Self::Playing => Box::new(PlayingController::new(config)),
            Self::Paused { after_interruption } => {
                Box::new(PausedController::new(config, after_interruption))
            }
            Self::Stopped { reached_end } => Box::new(StoppedController::new(config, reached_end)),
            Self::WaitingForNetwork => Box::new(WaitingForNetworkController::new(config)),
            Self::Failed(error) => Box::new(FailedController::new(error)),
        }
    }
}

/// Behavior of one playback state
///
/// Commands return `Some(transition)` to move the session, `None` to stay.
/// Refusals go through [`SessionContext::unavailable`] and never change
/// state.
pub(crate) trait StateController {
    fn state(&self) -> PlaybackState;

    /// Entry actions, run right after the controller is installed
    fn enter(&mut self, ctx: &mut SessionContext) -> Option<Transition>;

    /// Load the media already stored in the context
    fn load(
        &mut self,
        _ctx: &mut SessionContext,
        auto_play: bool,
        position: Option<MediaTime>,
    ) -> Option<Transition> {
        Some(Transition::Loading {
            auto_play,
            position,
        })
    }

    fn play(&mut self, ctx: &mut SessionContext) -> Option<Transition>;

    fn pause(&mut self, ctx: &mut SessionContext) -> Option<Transition>;

    fn stop(&mut self, ctx: &mut SessionContext) -> Option<Transition>;

    /// Seek to an already bounded time
    fn seek(
        &mut self,
        ctx: &mut SessionContext,
        time: MediaTime,
        completion: Option<SeekCompletion>,
    ) -> Option<Transition> {
        ctx.seek_engine(time, completion);
        None
    }

    /// Frame stepping; ignored unless the state allows it
    fn step(&mut self, _ctx: &mut SessionContext, count: i32) {
        tracing::debug!(target: "aria::state", state = %self.state(), count, "step ignored");
    }

    /// A live mailbox signal
    fn on_signal(
        &mut self,
        ctx: &mut SessionContext,
        token: ObserverToken,
        signal: &Signal,
    ) -> Option<Transition>;

    /// Stop every observer and clear its callbacks
    fn teardown(&mut self, ctx: &mut SessionContext);
}

/// Refuse a command
pub(crate) fn reject(
    ctx: &mut SessionContext,
    reason: UnavailableActionReason,
) -> Option<Transition> {
    ctx.unavailable(reason);
    None
}

/// Refuse a seek and settle its completion
pub(crate) fn reject_seek(
    ctx: &mut SessionContext,
    reason: UnavailableActionReason,
    completion: Option<SeekCompletion>,
) -> Option<Transition> {
    ctx.unavailable(reason);
    if let Some(completion) = completion {
        completion(false);
    }
    None
}
