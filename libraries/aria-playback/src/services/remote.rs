//! Remote commands (lock screen, headset buttons, media keys)
//!
//! Maps platform remote-control events onto the session command surface.
//! Track navigation is not supported by a single-item session and always
//! fails.

use crate::session::{SeekTarget, Session};
use aria_core::{PlaybackRate, PlaybackState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engine rate magnitude while a seek button is held
const SCAN_RATE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekPhase {
    Begin,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RemoteCommand {
    Play,
    Pause,
    Stop,
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    ChangePlaybackRate { rate: f32 },
    SeekForward { phase: SeekPhase },
    SeekBackward { phase: SeekPhase },
    /// Skip forward; `None` uses the configured interval
    SkipForward { interval: Option<f64> },
    /// Skip backward; `None` uses the configured interval
    SkipBackward { interval: Option<f64> },
    ChangePlaybackPosition { position: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCommandStatus {
    Success,
    CommandFailed,
    NoActionableNowPlayingItem,
}

impl Session {
    /// Handle a remote-control event
    pub fn handle_remote_command(&mut self, command: RemoteCommand) -> RemoteCommandStatus {
        if !self.configuration().remote_commands_enabled {
            debug!(target: "aria::service", ?command, "remote commands disabled");
            return RemoteCommandStatus::CommandFailed;
        }
        debug!(target: "aria::service", ?command, state = %self.state(), "remote command");

        let skip = self.configuration().skip_interval_secs;
        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.pause(),
            RemoteCommand::Stop => self.stop(),
            RemoteCommand::TogglePlayPause => match self.state() {
                PlaybackState::Playing
                | PlaybackState::Buffering
                | PlaybackState::Loading
                | PlaybackState::WaitingForNetwork => self.pause(),
                PlaybackState::Initialization => {
                    return RemoteCommandStatus::NoActionableNowPlayingItem;
                }
                PlaybackState::Loaded
                | PlaybackState::Paused
                | PlaybackState::Stopped
                | PlaybackState::Failed => self.play(),
            },
            RemoteCommand::NextTrack | RemoteCommand::PreviousTrack => {
                return RemoteCommandStatus::CommandFailed;
            }
            RemoteCommand::ChangePlaybackRate { rate } => self.set_rate(PlaybackRate::from(rate)),
            RemoteCommand::SeekForward { phase } => self.scan(phase, SCAN_RATE),
            RemoteCommand::SeekBackward { phase } => self.scan(phase, -SCAN_RATE),
            RemoteCommand::SkipForward { interval } => {
                self.seek(SeekTarget::Offset(interval.unwrap_or(skip)));
            }
            RemoteCommand::SkipBackward { interval } => {
                self.seek(SeekTarget::Offset(-interval.unwrap_or(skip)));
            }
            RemoteCommand::ChangePlaybackPosition { position } => {
                self.seek(SeekTarget::Seconds(position));
            }
        }
        RemoteCommandStatus::Success
    }

    /// Held seek buttons drive the engine rate directly, bypassing admission
    fn scan(&mut self, phase: SeekPhase, rate: f32) {
        let rate = match phase {
            SeekPhase::Begin => rate,
            SeekPhase::End => PlaybackRate::Normal.value(),
        };
        self.ctx.engine.set_rate(rate);
    }
}
