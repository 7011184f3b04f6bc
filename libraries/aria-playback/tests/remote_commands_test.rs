//! Remote-control commands mapped onto the session

mod test_helpers;

use aria_core::{PlaybackRate, PlaybackState};
use aria_playback::{
    Configuration, EngineCapabilities, RemoteCommand, RemoteCommandStatus, SeekPhase,
};
use test_helpers::*;

#[test]
fn toggle_without_media_has_nothing_to_act_on() {
    let mut f = Fixture::new();
    assert_eq!(
        f.session
            .handle_remote_command(RemoteCommand::TogglePlayPause),
        RemoteCommandStatus::NoActionableNowPlayingItem
    );
}

#[test]
fn toggle_flips_between_playing_and_paused() {
    let mut f = Fixture::playing(60.0);

    assert_eq!(
        f.session
            .handle_remote_command(RemoteCommand::TogglePlayPause),
        RemoteCommandStatus::Success
    );
    assert_eq!(f.state(), PlaybackState::Paused);

    f.session
        .handle_remote_command(RemoteCommand::TogglePlayPause);
    assert_eq!(f.state(), PlaybackState::Playing);
}

#[test]
fn play_pause_stop_commands() {
    let mut f = Fixture::playing(60.0);
    f.session.handle_remote_command(RemoteCommand::Pause);
    assert_eq!(f.state(), PlaybackState::Paused);
    f.session.handle_remote_command(RemoteCommand::Play);
    assert_eq!(f.state(), PlaybackState::Playing);
    f.session.handle_remote_command(RemoteCommand::Stop);
    assert_eq!(f.state(), PlaybackState::Stopped);
}

#[test]
fn track_navigation_fails() {
    let mut f = Fixture::playing(60.0);
    assert_eq!(
        f.session.handle_remote_command(RemoteCommand::NextTrack),
        RemoteCommandStatus::CommandFailed
    );
    assert_eq!(
        f.session
            .handle_remote_command(RemoteCommand::PreviousTrack),
        RemoteCommandStatus::CommandFailed
    );
    assert_eq!(f.state(), PlaybackState::Playing);
}

#[test]
fn disabled_remote_commands_fail() {
    let mut f = Fixture::with_config(Configuration {
        remote_commands_enabled: false,
        ..test_config()
    });
    assert_eq!(
        f.session.handle_remote_command(RemoteCommand::Play),
        RemoteCommandStatus::CommandFailed
    );
    assert!(f.drain_events().is_empty());
}

#[test]
fn skip_uses_configured_interval() {
    let mut f = Fixture::playing(120.0);
    f.engine.set_current_time(secs(30.0));

    f.session
        .handle_remote_command(RemoteCommand::SkipForward { interval: None });
    assert_eq!(f.engine.seeks()[0].seconds(), Some(45.0));

    f.session.handle_remote_command(RemoteCommand::SkipBackward {
        interval: Some(5.0),
    });
    assert_eq!(f.engine.seeks()[1].seconds(), Some(40.0));
}

#[test]
fn change_position_seeks_absolute() {
    let mut f = Fixture::playing(120.0);
    f.session
        .handle_remote_command(RemoteCommand::ChangePlaybackPosition { position: 90.0 });
    assert_eq!(f.engine.seeks(), vec![secs(90.0)]);
}

#[test]
fn change_rate_goes_through_admission() {
    let mut f = Fixture::playing(120.0);
    f.session
        .handle_remote_command(RemoteCommand::ChangePlaybackRate { rate: 1.25 });
    assert_eq!(f.session.rate(), PlaybackRate::Fast);

    f.session
        .handle_remote_command(RemoteCommand::ChangePlaybackRate { rate: 2.0 });
    assert_eq!(f.session.rate(), PlaybackRate::Normal);
}

#[test]
fn held_seek_buttons_scan_the_engine() {
    let mut f = Fixture::playing(120.0);
    f.engine.set_capabilities(EngineCapabilities::default());

    f.session.handle_remote_command(RemoteCommand::SeekForward {
        phase: SeekPhase::Begin,
    });
    assert_eq!(f.engine.lock().rate, 3.0);

    f.session.handle_remote_command(RemoteCommand::SeekForward {
        phase: SeekPhase::End,
    });
    assert_eq!(f.engine.lock().rate, 1.0);

    f.session.handle_remote_command(RemoteCommand::SeekBackward {
        phase: SeekPhase::Begin,
    });
    assert_eq!(f.engine.lock().rate, -3.0);
    assert_eq!(f.state(), PlaybackState::Playing);
}

#[test]
fn commands_have_a_stable_wire_shape() {
    let command: RemoteCommand =
        serde_json::from_str(r#"{"command":"skip_forward","interval":10.0}"#).unwrap();
    assert_eq!(
        command,
        RemoteCommand::SkipForward {
            interval: Some(10.0)
        }
    );

    let json = serde_json::to_value(RemoteCommand::SeekBackward {
        phase: SeekPhase::End,
    })
    .unwrap();
    assert_eq!(json["command"], "seek_backward");
    assert_eq!(json["phase"], "end");
}
