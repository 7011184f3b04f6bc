//! Playback session - the single owner of playback state
//!
//! A [`Session`] forwards every command to its active state controller and
//! performs the only state mutation there is: installing the controller the
//! active one asks to hand over to. Signals from the engine, the
//! notification source and the timer are queued in the session mailbox and
//! only touch state when the owner thread calls [`Session::pump`].

use crate::config::Configuration;
use crate::context::{SeekCompletion, SessionContext};
use crate::delegate::SessionDelegate;
use crate::engine::PlaybackEngine;
use crate::error::{Result, SessionError};
use crate::notifications::NullNotifications;
use crate::plugin::Plugin;
use crate::services::audio_session::{self, AudioSessionConfigurator};
use crate::services::now_playing::NowPlayingPublisher;
use crate::services::rate::Admission;
use crate::signal::{Envelope, Signal, SignalSource};
use crate::states::{reject_seek, InitController, StateController, Transition};
use crate::timer::ThreadTimer;
use aria_core::{
    Media, MediaMetadata, MediaTime, PlaybackRate, PlaybackState, UnavailableActionReason,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, error, info, info_span, Span};
use uuid::Uuid;

/// Upper bound on transitions chained from a single command or signal
const MAX_CHAINED_TRANSITIONS: usize = 32;

/// Options of [`Session::load`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadOptions {
    /// Start playing once the item is loaded
    pub auto_play: bool,

    /// Initial position, bounded like any other seek
    pub position: Option<MediaTime>,
}

impl LoadOptions {
    /// Load and start playing
    pub fn auto_play() -> Self {
        Self {
            auto_play: true,
            position: None,
        }
    }

    #[must_use]
    pub fn at(mut self, position: MediaTime) -> Self {
        self.position = Some(position);
        self
    }
}

/// Where to seek
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Absolute media time
    Time(MediaTime),
    /// Absolute position in seconds, converted with the preferred timescale
    Seconds(f64),
    /// Relative to the current time, in seconds
    Offset(f64),
    /// Fraction of the item duration (`0.5` is the middle)
    Percentage(f64),
}

/// Commands that other threads can post through a [`SessionHandle`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Load { media: Media, options: LoadOptions },
    Play,
    Pause,
    Stop,
    SeekTo(MediaTime),
    SeekOffset(f64),
    SeekPercentage(f64),
    SetRate(PlaybackRate),
    Step(i32),
}

/// Cloneable, `Send` handle posting commands into a session's mailbox
///
/// Commands run when the owner thread next pumps the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Sender<Envelope>,
}

impl SessionHandle {
    /// Post a command; fails once the session has been dropped
    pub fn send(&self, command: SessionCommand) -> Result<()> {
        self.tx
            .send(Envelope::Command(command))
            .map_err(|_| SessionError::Disconnected)
    }
}

/// Builder for a [`Session`]
pub struct SessionBuilder {
    engine: Box<dyn PlaybackEngine>,
    config: Configuration,
    plugins: Vec<Box<dyn Plugin>>,
    delegate: Option<Box<dyn SessionDelegate>>,
    notifications: Option<Box<dyn SignalSource>>,
    timer: Option<Box<dyn SignalSource>>,
    now_playing: Option<Box<dyn NowPlayingPublisher>>,
    audio_session: Option<Box<dyn AudioSessionConfigurator>>,
    span: Option<Span>,
}

impl SessionBuilder {
    pub fn new(engine: impl PlaybackEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
            config: Configuration::default(),
            plugins: Vec::new(),
            delegate: None,
            notifications: None,
            timer: None,
            now_playing: None,
            audio_session: None,
            span: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    #[must_use]
    pub fn delegate(mut self, delegate: impl SessionDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    /// Route-change and interruption source (default: never fires)
    #[must_use]
    pub fn notifications(mut self, source: impl SignalSource + 'static) -> Self {
        self.notifications = Some(Box::new(source));
        self
    }

    /// Tick source for buffer polling (default: [`ThreadTimer`])
    #[must_use]
    pub fn timer(mut self, timer: impl SignalSource + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    #[must_use]
    pub fn now_playing(mut self, publisher: impl NowPlayingPublisher + 'static) -> Self {
        self.now_playing = Some(Box::new(publisher));
        self
    }

    #[must_use]
    pub fn audio_session(mut self, configurator: impl AudioSessionConfigurator + 'static) -> Self {
        self.audio_session = Some(Box::new(configurator));
        self
    }

    /// Span every session entry point runs in
    ///
    /// Defaults to `info_span!("session", id = <uuid v4>)`.
    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Validate the configuration, apply the audio session policy and
    /// install the initial controller
    pub fn build(self) -> Result<Session> {
        self.config.validate()?;

        let span = self
            .span
            .unwrap_or_else(|| info_span!("session", id = %Uuid::new_v4()));
        let entered = span.enter();

        if let Some(mut configurator) = self.audio_session {
            audio_session::apply(configurator.as_mut(), &self.config.audio_session);
        }

        let (tx, inbox) = unbounded();
        let mut ctx = SessionContext::new(
            self.engine,
            self.notifications
                .unwrap_or_else(|| Box::new(NullNotifications)),
            self.timer.unwrap_or_else(|| Box::new(ThreadTimer::new())),
            self.config,
            tx.clone(),
        );
        ctx.plugins = self.plugins;
        ctx.delegate = self.delegate;
        ctx.now_playing = self.now_playing;

        let mut controller: Box<dyn StateController> = Box::new(InitController::new());
        controller.enter(&mut ctx);
        info!(target: "aria::state", "session created");

        drop(entered);
        Ok(Session {
            ctx,
            controller,
            inbox,
            outbox: tx,
            span,
        })
    }
}

/// One playback lifecycle
///
/// # Example
///
/// ```rust,ignore
/// let mut session = SessionBuilder::new(engine).delegate(delegate).build()?;
/// session.load(media, LoadOptions::auto_play());
/// loop {
///     session.pump_timeout(Duration::from_millis(100));
/// }
/// ```
pub struct Session {
    pub(crate) ctx: SessionContext,
    pub(crate) controller: Box<dyn StateController>,
    inbox: Receiver<Envelope>,
    outbox: Sender<Envelope>,
    span: Span,
}

impl Session {
    pub fn builder(engine: impl PlaybackEngine + 'static) -> SessionBuilder {
        SessionBuilder::new(engine)
    }

    // ===== Commands =====

    /// Replace the current media and start loading it
    pub fn load(&mut self, media: Media, options: LoadOptions) {
        let span = self.span.clone();
        let _enter = span.enter();
        info!(
            target: "aria::state",
            url = %media.url,
            media_type = %media.media_type,
            auto_play = options.auto_play,
            "load"
        );

        let previous = self.ctx.media.replace(media);
        self.ctx.last_known_time = None;
        self.ctx.asset_metadata = None;
        if let Some(media) = self.ctx.media.as_ref() {
            for plugin in &mut self.ctx.plugins {
                plugin.did_change(media, previous.as_ref());
            }
        }

        let transition = self
            .controller
            .load(&mut self.ctx, options.auto_play, options.position);
        self.apply(transition);

        if let (Some(delegate), Some(media)) =
            (self.ctx.delegate.as_deref_mut(), self.ctx.media.as_ref())
        {
            delegate.did_current_media_change(media);
        }
    }

    pub fn play(&mut self) {
        self.command("play", |controller, ctx| controller.play(ctx));
    }

    pub fn pause(&mut self) {
        self.command("pause", |controller, ctx| controller.pause(ctx));
    }

    pub fn stop(&mut self) {
        self.command("stop", |controller, ctx| controller.stop(ctx));
    }

    /// Step `count` frames; only honored while loaded, paused, stopped or
    /// waiting, and only in directions the item supports
    pub fn step(&mut self, count: i32) {
        self.command("step", |controller, ctx| {
            controller.step(ctx, count);
            None
        });
    }

    /// Seek without a completion
    pub fn seek(&mut self, target: SeekTarget) {
        self.seek_with(target, None);
    }

    /// Seek and get told whether the engine finished it
    ///
    /// Refusals complete with `false` immediately; accepted seeks complete
    /// during a later [`pump`](Self::pump).
    pub fn seek_with_completion(
        &mut self,
        target: SeekTarget,
        completion: impl FnOnce(bool) + 'static,
    ) {
        self.seek_with(target, Some(Box::new(completion)));
    }

    pub fn seek_to(&mut self, seconds: f64) {
        self.seek(SeekTarget::Seconds(seconds));
    }

    pub fn seek_offset(&mut self, offset: f64) {
        self.seek(SeekTarget::Offset(offset));
    }

    pub fn seek_percentage(&mut self, percentage: f64) {
        self.seek(SeekTarget::Percentage(percentage));
    }

    fn seek_with(&mut self, target: SeekTarget, completion: Option<SeekCompletion>) {
        let span = self.span.clone();
        let _enter = span.enter();
        debug!(target: "aria::state", ?target, state = %self.controller.state(), "seek");

        if !self.ctx.engine.has_current_item() {
            reject_seek(&mut self.ctx, UnavailableActionReason::LoadMediaFirst, completion);
            return;
        }

        let Some(time) = self.seek_time(target) else {
            reject_seek(
                &mut self.ctx,
                UnavailableActionReason::SeekPositionNotAvailable,
                completion,
            );
            return;
        };

        match self.ctx.bounded(time) {
            Ok(bounded) => {
                let transition = self.controller.seek(&mut self.ctx, bounded, completion);
                self.apply(transition);
            }
            Err(reason) => {
                reject_seek(&mut self.ctx, reason, completion);
            }
        }
    }

    fn seek_time(&self, target: SeekTarget) -> Option<MediaTime> {
        let config = &self.ctx.config;
        match target {
            SeekTarget::Time(time) => Some(time),
            SeekTarget::Seconds(seconds) => Some(config.media_time(seconds)),
            SeekTarget::Offset(offset) => {
                let current = self.ctx.engine.current_time().seconds_or_zero();
                Some(config.media_time(current + offset))
            }
            SeekTarget::Percentage(percentage) => {
                let duration = self.ctx.engine.duration().seconds()?;
                Some(config.media_time(duration * percentage))
            }
        }
    }

    /// Request a playback rate
    ///
    /// Zero pauses. A rate the current item cannot play falls back to normal
    /// speed in every state. The admitted rate reaches the engine right away
    /// while buffering, playing or waiting for network, and on the next entry
    /// into one of those states otherwise.
    pub fn set_rate(&mut self, rate: PlaybackRate) {
        if rate.value() == 0.0 {
            self.pause();
            return;
        }

        let span = self.span.clone();
        let _enter = span.enter();
        debug!(target: "aria::service", %rate, state = %self.controller.state(), "set rate");

        self.ctx.rate = rate;
        if self.controller.state().applies_rate() {
            if self.ctx.apply_rate() {
                self.ctx.notify_rate(rate);
            }
        } else if !self.ctx.engine.has_current_item()
            || self.ctx.admit_rate() == Admission::Allowed
        {
            self.ctx.notify_rate(rate);
        }
    }

    // ===== Mailbox =====

    /// Handle for posting commands from other threads
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.outbox.clone(),
        }
    }

    /// Process everything queued in the mailbox; returns how many envelopes ran
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(envelope) = self.inbox.try_recv() {
            self.dispatch(envelope);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for the first envelope, then drain the mailbox
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.inbox.recv_timeout(timeout) {
            Ok(envelope) => {
                self.dispatch(envelope);
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    fn dispatch(&mut self, envelope: Envelope) {
        let span = self.span.clone();
        let _enter = span.enter();

        match envelope {
            Envelope::Command(command) => self.execute(command),
            Envelope::Signal {
                token,
                signal: Signal::SeekCompleted { finished },
            } => {
                if !self.ctx.resolve_seek(token, finished) {
                    debug!(target: "aria::lifecycle", %token, "stale seek completion");
                }
            }
            Envelope::Signal { token, signal } => {
                if !self.ctx.observers.is_live(token) {
                    debug!(
                        target: "aria::lifecycle",
                        %token,
                        ?signal,
                        "dropping signal for retired observer"
                    );
                    return;
                }
                let transition = self.controller.on_signal(&mut self.ctx, token, &signal);
                self.apply(transition);
            }
        }
    }

    fn execute(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Load { media, options } => self.load(media, options),
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Stop => self.stop(),
            SessionCommand::SeekTo(time) => self.seek(SeekTarget::Time(time)),
            SessionCommand::SeekOffset(offset) => self.seek_offset(offset),
            SessionCommand::SeekPercentage(percentage) => self.seek_percentage(percentage),
            SessionCommand::SetRate(rate) => self.set_rate(rate),
            SessionCommand::Step(count) => self.step(count),
        }
    }

    // ===== Transitions =====

    fn command(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut dyn StateController, &mut SessionContext) -> Option<Transition>,
    ) {
        let span = self.span.clone();
        let _enter = span.enter();
        debug!(target: "aria::state", command = name, state = %self.controller.state(), "command");

        let transition = f(self.controller.as_mut(), &mut self.ctx);
        self.apply(transition);
    }

    fn apply(&mut self, transition: Option<Transition>) {
        let mut next = transition;
        let mut hops = 0;
        while let Some(transition) = next.take() {
            hops += 1;
            if hops > MAX_CHAINED_TRANSITIONS {
                error!(
                    target: "aria::state",
                    state = %self.controller.state(),
                    "transition loop detected, stopping"
                );
                break;
            }
            next = self.change(transition);
        }
    }

    /// Tear down the active controller, install the next one and run its
    /// entry actions; returns a transition requested during entry
    fn change(&mut self, transition: Transition) -> Option<Transition> {
        let from = self.controller.state();
        let to = transition.state();

        self.controller.teardown(&mut self.ctx);
        self.controller = transition.into_controller(&self.ctx.config);
        info!(target: "aria::state", %from, %to, "state changed");

        self.ctx.delegate(|d| d.did_state_change(to));
        let next = self.controller.enter(&mut self.ctx);
        if next.is_none() && to.applies_rate() {
            self.ctx.apply_rate();
        }
        next
    }

    // ===== Accessors =====

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn current_media(&self) -> Option<&Media> {
        self.ctx.media.as_ref()
    }

    pub fn current_time(&self) -> MediaTime {
        self.ctx.engine.current_time()
    }

    pub fn duration(&self) -> MediaTime {
        self.ctx.engine.duration()
    }

    /// Last requested rate, after any fallback
    pub fn rate(&self) -> PlaybackRate {
        self.ctx.rate
    }

    /// Common metadata of the loaded item
    pub fn asset_metadata(&self) -> Option<&MediaMetadata> {
        self.ctx.asset_metadata.as_ref()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.ctx.config
    }

    /// Tokens that may still deliver signals
    pub fn live_observer_count(&self) -> usize {
        self.ctx.observers.live_count()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.controller.teardown(&mut self.ctx);
        if let Some(publisher) = self.ctx.now_playing.as_deref_mut() {
            publisher.clear();
        }
        debug!(target: "aria::lifecycle", "session dropped");
    }
}
