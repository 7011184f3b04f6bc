//! Session context - everything a state controller may touch
//!
//! The session owns exactly one `SessionContext` and lends it mutably to the
//! active controller for the duration of a command or a mailbox signal.
//! Controllers never hold a reference back to the session.

use crate::config::Configuration;
use crate::delegate::SessionDelegate;
use crate::engine::{ItemStatus, PlaybackEngine};
use crate::observers::ObserverRegistry;
use crate::plugin::Plugin;
use crate::services::now_playing::NowPlayingPublisher;
use crate::services::rate::{admit, Admission};
use crate::services::seek::SeekBounds;
use crate::signal::{
    Envelope, ObserverToken, Origin, SeekTicket, Signal, SignalSink, SignalSource, Topic,
};
use aria_core::{
    DynamicMetadata, Media, MediaMetadata, MediaTime, PlaybackRate, StaticMetadata,
    UnavailableActionReason,
};
use crossbeam_channel::Sender;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Called once a seek settles; `true` if it finished
pub type SeekCompletion = Box<dyn FnOnce(bool)>;

pub(crate) struct SessionContext {
    /// Decoder/renderer doing the actual media work
    pub engine: Box<dyn PlaybackEngine>,

    /// Route-change and interruption source
    pub notifications: Box<dyn SignalSource>,

    /// Wall-clock ticks for buffer polling
    pub timer: Box<dyn SignalSource>,

    pub config: Configuration,
    pub plugins: Vec<Box<dyn Plugin>>,
    pub delegate: Option<Box<dyn SessionDelegate>>,
    pub now_playing: Option<Box<dyn NowPlayingPublisher>>,

    /// Media of the last `load`
    pub media: Option<Media>,

    /// Common metadata captured when the item loaded
    pub asset_metadata: Option<MediaMetadata>,

    /// Last requested rate; applied on entry into rate-applying states
    pub rate: PlaybackRate,

    /// Last numeric time reported to the delegate
    pub last_known_time: Option<MediaTime>,

    pub observers: ObserverRegistry,
    pending_seeks: HashMap<ObserverToken, SeekCompletion>,
    mailbox: Sender<Envelope>,
}

impl SessionContext {
    pub fn new(
        engine: Box<dyn PlaybackEngine>,
        notifications: Box<dyn SignalSource>,
        timer: Box<dyn SignalSource>,
        config: Configuration,
        mailbox: Sender<Envelope>,
    ) -> Self {
        Self {
            engine,
            notifications,
            timer,
            config,
            plugins: Vec::new(),
            delegate: None,
            now_playing: None,
            media: None,
            asset_metadata: None,
            rate: PlaybackRate::Normal,
            last_known_time: None,
            observers: ObserverRegistry::new(),
            pending_seeks: HashMap::new(),
            mailbox,
        }
    }

    // ===== Mailbox =====

    pub fn sink(&self, token: ObserverToken) -> SignalSink {
        SignalSink::new(token, self.mailbox.clone())
    }

    /// Route a subscription to the source serving `topic`
    pub fn subscribe(&mut self, topic: Topic, token: ObserverToken) {
        let sink = self.sink(token);
        match topic.origin() {
            Origin::Engine => self.engine.subscribe(topic, sink),
            Origin::Notifications => self.notifications.subscribe(topic, sink),
            Origin::Timer => self.timer.subscribe(topic, sink),
        }
    }

    pub fn unsubscribe(&mut self, origin: Origin, token: ObserverToken) {
        match origin {
            Origin::Engine => self.engine.unsubscribe(token),
            Origin::Notifications => self.notifications.unsubscribe(token),
            Origin::Timer => self.timer.unsubscribe(token),
        }
    }

    /// Queue `signal` for the controller owning `token`
    pub fn post(&self, token: ObserverToken, signal: Signal) {
        if !self.sink(token).emit(signal) {
            debug!(target: "aria::lifecycle", %token, "mailbox closed, signal dropped");
        }
    }

    // ===== Notifications =====

    /// Report a command refused by the active state
    pub fn unavailable(&mut self, reason: UnavailableActionReason) {
        warn!(target: "aria::unavailable", %reason, "command unavailable");
        self.delegate(|d| d.unavailable_action(reason));
    }

    pub fn delegate(&mut self, f: impl FnOnce(&mut dyn SessionDelegate)) {
        if let Some(delegate) = self.delegate.as_deref_mut() {
            f(delegate);
        }
    }

    /// Run `f` for every plugin with the current media; skipped without media
    pub fn plugins(&mut self, mut f: impl FnMut(&mut dyn Plugin, &Media)) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        for plugin in &mut self.plugins {
            f(plugin.as_mut(), media);
        }
    }

    /// Periodic position report
    pub fn report_time(&mut self, time: MediaTime) {
        if time.is_numeric() {
            self.last_known_time = Some(time);
        }
        self.delegate(|d| d.did_current_time_change(time));
        self.publish_playback_info();
    }

    pub fn notify_rate(&mut self, rate: PlaybackRate) {
        self.delegate(|d| d.did_playback_rate_change(rate));
    }

    // ===== Now playing =====

    fn now_playing(&mut self, f: impl FnOnce(&mut dyn NowPlayingPublisher)) {
        if !self.config.now_playing_enabled {
            return;
        }
        if let Some(publisher) = self.now_playing.as_deref_mut() {
            f(publisher);
        }
    }

    /// Static metadata of the current media, falling back to what the asset reported
    pub fn static_metadata(&self) -> Option<StaticMetadata> {
        let media = self.media.as_ref()?;
        if let Some(metadata) = &media.static_metadata {
            return Some(metadata.clone());
        }

        let asset = self.asset_metadata.as_ref();
        Some(StaticMetadata {
            asset_url: media.url.clone(),
            is_live_stream: media.media_type.is_live(),
            title: asset
                .and_then(MediaMetadata::title)
                .map_or_else(|| media.url.clone(), str::to_owned),
            artist: asset.and_then(MediaMetadata::artist).map(str::to_owned),
            artwork: asset.and_then(MediaMetadata::artwork).map(<[u8]>::to_vec),
            album_title: asset.and_then(MediaMetadata::album_name).map(str::to_owned),
            ..StaticMetadata::default()
        })
    }

    pub fn publish_metadata(&mut self) {
        let Some(metadata) = self.static_metadata() else {
            return;
        };
        self.now_playing(|p| p.set_now_playing_metadata(&metadata));
    }

    pub fn publish_playback_info(&mut self) {
        let info = DynamicMetadata {
            rate: self.engine.rate(),
            position: self.engine.current_time().seconds_or_zero(),
            duration: self.engine.duration().seconds(),
        };
        self.now_playing(|p| p.set_now_playing_playback_info(&info));
    }

    // ===== Engine actions =====

    /// Validate an absolute target against the current item
    pub fn bounded(&self, time: MediaTime) -> Result<MediaTime, UnavailableActionReason> {
        SeekBounds::capture(self.engine.as_ref()).bound(time)
    }

    /// Issue an engine seek; `completion` runs when the engine settles it
    pub fn seek_engine(&mut self, time: MediaTime, completion: Option<SeekCompletion>) {
        let token = self.observers.allocate();
        let completion: SeekCompletion = match completion {
            Some(completion) => completion,
            None => Box::new(move |finished| {
                if !finished {
                    debug!(target: "aria::service", %time, "seek did not complete");
                }
            }),
        };
        self.pending_seeks.insert(token, completion);

        debug!(target: "aria::service", %time, %token, "seeking");
        self.engine.cancel_pending_seeks();
        let ticket = SeekTicket::new(self.sink(token));
        self.engine.seek(time, ticket);
    }

    /// Run the completion registered under `token`; `false` if there is none
    pub fn resolve_seek(&mut self, token: ObserverToken, finished: bool) -> bool {
        let Some(completion) = self.pending_seeks.remove(&token) else {
            return false;
        };
        self.observers.retire(token);
        completion(finished);
        true
    }

    /// Step frames when the item supports it in that direction
    pub fn step_engine(&mut self, count: i32) {
        let capabilities = self.engine.capabilities();
        let allowed = (count > 0 && capabilities.can_step_forward)
            || (count < 0 && capabilities.can_step_backward);
        if allowed {
            self.engine.step(count);
        } else {
            debug!(target: "aria::service", count, "step not supported");
        }
    }

    /// Abort an in-flight item preparation and drop the half-loaded item
    pub fn cancel_loading(&mut self) {
        self.engine.cancel_item_preparation();
        self.engine.cancel_pending_seeks();
        self.engine.replace_current_item(None);
    }

    /// Admit the stored rate against the current item without touching the
    /// engine; a denied rate falls back to normal speed and is reported
    pub fn admit_rate(&mut self) -> Admission {
        let admission = admit(self.rate, &self.engine.capabilities());
        if let Admission::Denied(capability) = admission {
            info!(
                target: "aria::service",
                rate = %self.rate,
                ?capability,
                "rate not playable, falling back to normal"
            );
            self.rate = PlaybackRate::Normal;
            self.notify_rate(PlaybackRate::Normal);
        }
        admission
    }

    /// Admit and apply the stored rate; on denial fall back to normal speed
    pub fn apply_rate(&mut self) -> bool {
        match self.admit_rate() {
            Admission::Allowed => {
                self.engine.set_rate(self.rate.value());
                true
            }
            Admission::Denied(_) => {
                self.engine.set_rate(PlaybackRate::Normal.value());
                false
            }
            Admission::Pause => false,
        }
    }

    pub fn has_ready_item(&self) -> bool {
        self.engine.has_current_item()
            && self.engine.item_status() == ItemStatus::ReadyToPlay
    }
}
