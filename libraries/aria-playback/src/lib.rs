//! Aria Playback - session state machine
//!
//! Coordinates one media-playback session (load, buffer, play, pause,
//! stop, seek, rate changes, stall recovery) on top of an engine that does
//! the actual decoding and rendering asynchronously.
//!
//! This crate provides:
//! - `Session`: single owner of playback state, one active state controller
//! - Nine state controllers (initialization through failed)
//! - Seek bounding, buffer readiness and rate admission services
//! - A mailbox that serializes engine, notification and timer signals
//! - Remote command handling and "now playing" publishing
//! - Layered configuration (defaults, file, `ARIA_*` environment)
//!
//! # Architecture
//!
//! `aria-playback` has no platform code. The engine, the route/interruption
//! notification source, the timer, the now-playing surface and the audio
//! session are injected through traits. Collaborators may call back from any
//! thread; they only ever post into the session mailbox, and nothing touches
//! state until the owner thread pumps the session.
//!
//! ```text
//! commands ──> Session ──> active StateController ──> Transition
//!                 ^                                       │
//!                 │ pump()                                v
//!              mailbox <── engine / notifications / timer (SignalSink)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use aria_core::{Media, MediaTime, MediaType, TimeRange};
//! use aria_playback::{
//!     BufferStatus, ChannelDelegate, EngineCapabilities, ItemId, ItemStatus, LoadOptions,
//!     ObserverToken, PlaybackEngine, SeekTicket, Session, SignalSink, SignalSource,
//!     TimeControlStatus, Topic, WaitingReason,
//! };
//! use std::time::Duration;
//!
//! struct MyEngine;
//!
//! impl SignalSource for MyEngine {
//!     fn subscribe(&mut self, _topic: Topic, _sink: SignalSink) {}
//!     fn unsubscribe(&mut self, _token: ObserverToken) {}
//! }
//!
//! impl PlaybackEngine for MyEngine {
//!     fn prepare_item(&mut self, _media: &Media, _keys: &[String], _sink: SignalSink) {}
//!     fn cancel_item_preparation(&mut self) {}
//!     fn replace_current_item(&mut self, _item: Option<ItemId>) {}
//!     fn has_current_item(&self) -> bool { false }
//!     fn item_status(&self) -> ItemStatus { ItemStatus::Unknown }
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn rate(&self) -> f32 { 0.0 }
//!     fn set_rate(&mut self, _rate: f32) {}
//!     fn seek(&mut self, _time: MediaTime, ticket: SeekTicket) { ticket.complete(true) }
//!     fn cancel_pending_seeks(&mut self) {}
//!     fn step(&mut self, _count: i32) {}
//!     fn current_time(&self) -> MediaTime { MediaTime::ZERO }
//!     fn duration(&self) -> MediaTime { MediaTime::Invalid }
//!     fn seekable_ranges(&self) -> Vec<TimeRange> { Vec::new() }
//!     fn loaded_ranges(&self) -> Vec<TimeRange> { Vec::new() }
//!     fn capabilities(&self) -> EngineCapabilities { EngineCapabilities::default() }
//!     fn buffer_status(&self) -> BufferStatus { BufferStatus::default() }
//!     fn time_control_status(&self) -> TimeControlStatus { TimeControlStatus::Paused }
//!     fn reason_for_waiting_to_play(&self) -> Option<WaitingReason> { None }
//! }
//!
//! let (delegate, events) = ChannelDelegate::new();
//! let mut session = Session::builder(MyEngine).delegate(delegate).build()?;
//!
//! session.load(
//!     Media::new("https://cdn.example.com/live.m3u8", MediaType::Stream { is_live: true }),
//!     LoadOptions::auto_play(),
//! );
//!
//! // Owner thread loop
//! loop {
//!     session.pump_timeout(Duration::from_millis(100));
//!     for event in events.try_iter() {
//!         println!("{event:?}");
//!     }
//! }
//! # Ok::<(), aria_playback::SessionError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
mod context;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod events;
pub mod notifications;
mod observers;
pub mod plugin;
pub mod services;
mod session;
pub mod signal;
mod states;
pub mod timer;

// Public exports
pub use config::{
    AudioSessionCategory, AudioSessionMode, AudioSessionOption, AudioSessionPolicy, Configuration,
};
pub use context::SeekCompletion;
pub use delegate::SessionDelegate;
pub use engine::{
    BufferStatus, EngineCapabilities, ItemId, ItemStatus, PlaybackEngine, PlaybackProgress,
    TimeControlStatus, WaitingReason,
};
pub use error::{Result, SessionError};
pub use events::{ChannelDelegate, SessionEvent};
pub use notifications::{Interruption, NullNotifications, RouteChangeReason};
pub use plugin::Plugin;
pub use services::audio_session::AudioSessionConfigurator;
pub use services::now_playing::NowPlayingPublisher;
pub use services::rate::{admit, Admission, RateCapability};
pub use services::remote::{RemoteCommand, RemoteCommandStatus, SeekPhase};
pub use services::seek::SeekBounds;
pub use session::{LoadOptions, SeekTarget, Session, SessionBuilder, SessionCommand, SessionHandle};
pub use signal::{
    Envelope, ObserverToken, Origin, SeekTicket, Signal, SignalSink, SignalSource, Topic,
};
pub use timer::ThreadTimer;
