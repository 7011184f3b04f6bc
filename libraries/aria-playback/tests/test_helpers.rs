//! Scriptable collaborators for driving a session from tests
//!
//! Every fake is a cheap cloneable handle over shared state: one clone is
//! moved into the session, the test keeps the other to script signals and
//! inspect calls.

use aria_core::{
    DynamicMetadata, Media, MediaTime, MediaType, MetadataItem, PlaybackState, PlayerError,
    StaticMetadata, TimeRange, UnavailableActionReason,
};
use aria_playback::{
    AudioSessionConfigurator, AudioSessionPolicy, BufferStatus, ChannelDelegate, Configuration,
    EngineCapabilities, Interruption, ItemId, ItemStatus, LoadOptions, NowPlayingPublisher,
    ObserverToken, PlaybackEngine, PlaybackProgress, Plugin, RouteChangeReason, SeekTicket,
    Session, SessionEvent, Signal, SignalSink, SignalSource, TimeControlStatus, Topic,
    WaitingReason,
};
use crossbeam_channel::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Seconds at the default preferred timescale
pub fn secs(value: f64) -> MediaTime {
    MediaTime::from_seconds(value, MediaTime::DEFAULT_TIMESCALE)
}

pub fn clip() -> Media {
    Media::new("https://cdn.example.com/clip.mp4", MediaType::Clip)
}

pub fn live_stream() -> Media {
    Media::new(
        "https://cdn.example.com/live.m3u8",
        MediaType::Stream { is_live: true },
    )
}

// ===== Engine =====

/// Engine calls, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Prepare(String),
    CancelPreparation,
    Replace(Option<ItemId>),
    Play,
    Pause,
    SetRate(f32),
    Seek(MediaTime),
    CancelSeeks,
    Step(i32),
}

pub struct EngineState {
    pub calls: Vec<Call>,
    pub subscriptions: Vec<(Topic, SignalSink)>,
    pub retired: Vec<(Topic, SignalSink)>,
    pub preparation: Option<SignalSink>,
    pub item: Option<ItemId>,
    pub item_status: ItemStatus,
    pub rate: f32,
    pub current_time: MediaTime,
    pub duration: MediaTime,
    pub seekable: Vec<TimeRange>,
    pub capabilities: EngineCapabilities,
    pub buffer: BufferStatus,
    pub time_control: TimeControlStatus,
    pub waiting_reason: Option<WaitingReason>,
    pub metadata: Vec<MetadataItem>,
    pub complete_seeks: bool,
    pub held_seeks: Vec<SeekTicket>,
    next_item: u64,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            subscriptions: Vec::new(),
            retired: Vec::new(),
            preparation: None,
            item: None,
            item_status: ItemStatus::Unknown,
            rate: 0.0,
            current_time: MediaTime::Invalid,
            duration: MediaTime::Invalid,
            seekable: Vec::new(),
            capabilities: EngineCapabilities::default(),
            buffer: BufferStatus::default(),
            time_control: TimeControlStatus::Paused,
            waiting_reason: None,
            metadata: Vec::new(),
            complete_seeks: true,
            held_seeks: Vec::new(),
            next_item: 0,
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<EngineState>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn seeks(&self) -> Vec<MediaTime> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Seek(time) => Some(*time),
                _ => None,
            })
            .collect()
    }

    /// Live subscriptions of the given kind
    pub fn subscribers(&self, topic: Topic) -> usize {
        self.lock()
            .subscriptions
            .iter()
            .filter(|(t, _)| t.same_kind(&topic))
            .count()
    }

    /// Whether a preparation is waiting to be finished
    pub fn preparing(&self) -> bool {
        self.lock().preparation.is_some()
    }

    /// Finish the pending preparation with a ready item of `duration`
    pub fn finish_loading(&self, duration: MediaTime) -> bool {
        let (sink, item) = {
            let mut state = self.lock();
            let Some(sink) = state.preparation.take() else {
                return false;
            };
            state.next_item += 1;
            state.duration = duration;
            state.current_time = MediaTime::ZERO;
            state.item_status = ItemStatus::ReadyToPlay;
            (sink, ItemId(state.next_item))
        };
        sink.emit(Signal::ItemPrepared(Ok(item)))
    }

    /// Finish the pending preparation with an item still being evaluated
    pub fn finish_loading_pending(&self, duration: MediaTime) -> bool {
        let (sink, item) = {
            let mut state = self.lock();
            let Some(sink) = state.preparation.take() else {
                return false;
            };
            state.next_item += 1;
            state.duration = duration;
            state.current_time = MediaTime::ZERO;
            state.item_status = ItemStatus::Unknown;
            (sink, ItemId(state.next_item))
        };
        sink.emit(Signal::ItemPrepared(Ok(item)))
    }

    pub fn fail_loading(&self, error: PlayerError) -> bool {
        let sink = self.lock().preparation.take();
        sink.is_some_and(|sink| sink.emit(Signal::ItemPrepared(Err(error))))
    }

    pub fn set_item_status(&self, status: ItemStatus) -> usize {
        self.lock().item_status = status;
        self.emit(Topic::ItemStatus, Signal::ItemStatus(status))
    }

    pub fn set_buffer(&self, status: BufferStatus) -> usize {
        self.lock().buffer = status;
        self.emit(Topic::BufferStatus, Signal::BufferStatus(status))
    }

    pub fn buffer_ready(&self) -> usize {
        self.set_buffer(BufferStatus {
            likely_to_keep_up: true,
            full: false,
            empty: false,
        })
    }

    pub fn buffer_empty(&self) -> usize {
        self.set_buffer(BufferStatus {
            likely_to_keep_up: false,
            full: false,
            empty: true,
        })
    }

    pub fn set_time_control(&self, status: TimeControlStatus) -> usize {
        self.lock().time_control = status;
        self.emit(Topic::TimeControlStatus, Signal::TimeControlStatus(status))
    }

    pub fn play_to_end(&self) -> usize {
        {
            let mut state = self.lock();
            state.current_time = state.duration;
        }
        self.emit(
            Topic::PlaybackProgress,
            Signal::PlaybackProgress(PlaybackProgress::PlayedToEnd),
        )
    }

    pub fn stall(&self) -> usize {
        self.emit(
            Topic::PlaybackProgress,
            Signal::PlaybackProgress(PlaybackProgress::Stalled),
        )
    }

    pub fn tick_time(&self, time: MediaTime) -> usize {
        self.lock().current_time = time;
        self.emit(
            Topic::PeriodicTime {
                interval: std::time::Duration::ZERO,
            },
            Signal::PeriodicTime(time),
        )
    }

    pub fn set_current_time(&self, time: MediaTime) {
        self.lock().current_time = time;
    }

    pub fn set_duration(&self, duration: MediaTime) {
        self.lock().duration = duration;
    }

    pub fn set_seekable(&self, ranges: Vec<TimeRange>) {
        self.lock().seekable = ranges;
    }

    pub fn set_capabilities(&self, capabilities: EngineCapabilities) {
        self.lock().capabilities = capabilities;
    }

    pub fn set_waiting_reason(&self, reason: Option<WaitingReason>) {
        self.lock().waiting_reason = reason;
    }

    pub fn set_metadata(&self, items: Vec<MetadataItem>) {
        self.lock().metadata = items;
    }

    /// Hold seek tickets instead of completing them
    pub fn hold_seeks(&self) {
        self.lock().complete_seeks = false;
    }

    /// Complete every held seek ticket
    pub fn release_seeks(&self, finished: bool) -> usize {
        let held = std::mem::take(&mut self.lock().held_seeks);
        let count = held.len();
        for ticket in held {
            ticket.complete(finished);
        }
        count
    }

    /// Send a signal to every live subscriber of the topic kind
    pub fn emit(&self, topic: Topic, signal: Signal) -> usize {
        let sinks: Vec<SignalSink> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|(t, _)| t.same_kind(&topic))
            .map(|(_, sink)| sink.clone())
            .collect();
        sinks.iter().filter(|sink| sink.emit(signal.clone())).count()
    }

    /// Send a signal through subscriptions that were already cancelled
    pub fn emit_to_retired(&self, topic: Topic, signal: Signal) -> usize {
        let sinks: Vec<SignalSink> = self
            .lock()
            .retired
            .iter()
            .filter(|(t, _)| t.same_kind(&topic))
            .map(|(_, sink)| sink.clone())
            .collect();
        sinks.iter().filter(|sink| sink.emit(signal.clone())).count()
    }
}

impl SignalSource for FakeEngine {
    fn subscribe(&mut self, topic: Topic, sink: SignalSink) {
        self.lock().subscriptions.push((topic, sink));
    }

    fn unsubscribe(&mut self, token: ObserverToken) {
        let mut state = self.lock();
        if let Some(index) = state
            .subscriptions
            .iter()
            .position(|(_, sink)| sink.token() == token)
        {
            let entry = state.subscriptions.remove(index);
            state.retired.push(entry);
        }
    }
}

impl PlaybackEngine for FakeEngine {
    fn prepare_item(&mut self, media: &Media, _asset_keys: &[String], sink: SignalSink) {
        let mut state = self.lock();
        state.calls.push(Call::Prepare(media.url.clone()));
        state.preparation = Some(sink);
    }

    fn cancel_item_preparation(&mut self) {
        let mut state = self.lock();
        state.calls.push(Call::CancelPreparation);
        state.preparation = None;
    }

    fn replace_current_item(&mut self, item: Option<ItemId>) {
        let mut state = self.lock();
        state.calls.push(Call::Replace(item));
        if item.is_none() {
            state.item_status = ItemStatus::Unknown;
            state.current_time = MediaTime::Invalid;
        }
        state.item = item;
    }

    fn has_current_item(&self) -> bool {
        self.lock().item.is_some()
    }

    fn item_status(&self) -> ItemStatus {
        let state = self.lock();
        if state.item.is_some() {
            state.item_status
        } else {
            ItemStatus::Unknown
        }
    }

    fn play(&mut self) {
        let mut state = self.lock();
        state.calls.push(Call::Play);
        if state.rate == 0.0 {
            state.rate = 1.0;
        }
    }

    fn pause(&mut self) {
        let mut state = self.lock();
        state.calls.push(Call::Pause);
        state.rate = 0.0;
    }

    fn rate(&self) -> f32 {
        self.lock().rate
    }

    fn set_rate(&mut self, rate: f32) {
        let mut state = self.lock();
        state.calls.push(Call::SetRate(rate));
        state.rate = rate;
    }

    fn seek(&mut self, time: MediaTime, ticket: SeekTicket) {
        let complete = {
            let mut state = self.lock();
            state.calls.push(Call::Seek(time));
            state.current_time = time;
            if !state.complete_seeks {
                state.held_seeks.push(ticket);
                return;
            }
            ticket
        };
        complete.complete(true);
    }

    fn cancel_pending_seeks(&mut self) {
        let held = {
            let mut state = self.lock();
            state.calls.push(Call::CancelSeeks);
            std::mem::take(&mut state.held_seeks)
        };
        for ticket in held {
            ticket.complete(false);
        }
    }

    fn step(&mut self, count: i32) {
        self.lock().calls.push(Call::Step(count));
    }

    fn current_time(&self) -> MediaTime {
        self.lock().current_time
    }

    fn duration(&self) -> MediaTime {
        let state = self.lock();
        if state.item.is_some() {
            state.duration
        } else {
            MediaTime::Invalid
        }
    }

    fn seekable_ranges(&self) -> Vec<TimeRange> {
        self.lock().seekable.clone()
    }

    fn loaded_ranges(&self) -> Vec<TimeRange> {
        Vec::new()
    }

    fn capabilities(&self) -> EngineCapabilities {
        self.lock().capabilities
    }

    fn buffer_status(&self) -> BufferStatus {
        self.lock().buffer
    }

    fn time_control_status(&self) -> TimeControlStatus {
        self.lock().time_control
    }

    fn reason_for_waiting_to_play(&self) -> Option<WaitingReason> {
        self.lock().waiting_reason
    }

    fn common_metadata(&self) -> Vec<MetadataItem> {
        self.lock().metadata.clone()
    }
}

// ===== Timer =====

/// Timer that only ticks when told to
#[derive(Clone, Default)]
pub struct ManualTimer {
    sinks: Arc<Mutex<Vec<SignalSink>>>,
}

impl ManualTimer {
    /// Tick every live subscription once
    pub fn fire(&self) -> usize {
        let sinks = self.sinks.lock().unwrap().clone();
        sinks.iter().filter(|sink| sink.emit(Signal::Tick)).count()
    }

    pub fn active(&self) -> usize {
        self.sinks.lock().unwrap().len()
    }
}

impl SignalSource for ManualTimer {
    fn subscribe(&mut self, _topic: Topic, sink: SignalSink) {
        self.sinks.lock().unwrap().push(sink);
    }

    fn unsubscribe(&mut self, token: ObserverToken) {
        self.sinks.lock().unwrap().retain(|sink| sink.token() != token);
    }
}

// ===== Notifications =====

#[derive(Clone, Default)]
pub struct FakeNotifications {
    subscriptions: Arc<Mutex<Vec<(Topic, SignalSink)>>>,
}

impl FakeNotifications {
    pub fn route_change(&self, reason: RouteChangeReason) -> usize {
        self.emit(Topic::RouteChange, Signal::RouteChanged(reason))
    }

    pub fn interruption(&self, interruption: Interruption) -> usize {
        self.emit(Topic::Interruption, Signal::Interruption(interruption))
    }

    pub fn subscribers(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    fn emit(&self, topic: Topic, signal: Signal) -> usize {
        let sinks: Vec<SignalSink> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t.same_kind(&topic))
            .map(|(_, sink)| sink.clone())
            .collect();
        sinks.iter().filter(|sink| sink.emit(signal.clone())).count()
    }
}

impl SignalSource for FakeNotifications {
    fn subscribe(&mut self, topic: Topic, sink: SignalSink) {
        self.subscriptions.lock().unwrap().push((topic, sink));
    }

    fn unsubscribe(&mut self, token: ObserverToken) {
        self.subscriptions
            .lock()
            .unwrap()
            .retain(|(_, sink)| sink.token() != token);
    }
}

// ===== Plugin, now playing, audio session =====

#[derive(Clone, Default)]
pub struct RecordingPlugin {
    hooks: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlugin {
    pub fn hooks(&self) -> Vec<String> {
        self.hooks.lock().unwrap().clone()
    }

    pub fn count(&self, hook: &str) -> usize {
        self.hooks.lock().unwrap().iter().filter(|h| *h == hook).count()
    }

    fn record(&self, hook: &str) {
        self.hooks.lock().unwrap().push(hook.to_string());
    }
}

impl Plugin for RecordingPlugin {
    fn did_init(&mut self) {
        self.record("did_init");
    }

    fn will_start_loading(&mut self, _media: &Media) {
        self.record("will_start_loading");
    }

    fn did_start_loading(&mut self, _media: &Media) {
        self.record("did_start_loading");
    }

    fn did_start_buffering(&mut self, _media: &Media) {
        self.record("did_start_buffering");
    }

    fn did_change(&mut self, _media: &Media, _previous: Option<&Media>) {
        self.record("did_change");
    }

    fn did_load(&mut self, _media: &Media, _duration: MediaTime) {
        self.record("did_load");
    }

    fn will_start_playing(&mut self, _media: &Media) {
        self.record("will_start_playing");
    }

    fn did_start_playing(&mut self, _media: &Media, _at: MediaTime) {
        self.record("did_start_playing");
    }

    fn did_paused(&mut self, _media: &Media, _at: MediaTime) {
        self.record("did_paused");
    }

    fn did_stopped(&mut self, _media: &Media, _at: MediaTime) {
        self.record("did_stopped");
    }

    fn did_start_waiting_for_network(&mut self, _media: &Media) {
        self.record("did_start_waiting_for_network");
    }

    fn did_failed(&mut self, _media: &Media, _error: &PlayerError) {
        self.record("did_failed");
    }

    fn did_play_to_end(&mut self, _media: &Media, _at: MediaTime) {
        self.record("did_play_to_end");
    }
}

#[derive(Clone, Default)]
pub struct RecordingNowPlaying {
    pub metadata: Arc<Mutex<Vec<StaticMetadata>>>,
    pub playback_info: Arc<Mutex<Vec<DynamicMetadata>>>,
    pub cleared: Arc<Mutex<bool>>,
}

impl NowPlayingPublisher for RecordingNowPlaying {
    fn set_now_playing_metadata(&mut self, metadata: &StaticMetadata) {
        self.metadata.lock().unwrap().push(metadata.clone());
    }

    fn set_now_playing_playback_info(&mut self, info: &DynamicMetadata) {
        self.playback_info.lock().unwrap().push(info.clone());
    }

    fn clear(&mut self) {
        *self.cleared.lock().unwrap() = true;
    }
}

#[derive(Clone, Default)]
pub struct RecordingAudioSession {
    pub applied: Arc<Mutex<Vec<String>>>,
}

impl AudioSessionConfigurator for RecordingAudioSession {
    fn set_category(&mut self, policy: &AudioSessionPolicy) {
        self.applied
            .lock()
            .unwrap()
            .push(format!("category {:?} {:?}", policy.category, policy.mode));
    }

    fn activate(&mut self) {
        self.applied.lock().unwrap().push("activate".to_string());
    }
}

// ===== Fixture =====

/// A session wired to fakes, plus the handles to script them
pub struct Fixture {
    pub session: Session,
    pub engine: FakeEngine,
    pub timer: ManualTimer,
    pub notifications: FakeNotifications,
    pub plugin: RecordingPlugin,
    pub now_playing: RecordingNowPlaying,
    pub events: Receiver<SessionEvent>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Configuration) -> Self {
        init_tracing();

        let engine = FakeEngine::new();
        let timer = ManualTimer::default();
        let notifications = FakeNotifications::default();
        let plugin = RecordingPlugin::default();
        let now_playing = RecordingNowPlaying::default();
        let (delegate, events) = ChannelDelegate::new();

        let session = Session::builder(engine.clone())
            .config(config)
            .timer(timer.clone())
            .notifications(notifications.clone())
            .plugin(plugin.clone())
            .now_playing(now_playing.clone())
            .delegate(delegate)
            .build()
            .unwrap();

        Self {
            session,
            engine,
            timer,
            notifications,
            plugin,
            now_playing,
            events,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn pump(&mut self) -> usize {
        self.session.pump()
    }

    pub fn drain_events(&self) -> Vec<SessionEvent> {
        self.events.try_iter().collect()
    }

    /// Drain events, keeping only state changes
    pub fn states(&self) -> Vec<PlaybackState> {
        self.drain_events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::StateChanged { state } => Some(state),
                _ => None,
            })
            .collect()
    }

    /// Drain events, keeping only refusals
    pub fn unavailable(&self) -> Vec<UnavailableActionReason> {
        self.drain_events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::Unavailable { reason } => Some(reason),
                _ => None,
            })
            .collect()
    }

    /// Load a clip and let the engine finish preparing it
    pub fn loaded(duration: f64, options: LoadOptions) -> Self {
        let mut fixture = Self::new();
        fixture.session.load(clip(), options);
        fixture.engine.finish_loading(secs(duration));
        fixture.pump();
        fixture
    }

    /// A clip of `duration` seconds that reached playing
    pub fn playing(duration: f64) -> Self {
        let mut fixture = Self::loaded(duration, LoadOptions::auto_play());
        fixture.engine.buffer_ready();
        fixture.pump();
        assert_eq!(fixture.state(), PlaybackState::Playing);
        fixture.drain_events();
        fixture.engine.clear_calls();
        fixture
    }

    /// Playing clip whose buffer ran empty
    pub fn waiting_for_network(duration: f64) -> Self {
        let mut fixture = Self::playing(duration);
        fixture.engine.buffer_empty();
        fixture.pump();
        assert_eq!(fixture.state(), PlaybackState::WaitingForNetwork);
        fixture.drain_events();
        fixture
    }
}

/// Defaults with a short, tick-exact buffer timeout
pub fn test_config() -> Configuration {
    Configuration {
        buffer_observing_timeout_secs: 1.0,
        buffer_observing_interval_secs: 0.25,
        ..Configuration::default()
    }
}
