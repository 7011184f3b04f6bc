//! Platform-agnostic playback engine contract
//!
//! The engine decodes, renders and seeks; the session only decides what it
//! should be doing. Queries are synchronous snapshots, everything that
//! changes on its own is reported through [`SignalSource`] subscriptions.

use crate::signal::{SeekTicket, SignalSink, SignalSource};
use aria_core::{Media, MediaTime, MetadataItem, TimeRange};
use serde::{Deserialize, Serialize};

/// Engine-side handle of a prepared item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Readiness of the current item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Unknown,
    ReadyToPlay,
    Failed,
}

/// What the engine is doing with time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeControlStatus {
    #[default]
    Paused,
    WaitingToPlayAtSpecifiedRate,
    Playing,
}

/// Why the engine is waiting instead of playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingReason {
    ToMinimizeStalls,
    EvaluatingBufferingRate,
    NoItemToPlay,
}

/// Buffer flags of the current item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BufferStatus {
    pub likely_to_keep_up: bool,
    pub full: bool,
    pub empty: bool,
}

impl BufferStatus {
    /// Enough data to play through
    pub fn is_ready(&self) -> bool {
        self.full || self.likely_to_keep_up
    }
}

/// Progress events of the current item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackProgress {
    PlayedToEnd,
    FailedToPlayToEnd,
    Stalled,
}

/// What the current item allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineCapabilities {
    pub can_play_fast_forward: bool,
    pub can_play_slow_forward: bool,
    pub can_play_reverse: bool,
    pub can_play_slow_reverse: bool,
    pub can_play_fast_reverse: bool,
    pub can_step_forward: bool,
    pub can_step_backward: bool,
}

impl EngineCapabilities {
    /// Everything allowed, typical of a local clip
    pub fn all() -> Self {
        Self {
            can_play_fast_forward: true,
            can_play_slow_forward: true,
            can_play_reverse: true,
            can_play_slow_reverse: true,
            can_play_fast_reverse: true,
            can_step_forward: true,
            can_step_backward: true,
        }
    }
}

/// The media engine driven by a session
///
/// Implementors are owned by the session and called only from its owner
/// thread. Asynchronous results (item preparation, seek completion,
/// subscribed topics) are posted through the sinks and tickets they are
/// given; the session picks them up on its next pump.
pub trait PlaybackEngine: SignalSource {
    /// Start creating an item for `media`, loading `asset_keys` first
    ///
    /// Reports exactly one `Signal::ItemPrepared` through `sink` unless
    /// cancelled. Key failures report `PlayerError::FailedLoadKey`, a
    /// non-playable asset `PlayerError::ContentsUnavailable`.
    fn prepare_item(&mut self, media: &Media, asset_keys: &[String], sink: SignalSink);

    /// Abandon any in-flight preparation
    fn cancel_item_preparation(&mut self);

    /// Install a prepared item, or clear the current one
    fn replace_current_item(&mut self, item: Option<ItemId>);

    fn has_current_item(&self) -> bool;

    /// Status of the current item (`Unknown` without one)
    fn item_status(&self) -> ItemStatus;

    fn play(&mut self);

    fn pause(&mut self);

    /// Rate the engine is currently running at
    fn rate(&self) -> f32;

    fn set_rate(&mut self, rate: f32);

    /// Seek the current item; the ticket must be completed exactly once
    fn seek(&mut self, time: MediaTime, ticket: SeekTicket);

    /// Complete every outstanding seek ticket with `false`
    fn cancel_pending_seeks(&mut self);

    /// Step by frames; negative counts step backwards
    fn step(&mut self, count: i32);

    fn current_time(&self) -> MediaTime;

    /// Duration of the current item, `Indefinite` for live content
    fn duration(&self) -> MediaTime;

    fn seekable_ranges(&self) -> Vec<TimeRange>;

    fn loaded_ranges(&self) -> Vec<TimeRange>;

    fn capabilities(&self) -> EngineCapabilities;

    fn buffer_status(&self) -> BufferStatus;

    fn time_control_status(&self) -> TimeControlStatus;

    fn reason_for_waiting_to_play(&self) -> Option<WaitingReason>;

    /// Common metadata of the current item's asset
    fn common_metadata(&self) -> Vec<MetadataItem> {
        Vec::new()
    }
}
