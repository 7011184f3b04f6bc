//! Aria Core
//!
//! Platform-agnostic domain types shared by every Aria playback crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Media descriptors**: `Media`, `MediaType`, static/dynamic "now playing" metadata
//! - **Time**: `MediaTime` (rational, may be indefinite or invalid) and `TimeRange`
//! - **Session vocabulary**: `PlaybackState`, `PlaybackRate`
//! - **Error handling**: `PlayerError` for load faults and `UnavailableActionReason`
//!   for commands rejected by the current state
//!
//! # Example
//!
//! ```rust
//! use aria_core::{Media, MediaTime, MediaType, PlaybackRate};
//!
//! let media = Media::new("https://cdn.example.com/clip.m3u8", MediaType::Clip);
//! assert_eq!(media.media_type.to_string(), "Clip");
//!
//! let half = MediaTime::from_seconds(30.0, MediaTime::DEFAULT_TIMESCALE);
//! assert_eq!(half.seconds(), Some(30.0));
//!
//! assert_eq!(PlaybackRate::Superfast.next(), PlaybackRate::Slowest);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{PlayerError, Result, UnavailableActionReason};
pub use types::{
    // Media
    ContentKind, DynamicMetadata, Media, MediaMetadata, MediaOptions, MediaType, MetadataItem,
    MetadataKey, MetadataValue, StaticMetadata,
    // Session vocabulary
    PlaybackRate, PlaybackState,
    // Time
    MediaTime, TimeRange,
};
