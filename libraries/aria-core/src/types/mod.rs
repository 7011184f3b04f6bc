//! Domain types for playback sessions

mod media;
mod rate;
mod state;
mod time;

pub use media::{
    ContentKind, DynamicMetadata, Media, MediaMetadata, MediaOptions, MediaType, MetadataItem,
    MetadataKey, MetadataValue, StaticMetadata,
};
pub use rate::PlaybackRate;
pub use state::PlaybackState;
pub use time::{MediaTime, TimeRange};
