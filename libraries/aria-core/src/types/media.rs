/// Media descriptors and metadata
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form load options handed through to the engine
pub type MediaOptions = BTreeMap<String, String>;

/// Kind of content behind a media URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Finite, fully seekable asset
    Clip,
    /// Streamed asset; `is_live` streams have no fixed duration
    Stream { is_live: bool },
}

impl MediaType {
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Stream { is_live: true })
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clip => write!(f, "Clip"),
            Self::Stream { is_live: true } => write!(f, "Live Stream"),
            Self::Stream { is_live: false } => write!(f, "Replay Stream"),
        }
    }
}

/// Descriptor of an asset to load
///
/// Owned by the session from `load` until the next `load` replaces it.
/// Never mutated once loading has begun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Asset location
    pub url: String,

    /// Clip or stream
    pub media_type: MediaType,

    /// Engine-specific load options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: MediaOptions,

    /// Metadata published to the system "now playing" surface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_metadata: Option<StaticMetadata>,
}

impl Media {
    pub fn new(url: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            url: url.into(),
            media_type,
            options: MediaOptions::new(),
            static_metadata: None,
        }
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_static_metadata(mut self, metadata: StaticMetadata) -> Self {
        self.static_metadata = Some(metadata);
        self
    }
}

/// Audio or video, for the "now playing" surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Audio,
    Video,
}

/// Per-item properties that do not depend on player state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticMetadata {
    pub asset_url: String,
    pub kind: ContentKind,
    pub is_live_stream: bool,
    pub title: String,
    pub artist: Option<String>,
    pub artwork: Option<Vec<u8>>,
    pub album_artist: Option<String>,
    pub album_title: Option<String>,
}

/// Properties that change while the item plays
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicMetadata {
    /// Effective engine rate
    pub rate: f32,
    /// Elapsed time in seconds
    pub position: f64,
    /// Item duration in seconds, absent for live content
    pub duration: Option<f64>,
}

/// Common metadata identifiers an engine can report for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKey {
    AccessibilityDescription,
    AlbumName,
    Artist,
    Artwork,
    Author,
    Contributor,
    Copyrights,
    CreationDate,
    Creator,
    Description,
    Format,
    Language,
    LastModifiedDate,
    Location,
    Make,
    Model,
    Publisher,
    Relation,
    Software,
    Source,
    Subject,
    Title,
    Type,
}

/// Raw value of a metadata item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataValue {
    Text(String),
    Data(Vec<u8>),
}

/// One entry of an asset's common metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: MetadataKey,
    pub value: MetadataValue,
}

impl MetadataItem {
    pub fn text(key: MetadataKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: MetadataValue::Text(value.into()),
        }
    }
}

/// Asset metadata captured once the item is loaded
///
/// Text values are kept per key; artwork is the only binary entry. When an
/// asset reports the same key twice the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    text: BTreeMap<MetadataKey, String>,
    artwork: Option<Vec<u8>>,
}

impl MediaMetadata {
    /// Collect the first text value per key and the first artwork blob
    pub fn from_items(items: &[MetadataItem]) -> Self {
        let mut metadata = Self::default();
        for item in items {
            match (&item.key, &item.value) {
                (MetadataKey::Artwork, MetadataValue::Data(bytes)) => {
                    if metadata.artwork.is_none() {
                        metadata.artwork = Some(bytes.clone());
                    }
                }
                (key, MetadataValue::Text(value)) => {
                    metadata.text.entry(*key).or_insert_with(|| value.clone());
                }
                (_, MetadataValue::Data(_)) => {}
            }
        }
        metadata
    }

    /// Text value for any key
    pub fn get(&self, key: MetadataKey) -> Option<&str> {
        self.text.get(&key).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(MetadataKey::Title)
    }

    pub fn artist(&self) -> Option<&str> {
        self.get(MetadataKey::Artist)
    }

    pub fn album_name(&self) -> Option<&str> {
        self.get(MetadataKey::AlbumName)
    }

    pub fn author(&self) -> Option<&str> {
        self.get(MetadataKey::Author)
    }

    pub fn artwork(&self) -> Option<&[u8]> {
        self.artwork.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.artwork.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_descriptions() {
        assert_eq!(MediaType::Clip.to_string(), "Clip");
        assert_eq!(MediaType::Stream { is_live: true }.to_string(), "Live Stream");
        assert_eq!(MediaType::Stream { is_live: false }.to_string(), "Replay Stream");
        assert!(MediaType::Stream { is_live: true }.is_live());
        assert!(!MediaType::Clip.is_live());
    }

    #[test]
    fn stream_equality_compares_liveness() {
        assert_eq!(
            MediaType::Stream { is_live: true },
            MediaType::Stream { is_live: true }
        );
        assert_ne!(
            MediaType::Stream { is_live: true },
            MediaType::Stream { is_live: false }
        );
        assert_ne!(MediaType::Clip, MediaType::Stream { is_live: false });
    }

    #[test]
    fn metadata_keeps_first_value_per_key() {
        let items = vec![
            MetadataItem::text(MetadataKey::Title, "First"),
            MetadataItem::text(MetadataKey::Title, "Second"),
            MetadataItem::text(MetadataKey::Artist, "Band"),
            MetadataItem {
                key: MetadataKey::Artwork,
                value: MetadataValue::Data(vec![1, 2, 3]),
            },
        ];

        let metadata = MediaMetadata::from_items(&items);
        assert_eq!(metadata.title(), Some("First"));
        assert_eq!(metadata.artist(), Some("Band"));
        assert_eq!(metadata.album_name(), None);
        assert_eq!(metadata.artwork(), Some(&[1u8, 2, 3][..]));
        assert!(!metadata.is_empty());
    }

    #[test]
    fn media_builder() {
        let media = Media::new("file:///clip.mp4", MediaType::Clip)
            .with_option("prefer_precise_duration", "true");
        assert_eq!(media.options.get("prefer_precise_duration").map(String::as_str), Some("true"));
        assert!(media.static_metadata.is_none());
    }
}
