// Track metadata - readers, key labels and the artwork cache
// Two readers sit behind one trait; the file extension decides which one runs

pub mod artwork_cache;
pub mod fallback;
pub mod loader;
pub mod native;
pub(crate) mod stream;
pub mod specs;

pub use artwork_cache::{ArtworkCache, ArtworkLookup};
pub use fallback::FallbackReader;
pub use loader::MetadataLoader;
pub use native::NativeReader;
pub use specs::MetadataKeySpecs;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Extensions the native tag reader understands.
pub const NATIVE_AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "m4b", "mp4", "aac", "aif", "aiff", "aifc", "wav", "flac",
];

/// Natively listed, but tags are only readable through the fallback decoder.
const NATIVE_CARVE_OUT: &str = "flac";

/// Internal reader failures. These never leave a reader: every public
/// `MetadataReader` method turns them into absent values.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("ID3: {0}")]
    Id3(#[from] id3::Error),

    #[error("MP4: {0}")]
    Mp4(#[from] mp4ameta::Error),

    #[error("decoder: {0}")]
    Decoder(#[from] symphonia::core::errors::Error),

    #[error("unsupported container: {0}")]
    Unsupported(String),
}

/// Which reader handles a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKind {
    Native,
    Fallback,
}

impl ReaderKind {
    /// Pure classification on the (case-insensitive) extension.
    pub fn for_file(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        Self::for_extension(&ext)
    }

    pub fn for_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if NATIVE_AUDIO_EXTENSIONS.contains(&ext.as_str()) && ext != NATIVE_CARVE_OUT {
            ReaderKind::Native
        } else {
            ReaderKind::Fallback
        }
    }
}

/// Tag format an entry was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataType {
    Common,
    ITunes,
    ITunesLongForm,
    Id3,
    Other,
}

impl MetadataType {
    /// Smaller sorts first. Display ordering only.
    pub fn sort_order(self) -> u8 {
        match self {
            MetadataType::Common => 0,
            MetadataType::ITunes | MetadataType::ITunesLongForm => 1,
            MetadataType::Id3 => 2,
            MetadataType::Other => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataKeyType {
    Key,
    Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub format: MetadataType,
    pub key_type: MetadataKeyType,
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(format: MetadataType, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            format,
            key_type: MetadataKeyType::Key,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn with_id(format: MetadataType, id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key_type: MetadataKeyType::Id,
            ..Self::new(format, id, value)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryMetadata {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryMetadata {
    pub disc_number: Option<u32>,
    pub total_discs: Option<u32>,
    pub track_number: Option<u32>,
    pub total_tracks: Option<u32>,
    pub lyrics: Option<String>,
}

/// Embedded cover art as stored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Artwork {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Everything a reader can extract from a file. A field the reader cannot
/// find comes back as `None` (or an empty list), never as an error.
pub trait MetadataReader: Send + Sync {
    fn primary_metadata(&self, file: &Path) -> PrimaryMetadata;
    fn secondary_metadata(&self, file: &Path) -> SecondaryMetadata;
    fn all_metadata(&self, file: &Path) -> Vec<MetadataEntry>;
    fn duration(&self, file: &Path) -> Option<Duration>;
    fn artwork(&self, file: &Path) -> Option<Artwork>;
}

/// Collapse a reader result into an absent value, keeping the reason in the logs.
pub(crate) fn or_absent<T>(file: &Path, what: &str, result: Result<T, ReadError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("no {} for {}: {}", what, file.display(), e);
            None
        }
    }
}

/// Parse "3" or "3/12" style numbers.
pub(crate) fn parse_number_pair(raw: &str) -> (Option<u32>, Option<u32>) {
    let mut parts = raw.splitn(2, '/');
    let number = parts.next().and_then(|n| n.trim().parse().ok());
    let total = parts.next().and_then(|t| t.trim().parse().ok());
    (number, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_reader_selection_by_extension() {
        for ext in ["mp3", "m4a", "M4A", "aiff", "Wav", "aac"] {
            assert_eq!(ReaderKind::for_extension(ext), ReaderKind::Native, "{}", ext);
        }
        for ext in ["ogg", "opus", "wma", "ape", ""] {
            assert_eq!(ReaderKind::for_extension(ext), ReaderKind::Fallback, "{}", ext);
        }
    }

    #[test]
    fn test_flac_is_routed_to_fallback() {
        assert_eq!(ReaderKind::for_extension("flac"), ReaderKind::Fallback);
        assert_eq!(ReaderKind::for_extension("FLAC"), ReaderKind::Fallback);
        assert!(NATIVE_AUDIO_EXTENSIONS.contains(&"flac"));
    }

    #[test]
    fn test_reader_selection_is_deterministic() {
        let a = PathBuf::from("/music/a/Song.MP3");
        let b = PathBuf::from("/other/b.mp3");
        assert_eq!(ReaderKind::for_file(&a), ReaderKind::for_file(&b));
        assert_eq!(ReaderKind::for_file(&a), ReaderKind::for_file(&a));
        assert_eq!(ReaderKind::for_file(Path::new("no_extension")), ReaderKind::Fallback);
    }

    #[test]
    fn test_format_priority() {
        assert!(MetadataType::Common.sort_order() < MetadataType::ITunes.sort_order());
        assert_eq!(MetadataType::ITunes.sort_order(), MetadataType::ITunesLongForm.sort_order());
        assert!(MetadataType::ITunesLongForm.sort_order() < MetadataType::Id3.sort_order());
        assert!(MetadataType::Id3.sort_order() < MetadataType::Other.sort_order());
    }

    #[test]
    fn test_parse_number_pair() {
        assert_eq!(parse_number_pair("3/12"), (Some(3), Some(12)));
        assert_eq!(parse_number_pair(" 7 "), (Some(7), None));
        assert_eq!(parse_number_pair("x/2"), (None, Some(2)));
    }
}
