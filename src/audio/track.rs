use super::AudioFormat;
use crate::metadata::{Artwork, MetadataEntry, PrimaryMetadata, ReaderKind, SecondaryMetadata};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A file in the play queue. Identity is the file path; everything else is
/// filled in lazily by the metadata loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub file: PathBuf,
    pub format: AudioFormat,
    pub metadata_natively_supported: bool,
    pub file_size: u64,
    pub primary: PrimaryMetadata,
    pub secondary: SecondaryMetadata,
    pub metadata: Vec<MetadataEntry>,
    #[serde(skip)]
    pub art: Option<Arc<Artwork>>,
}

impl Track {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let format = file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .unwrap_or(AudioFormat::Unknown);
        let metadata_natively_supported = ReaderKind::for_file(&file) == ReaderKind::Native;

        Self {
            file,
            format,
            metadata_natively_supported,
            file_size: 0,
            primary: PrimaryMetadata::default(),
            secondary: SecondaryMetadata::default(),
            metadata: Vec::new(),
            art: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    pub fn duration(&self) -> Option<Duration> {
        self.primary.duration
    }

    pub fn display_title(&self) -> String {
        self.primary
            .title
            .clone()
            .unwrap_or_else(|| {
                self.file
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("Unknown")
                    .to_string()
            })
    }

    pub fn display_artist(&self) -> String {
        self.primary
            .artist
            .clone()
            .unwrap_or_else(|| "Unknown Artist".to_string())
    }

    pub fn display_album(&self) -> String {
        self.primary
            .album
            .clone()
            .unwrap_or_else(|| "Unknown Album".to_string())
    }

    /// "Artist - Title", or just the title when the artist is unknown.
    pub fn display_name(&self) -> String {
        match &self.primary.artist {
            Some(artist) => format!("{} - {}", artist, self.display_title()),
            None => self.display_title(),
        }
    }

    pub fn is_playable(&self) -> bool {
        self.format.is_supported() && self.file.exists()
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl Eq for Track {}
