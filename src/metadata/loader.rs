// Fills tracks in from whichever reader owns their format
// Art goes through the shared cache so a file is decoded at most once

use super::{
    Artwork, ArtworkCache, FallbackReader, MetadataReader, NativeReader, ReaderKind,
};
use crate::audio::Track;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct MetadataLoader {
    native: Box<dyn MetadataReader>,
    fallback: Box<dyn MetadataReader>,
    art_cache: Arc<ArtworkCache>,
}

impl MetadataLoader {
    pub fn new(art_cache: Arc<ArtworkCache>) -> Self {
        Self::with_readers(
            Box::new(NativeReader::new()),
            Box::new(FallbackReader::new()),
            art_cache,
        )
    }

    pub fn with_readers(
        native: Box<dyn MetadataReader>,
        fallback: Box<dyn MetadataReader>,
        art_cache: Arc<ArtworkCache>,
    ) -> Self {
        Self {
            native,
            fallback,
            art_cache,
        }
    }

    pub fn art_cache(&self) -> &Arc<ArtworkCache> {
        &self.art_cache
    }

    fn reader_for(&self, natively_supported: bool) -> &dyn MetadataReader {
        if natively_supported {
            self.native.as_ref()
        } else {
            self.fallback.as_ref()
        }
    }

    fn reader_for_file(&self, file: &Path) -> &dyn MetadataReader {
        self.reader_for(ReaderKind::for_file(file) == ReaderKind::Native)
    }

    /// Artist, title, album, genre and duration.
    pub fn load_primary(&self, track: &mut Track) {
        debug!("loading primary metadata for {}", track.file.display());
        track.primary = self
            .reader_for(track.metadata_natively_supported)
            .primary_metadata(&track.file);
    }

    /// Disc/track numbers and lyrics.
    pub fn load_secondary(&self, track: &mut Track) {
        track.secondary = self
            .reader_for(track.metadata_natively_supported)
            .secondary_metadata(&track.file);
    }

    /// Replace the track's tag list with everything the reader finds.
    pub fn load_all(&self, track: &mut Track) {
        track.metadata = self
            .reader_for(track.metadata_natively_supported)
            .all_metadata(&track.file);
    }

    pub fn load_art(&self, track: &mut Track) {
        let reader = self.reader_for(track.metadata_natively_supported);
        track.art = self
            .art_cache
            .get_or_load(&track.file, |file| reader.artwork(file));
    }

    pub fn duration_for_file(&self, file: &Path) -> Option<Duration> {
        self.reader_for_file(file).duration(file)
    }

    /// Art for a file that isn't in the queue, shared through the same cache.
    pub fn art_for_file(&self, file: &Path) -> Option<Arc<Artwork>> {
        let reader = self.reader_for_file(file);
        self.art_cache.get_or_load(file, |file| reader.artwork(file))
    }
}
