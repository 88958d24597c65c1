use super::Artwork;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Result of asking the cache about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkLookup {
    /// Art was decoded earlier; this is the shared copy.
    Present(Arc<Artwork>),
    /// A decode ran and found nothing. Don't try again.
    ConfirmedAbsent,
    /// Nobody has looked at this file yet.
    NotQueried,
}

#[derive(Debug, Clone)]
enum CachedArt {
    Present(Arc<Artwork>),
    Absent,
}

/// File -> decoded artwork, including negative results.
///
/// Unbounded: callers that need eviction wrap it. Writes replace the whole
/// entry for a key, so racing writers leave exactly one value behind.
#[derive(Debug, Default)]
pub struct ArtworkCache {
    entries: RwLock<HashMap<PathBuf, CachedArt>>,
}

impl ArtworkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &Path) -> ArtworkLookup {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(file) {
            Some(CachedArt::Present(art)) => ArtworkLookup::Present(Arc::clone(art)),
            Some(CachedArt::Absent) => ArtworkLookup::ConfirmedAbsent,
            None => ArtworkLookup::NotQueried,
        }
    }

    /// Record a decode outcome. `None` marks the file as confirmed absent.
    pub fn put(&self, file: impl Into<PathBuf>, art: Option<Artwork>) -> Option<Arc<Artwork>> {
        let art = art.map(Arc::new);
        let cached = match &art {
            Some(art) => CachedArt::Present(Arc::clone(art)),
            None => CachedArt::Absent,
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.into(), cached);

        art
    }

    /// Cached art for `file`, running `decode` only when the file was never queried.
    pub fn get_or_load<F>(&self, file: &Path, decode: F) -> Option<Arc<Artwork>>
    where
        F: FnOnce(&Path) -> Option<Artwork>,
    {
        match self.get(file) {
            ArtworkLookup::Present(art) => Some(art),
            ArtworkLookup::ConfirmedAbsent => None,
            ArtworkLookup::NotQueried => {
                debug!("decoding artwork for {}", file.display());
                self.put(file, decode(file))
            }
        }
    }

    /// Forget what we know about one file so the next query decodes again.
    pub fn invalidate(&self, file: &Path) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(file)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
