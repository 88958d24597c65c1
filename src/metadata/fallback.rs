// Fallback reader for containers the native reader can't handle (FLAC, Ogg, ...)
// Everything goes through symphonia format detection

use super::stream::{duration_of, metadata_revisions, open_stream};
use super::{
    or_absent, parse_number_pair, Artwork, MetadataEntry, MetadataReader, MetadataType,
    PrimaryMetadata, ReadError, SecondaryMetadata,
};
use std::path::Path;
use std::time::Duration;
use symphonia::core::meta::{MetadataRevision, StandardTagKey, StandardVisualKey};

#[derive(Debug, Default, Clone)]
pub struct FallbackReader;

impl FallbackReader {
    pub fn new() -> Self {
        Self
    }

    fn revisions(&self, path: &Path) -> Result<Vec<MetadataRevision>, ReadError> {
        let mut stream = open_stream(path)?;
        Ok(metadata_revisions(&mut stream))
    }

    fn read_primary(&self, path: &Path) -> Result<PrimaryMetadata, ReadError> {
        let mut stream = open_stream(path)?;
        let revisions = metadata_revisions(&mut stream);
        let duration = or_absent(path, "duration", duration_of(&stream));
        Ok(primary_from(&revisions, duration))
    }
}

/// Last value for a standard key across all revisions.
fn standard_value(revisions: &[MetadataRevision], key: StandardTagKey) -> Option<String> {
    revisions
        .iter()
        .flat_map(|rev| rev.tags())
        .filter(|tag| tag.std_key == Some(key))
        .map(|tag| tag.value.to_string())
        .filter(|value| !value.trim().is_empty())
        .last()
}

fn primary_from(revisions: &[MetadataRevision], duration: Option<Duration>) -> PrimaryMetadata {
    PrimaryMetadata {
        artist: standard_value(revisions, StandardTagKey::Artist),
        title: standard_value(revisions, StandardTagKey::TrackTitle),
        album: standard_value(revisions, StandardTagKey::Album),
        genre: standard_value(revisions, StandardTagKey::Genre),
        duration,
    }
}

fn secondary_from(revisions: &[MetadataRevision]) -> SecondaryMetadata {
    let (track_number, track_total) = standard_value(revisions, StandardTagKey::TrackNumber)
        .map(|raw| parse_number_pair(&raw))
        .unwrap_or_default();
    let (disc_number, disc_total) = standard_value(revisions, StandardTagKey::DiscNumber)
        .map(|raw| parse_number_pair(&raw))
        .unwrap_or_default();

    let total = |key| standard_value(revisions, key).and_then(|raw| parse_number_pair(&raw).0);

    SecondaryMetadata {
        disc_number,
        total_discs: total(StandardTagKey::DiscTotal).or(disc_total),
        track_number,
        total_tracks: total(StandardTagKey::TrackTotal).or(track_total),
        lyrics: standard_value(revisions, StandardTagKey::Lyrics),
    }
}

/// Standard keys land in the common space, anything else under its raw key.
fn entries_from(revisions: &[MetadataRevision]) -> Vec<MetadataEntry> {
    revisions
        .iter()
        .flat_map(|rev| rev.tags())
        .map(|tag| match tag.std_key {
            Some(std_key) => {
                MetadataEntry::new(MetadataType::Common, common_key(std_key), tag.value.to_string())
            }
            None => MetadataEntry::new(MetadataType::Other, tag.key.clone(), tag.value.to_string()),
        })
        .collect()
}

fn artwork_from(revisions: &[MetadataRevision]) -> Option<Artwork> {
    let visuals: Vec<_> = revisions.iter().flat_map(|rev| rev.visuals()).collect();

    visuals
        .iter()
        .find(|v| v.usage == Some(StandardVisualKey::FrontCover))
        .or_else(|| visuals.first())
        .map(|v| Artwork::new(v.media_type.clone(), v.data.to_vec()))
}

/// `TrackTitle` -> `trackTitle`, the camelCase shape of common-space keys.
fn common_key(key: StandardTagKey) -> String {
    let name = format!("{:?}", key);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => name,
    }
}

impl MetadataReader for FallbackReader {
    fn primary_metadata(&self, file: &Path) -> PrimaryMetadata {
        or_absent(file, "primary metadata", self.read_primary(file)).unwrap_or_default()
    }

    fn secondary_metadata(&self, file: &Path) -> SecondaryMetadata {
        let result = self.revisions(file).map(|revisions| secondary_from(&revisions));
        or_absent(file, "secondary metadata", result).unwrap_or_default()
    }

    fn all_metadata(&self, file: &Path) -> Vec<MetadataEntry> {
        let result = self.revisions(file).map(|revisions| entries_from(&revisions));
        or_absent(file, "tags", result).unwrap_or_default()
    }

    fn duration(&self, file: &Path) -> Option<Duration> {
        let result = open_stream(file).and_then(|stream| duration_of(&stream));
        or_absent(file, "duration", result)
    }

    fn artwork(&self, file: &Path) -> Option<Artwork> {
        let result = self.revisions(file).map(|revisions| artwork_from(&revisions));
        or_absent(file, "artwork", result).flatten()
    }
}
