// Native tag reader: ID3 frames via `id3`, iTunes atoms via `mp4ameta`

use super::stream::stream_duration;
use super::{
    or_absent, Artwork, MetadataEntry, MetadataReader, MetadataType, PrimaryMetadata, ReadError,
    SecondaryMetadata,
};
use id3::frame::{Content, PictureType};
use id3::TagLike;
use mp4ameta::{DataIdent, Fourcc, ImgFmt};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Id3,
    Mp4,
}

impl Container {
    fn for_file(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "m4a" | "m4b" | "mp4" => Container::Mp4,
            _ => Container::Id3,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct NativeReader;

impl NativeReader {
    pub fn new() -> Self {
        Self
    }

    // Finds the tag in MP3 headers and in WAV/AIFF chunks alike
    fn read_id3(&self, path: &Path) -> Result<id3::Tag, ReadError> {
        Ok(id3::Tag::read_from_path(path)?)
    }

    fn read_mp4(&self, path: &Path) -> Result<mp4ameta::Tag, ReadError> {
        Ok(mp4ameta::Tag::read_from_path(path)?)
    }

    fn id3_primary(&self, path: &Path) -> Result<PrimaryMetadata, ReadError> {
        let tag = self.read_id3(path)?;
        Ok(PrimaryMetadata {
            artist: tag.artist().map(|s| s.to_string()),
            title: tag.title().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            genre: tag.genre().map(|s| s.to_string()),
            duration: tag.duration().map(|ms| Duration::from_millis(ms as u64)),
        })
    }

    fn mp4_primary(&self, path: &Path) -> Result<PrimaryMetadata, ReadError> {
        let tag = self.read_mp4(path)?;
        Ok(PrimaryMetadata {
            artist: tag.artist().map(|s| s.to_string()),
            title: tag.title().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            genre: tag.genre().map(|s| s.to_string()),
            duration: None,
        })
    }

    fn id3_secondary(&self, path: &Path) -> Result<SecondaryMetadata, ReadError> {
        let tag = self.read_id3(path)?;
        let lyrics = tag.lyrics().next().map(|l| l.text.clone());
        Ok(SecondaryMetadata {
            disc_number: tag.disc(),
            total_discs: tag.total_discs(),
            track_number: tag.track(),
            total_tracks: tag.total_tracks(),
            lyrics,
        })
    }

    fn mp4_secondary(&self, path: &Path) -> Result<SecondaryMetadata, ReadError> {
        let tag = self.read_mp4(path)?;
        Ok(SecondaryMetadata {
            disc_number: tag.disc_number().map(u32::from),
            total_discs: tag.total_discs().map(u32::from),
            track_number: tag.track_number().map(u32::from),
            total_tracks: tag.total_tracks().map(u32::from),
            lyrics: tag.lyrics().map(|s| s.to_string()),
        })
    }

    fn id3_entries(&self, path: &Path) -> Result<Vec<MetadataEntry>, ReadError> {
        let tag = self.read_id3(path)?;
        let mut entries = Vec::new();

        for frame in tag.frames() {
            let id = frame.id();
            let entry = match frame.content() {
                // v2.4 packs multiple values with NUL separators
                Content::Text(text) => MetadataEntry::new(MetadataType::Id3, id, text.replace('\0', "; ")),
                Content::Link(url) => MetadataEntry::new(MetadataType::Id3, id, url.clone()),
                Content::Comment(comment) => MetadataEntry::new(MetadataType::Id3, id, comment.text.clone()),
                Content::Lyrics(lyrics) => MetadataEntry::new(MetadataType::Id3, id, lyrics.text.clone()),
                // User-defined frames are keyed by their description, which is
                // usually a long-form name like "MusicBrainz Album Id"
                Content::ExtendedText(text) => {
                    MetadataEntry::new(MetadataType::Id3, text.description.clone(), text.value.clone())
                }
                Content::ExtendedLink(link) => {
                    MetadataEntry::new(MetadataType::Id3, link.description.clone(), link.link.clone())
                }
                _ => continue,
            };
            entries.push(entry);
        }

        Ok(entries)
    }

    fn mp4_entries(&self, path: &Path) -> Result<Vec<MetadataEntry>, ReadError> {
        Ok(mp4_entries_from(&self.read_mp4(path)?))
    }

    fn id3_artwork(&self, path: &Path) -> Result<Option<Artwork>, ReadError> {
        let tag = self.read_id3(path)?;
        let picture = tag
            .pictures()
            .find(|p| p.picture_type == PictureType::CoverFront)
            .or_else(|| tag.pictures().next());

        Ok(picture.map(|p| Artwork::new(p.mime_type.clone(), p.data.clone())))
    }

    fn mp4_artwork(&self, path: &Path) -> Result<Option<Artwork>, ReadError> {
        Ok(mp4_artwork_from(&self.read_mp4(path)?))
    }
}

/// Every text atom as an entry. Freeform `----` atoms are keyed `mean:name`.
fn mp4_entries_from(tag: &mp4ameta::Tag) -> Vec<MetadataEntry> {
    let mut entries = Vec::new();

    for (ident, data) in tag.data() {
        let Some(value) = data.string() else {
            continue;
        };

        let entry = match ident {
            DataIdent::Fourcc(fourcc) => {
                MetadataEntry::new(MetadataType::ITunes, fourcc_key(fourcc), value)
            }
            DataIdent::Freeform { mean, name } => {
                MetadataEntry::new(MetadataType::ITunesLongForm, format!("{}:{}", mean, name), value)
            }
        };
        entries.push(entry);
    }

    entries
}

fn mp4_artwork_from(tag: &mp4ameta::Tag) -> Option<Artwork> {
    tag.artwork().map(|img| {
        let mime = match img.fmt {
            ImgFmt::Jpeg => "image/jpeg",
            ImgFmt::Png => "image/png",
            ImgFmt::Bmp => "image/bmp",
        };
        Artwork::new(mime, img.data.to_vec())
    })
}

/// Atom names use 0xA9 for the copyright sign ("\xa9alb" -> "©alb").
fn fourcc_key(fourcc: &Fourcc) -> String {
    fourcc
        .0
        .iter()
        .map(|&b| if b == 0xA9 { '©' } else { b as char })
        .collect()
}

impl MetadataReader for NativeReader {
    fn primary_metadata(&self, file: &Path) -> PrimaryMetadata {
        let result = match Container::for_file(file) {
            Container::Id3 => self.id3_primary(file),
            Container::Mp4 => self.mp4_primary(file),
        };
        let mut primary = or_absent(file, "primary metadata", result).unwrap_or_default();
        if primary.duration.is_none() {
            primary.duration = self.duration(file);
        }
        primary
    }

    fn secondary_metadata(&self, file: &Path) -> SecondaryMetadata {
        let result = match Container::for_file(file) {
            Container::Id3 => self.id3_secondary(file),
            Container::Mp4 => self.mp4_secondary(file),
        };
        or_absent(file, "secondary metadata", result).unwrap_or_default()
    }

    fn all_metadata(&self, file: &Path) -> Vec<MetadataEntry> {
        let result = match Container::for_file(file) {
            Container::Id3 => self.id3_entries(file),
            Container::Mp4 => self.mp4_entries(file),
        };
        or_absent(file, "tags", result).unwrap_or_default()
    }

    fn duration(&self, file: &Path) -> Option<Duration> {
        if Container::for_file(file) == Container::Id3 {
            let from_tag = self
                .read_id3(file)
                .ok()
                .and_then(|tag| tag.duration())
                .filter(|&ms| ms > 0);
            if let Some(ms) = from_tag {
                return Some(Duration::from_millis(ms as u64));
            }
        }
        or_absent(file, "duration", stream_duration(file))
    }

    fn artwork(&self, file: &Path) -> Option<Artwork> {
        let result = match Container::for_file(file) {
            Container::Id3 => self.id3_artwork(file),
            Container::Mp4 => self.mp4_artwork(file),
        };
        or_absent(file, "artwork", result).flatten()
    }
}
