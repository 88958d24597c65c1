pub mod player;
pub mod scanner;
pub mod sequencer;
pub mod track;
pub mod transcoder;

#[cfg(feature = "audio")]
pub use player::AudioPlayer;
pub use player::{PlaybackState, Player, PlayerError, PlayerEvent};
pub use scanner::MusicScanner;
pub use sequencer::{RepeatMode, Sequencer, Sequencing, ShuffleMode};
pub use track::Track;
pub use transcoder::{CancellationToken, TranscodeError, Transcoder, Transcoding};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub volume: f32, // 0.0 to 1.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Mp4,
    Wav,
    Aiff,
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "flac" => AudioFormat::Flac,
            "ogg" | "oga" => AudioFormat::Ogg,
            "mp4" | "m4a" | "m4b" | "aac" => AudioFormat::Mp4,
            "wav" => AudioFormat::Wav,
            "aif" | "aiff" | "aifc" => AudioFormat::Aiff,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}
