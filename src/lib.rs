// trackchain - playback chains and track metadata for a desktop audio player
// The windowing layer lives elsewhere; this is the part it drives

pub mod audio;     // player, queue, scanning, transcoding
pub mod config;    // settings and preferences
pub mod metadata;  // tag readers, key labels, artwork cache
pub mod playback;  // chains of playback actions

// Export the stuff other modules actually use
#[cfg(feature = "audio")]
pub use audio::AudioPlayer;
pub use audio::{MusicScanner, Sequencer, Track, Transcoder};
pub use config::Config;
pub use metadata::{ArtworkCache, MetadataKeySpecs, MetadataLoader};
pub use playback::{
    stop_playback_chain, ChainOutcome, PlaybackChain, PlaybackController, PlaybackHandles,
};
