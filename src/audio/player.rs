use super::Track;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "audio")]
pub use self::output::AudioPlayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NoTrack,
    Playing,
    /// Queued track isn't available yet (e.g. a delay before it starts)
    Waiting,
    /// Queued track is being converted to something the output can decode
    Transcoding,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("failed to decode '{path}': {message}")]
    Decode { path: String, message: String },
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    TrackStarted(Track),
    TrackStopped,
    VolumeChanged(f32),
    Error(String),
}

/// What playback chains need from the output side.
pub trait Player {
    fn state(&self) -> PlaybackState;
    fn playing_track(&self) -> Option<Track>;
    fn seek_position(&self) -> Duration;
    /// Halt output immediately. Stopping with nothing loaded is fine.
    fn stop(&mut self) -> Result<(), PlayerError>;
}

#[cfg(feature = "audio")]
mod output {
    use super::{PlaybackState, Player, PlayerError, PlayerEvent};
    use crate::audio::{AudioConfig, Track};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;
    use std::time::{Duration, Instant};
    use tokio::sync::mpsc;
    use tracing::{debug, info};

    /// rodio-backed output. Not `Send`: the output stream is tied to the
    /// thread that opened it.
    pub struct AudioPlayer {
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
        sink: Option<Sink>,
        current_track: Option<Track>,
        state: PlaybackState,
        config: AudioConfig,
        event_sender: Option<mpsc::UnboundedSender<PlayerEvent>>,
        started_at: Option<Instant>,
    }

    impl AudioPlayer {
        pub fn new(config: AudioConfig) -> Result<Self, PlayerError> {
            let (stream, stream_handle) =
                OutputStream::try_default().map_err(|e| PlayerError::Output(e.to_string()))?;

            Ok(Self {
                _stream: stream,
                stream_handle,
                sink: None,
                current_track: None,
                state: PlaybackState::NoTrack,
                config,
                event_sender: None,
                started_at: None,
            })
        }

        pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<PlayerEvent>) {
            self.event_sender = Some(sender);
        }

        fn emit(&self, event: PlayerEvent) {
            if let Some(sender) = &self.event_sender {
                let _ = sender.send(event);
            }
        }

        pub fn play_track(&mut self, track: Track) -> Result<(), PlayerError> {
            let source = track.file.clone();
            self.play_track_from(track, &source)
        }

        /// Play `track`, decoding audio from `source` (a transcoded copy, say).
        pub fn play_track_from(&mut self, track: Track, source: &Path) -> Result<(), PlayerError> {
            // Stop current playback
            self.stop()?;

            let sink = Sink::try_new(&self.stream_handle)
                .map_err(|e| PlayerError::Output(e.to_string()))?;
            sink.set_volume(self.config.volume);

            let file = File::open(source).map_err(|e| {
                self.emit(PlayerEvent::Error(format!("Failed to open file: {}", e)));
                e
            })?;

            let decoded = Decoder::new(BufReader::new(file)).map_err(|e| {
                self.emit(PlayerEvent::Error(format!(
                    "Unsupported audio format or corrupted file: {}",
                    e
                )));
                PlayerError::Decode {
                    path: source.display().to_string(),
                    message: e.to_string(),
                }
            })?;

            sink.append(decoded);

            info!("playing {}", track.file.display());
            self.sink = Some(sink);
            self.current_track = Some(track.clone());
            self.state = PlaybackState::Playing;
            self.started_at = Some(Instant::now());

            self.emit(PlayerEvent::TrackStarted(track));
            Ok(())
        }

        /// Park a track that needs transcoding before it can be played.
        pub fn begin_transcoding(&mut self, track: Track) {
            self.current_track = Some(track);
            self.state = PlaybackState::Transcoding;
            self.started_at = None;
        }

        /// Park a track that is waiting to start.
        pub fn begin_waiting(&mut self, track: Track) {
            self.current_track = Some(track);
            self.state = PlaybackState::Waiting;
            self.started_at = None;
        }

        pub fn set_volume(&mut self, volume: f32) {
            let clamped_volume = volume.clamp(0.0, 1.0);
            self.config.volume = clamped_volume;

            if let Some(sink) = &self.sink {
                sink.set_volume(clamped_volume);
            }
            self.emit(PlayerEvent::VolumeChanged(clamped_volume));
        }

        pub fn is_finished(&self) -> bool {
            self.sink.as_ref().map(|sink| sink.empty()).unwrap_or(true)
        }
    }

    impl Player for AudioPlayer {
        fn state(&self) -> PlaybackState {
            self.state
        }

        fn playing_track(&self) -> Option<Track> {
            self.current_track.clone()
        }

        fn seek_position(&self) -> Duration {
            self.started_at.map(|at| at.elapsed()).unwrap_or_default()
        }

        fn stop(&mut self) -> Result<(), PlayerError> {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }

            if self.state != PlaybackState::NoTrack {
                debug!("player stopped");
                self.emit(PlayerEvent::TrackStopped);
            }

            self.current_track = None;
            self.state = PlaybackState::NoTrack;
            self.started_at = None;
            Ok(())
        }
    }

}
