// Playback commands as chains of small ordered actions
// Actions share the player, sequencer, transcoder and profile store through handles

pub mod actions;
pub mod chain;
pub mod controller;
#[cfg(feature = "persist")]
pub mod database;
pub mod profiles;
pub mod stop;

pub use actions::{
    CancelWaitingOrTranscodingAction, EndPlaybackSequenceAction, HaltPlaybackAction,
    SavePlaybackProfileAction,
};
pub use chain::{ActionOutcome, ChainOutcome, ChainState, PlaybackChain, PlaybackChainAction};
pub use controller::PlaybackController;
#[cfg(feature = "persist")]
pub use database::{ProfileDatabase, ProfileError};
pub use profiles::{PlaybackPreferences, PlaybackProfile, PlaybackProfiles, RememberPositionOption};
pub use stop::stop_playback_chain;

use crate::audio::{CancellationToken, PlaybackState, Player, Sequencing, Track, Transcoding};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A collaborator shared between the application and the chains built on it.
pub type Shared<T> = Arc<Mutex<T>>;

/// Lock a handle, or describe why it can't be used.
pub(crate) fn lock_handle<'a, T: ?Sized>(
    handle: &'a Mutex<T>,
    name: &str,
) -> Result<MutexGuard<'a, T>, String> {
    handle
        .lock()
        .map_err(|_| format!("{} handle is poisoned", name))
}

/// Everything a chain operates on, wired once at startup.
#[derive(Clone)]
pub struct PlaybackHandles {
    pub player: Shared<dyn Player>,
    pub sequencer: Shared<dyn Sequencing>,
    pub transcoder: Shared<dyn Transcoding>,
    pub profiles: Shared<PlaybackProfiles>,
    pub preferences: Shared<PlaybackPreferences>,
}

/// Snapshot of the player passed from action to action. Actions may edit it
/// or hand a replacement downstream.
#[derive(Debug, Clone)]
pub struct PlaybackRequestContext {
    pub current_state: PlaybackState,
    pub current_track: Option<Track>,
    pub current_seek_position: Duration,
    /// Set while a track is waiting to start; cancelling it abandons the wait.
    pub pending_wait: Option<CancellationToken>,
}

impl PlaybackRequestContext {
    pub fn new(
        current_state: PlaybackState,
        current_track: Option<Track>,
        current_seek_position: Duration,
    ) -> Self {
        Self {
            current_state,
            current_track,
            current_seek_position,
            pending_wait: None,
        }
    }

    pub fn idle() -> Self {
        Self::new(PlaybackState::NoTrack, None, Duration::ZERO)
    }

    pub fn with_pending_wait(mut self, token: CancellationToken) -> Self {
        self.pending_wait = Some(token);
        self
    }

    /// Read the player's current state into a fresh context.
    pub fn from_player(player: &dyn Player) -> Self {
        Self::new(player.state(), player.playing_track(), player.seek_position())
    }
}
