// The four steps playback commands are built from
// Each action holds only the handles it touches

use super::chain::{ActionOutcome, PlaybackChainAction};
use super::profiles::{PlaybackPreferences, PlaybackProfile, PlaybackProfiles, RememberPositionOption};
use super::{lock_handle, PlaybackRequestContext, Shared};
use crate::audio::{PlaybackState, Player, Sequencing, Transcoding};
use std::time::Duration;
use tracing::{debug, info};

/// Remember where the current track stopped, when preferences ask for it.
pub struct SavePlaybackProfileAction {
    profiles: Shared<PlaybackProfiles>,
    preferences: Shared<PlaybackPreferences>,
}

impl SavePlaybackProfileAction {
    pub fn new(profiles: Shared<PlaybackProfiles>, preferences: Shared<PlaybackPreferences>) -> Self {
        Self { profiles, preferences }
    }
}

impl PlaybackChainAction for SavePlaybackProfileAction {
    fn name(&self) -> &'static str {
        "save_playback_profile"
    }

    fn execute(&self, context: &mut PlaybackRequestContext) -> ActionOutcome {
        let preferences = match lock_handle(&self.preferences, "preferences") {
            Ok(preferences) => preferences.clone(),
            Err(reason) => return ActionOutcome::Abort(reason),
        };
        if !preferences.remember_last_position {
            return ActionOutcome::Proceed;
        }
        let Some(track) = context.current_track.as_ref() else {
            return ActionOutcome::Proceed;
        };

        let mut profiles = match lock_handle(&self.profiles, "profiles") {
            Ok(profiles) => profiles,
            Err(reason) => return ActionOutcome::Abort(reason),
        };
        let wanted = preferences.remember_last_position_option == RememberPositionOption::AllTracks
            || profiles.has_for(&track.file);
        if !wanted {
            return ActionOutcome::Proceed;
        }

        // A finished track starts over next time
        let position = match track.duration() {
            Some(duration) if context.current_seek_position >= duration => Duration::ZERO,
            _ => context.current_seek_position,
        };
        debug!("saving position {:?} for {}", position, track.file.display());
        profiles.add(PlaybackProfile::new(track.file.clone(), position));
        ActionOutcome::Proceed
    }
}

/// Abandon a pending wait and any conversion running for the current track.
pub struct CancelWaitingOrTranscodingAction {
    transcoder: Shared<dyn Transcoding>,
}

impl CancelWaitingOrTranscodingAction {
    pub fn new(transcoder: Shared<dyn Transcoding>) -> Self {
        Self { transcoder }
    }
}

impl PlaybackChainAction for CancelWaitingOrTranscodingAction {
    fn name(&self) -> &'static str {
        "cancel_waiting_or_transcoding"
    }

    fn execute(&self, context: &mut PlaybackRequestContext) -> ActionOutcome {
        if let Some(wait) = context.pending_wait.take() {
            wait.cancel();
            debug!("cancelled pending wait");
        }

        let Some(track) = context.current_track.as_ref() else {
            return ActionOutcome::Proceed;
        };
        let mut transcoder = match lock_handle(&self.transcoder, "transcoder") {
            Ok(transcoder) => transcoder,
            Err(reason) => return ActionOutcome::Abort(reason),
        };
        if transcoder.is_transcoding(&track.file) && transcoder.cancel(&track.file) {
            info!("stopped transcoding {}", track.file.display());
        }
        ActionOutcome::Proceed
    }
}

/// Stop the output. The only step that can genuinely fail.
pub struct HaltPlaybackAction {
    player: Shared<dyn Player>,
}

impl HaltPlaybackAction {
    pub fn new(player: Shared<dyn Player>) -> Self {
        Self { player }
    }
}

impl PlaybackChainAction for HaltPlaybackAction {
    fn name(&self) -> &'static str {
        "halt_playback"
    }

    fn execute(&self, context: &mut PlaybackRequestContext) -> ActionOutcome {
        if context.current_state == PlaybackState::NoTrack {
            return ActionOutcome::Proceed;
        }

        let mut player = match lock_handle(&self.player, "player") {
            Ok(player) => player,
            Err(reason) => return ActionOutcome::Abort(reason),
        };
        match player.stop() {
            Ok(()) => {
                context.current_state = PlaybackState::NoTrack;
                ActionOutcome::Proceed
            }
            Err(e) => ActionOutcome::Abort(format!("player failed to stop: {}", e)),
        }
    }
}

/// Forget the position in the play sequence.
pub struct EndPlaybackSequenceAction {
    sequencer: Shared<dyn Sequencing>,
}

impl EndPlaybackSequenceAction {
    pub fn new(sequencer: Shared<dyn Sequencing>) -> Self {
        Self { sequencer }
    }
}

impl PlaybackChainAction for EndPlaybackSequenceAction {
    fn name(&self) -> &'static str {
        "end_playback_sequence"
    }

    fn execute(&self, _context: &mut PlaybackRequestContext) -> ActionOutcome {
        match lock_handle(&self.sequencer, "sequencer") {
            Ok(mut sequencer) => {
                sequencer.end();
                ActionOutcome::Proceed
            }
            Err(reason) => ActionOutcome::Abort(reason),
        }
    }
}
