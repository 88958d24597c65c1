use super::actions::{
    CancelWaitingOrTranscodingAction, EndPlaybackSequenceAction, HaltPlaybackAction,
    SavePlaybackProfileAction,
};
use super::chain::PlaybackChain;
use super::PlaybackHandles;

/// Save profile, cancel waiting/transcoding, halt output, end the sequence.
/// Always in that order.
pub fn stop_playback_chain(handles: &PlaybackHandles) -> PlaybackChain {
    PlaybackChain::new("stop")
        .with_action(SavePlaybackProfileAction::new(
            handles.profiles.clone(),
            handles.preferences.clone(),
        ))
        .with_action(CancelWaitingOrTranscodingAction::new(handles.transcoder.clone()))
        .with_action(HaltPlaybackAction::new(handles.player.clone()))
        .with_action(EndPlaybackSequenceAction::new(handles.sequencer.clone()))
}
