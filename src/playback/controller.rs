use super::chain::{ChainOutcome, ChainState, PlaybackChain};
use super::stop::stop_playback_chain;
use super::{PlaybackHandles, PlaybackRequestContext};
use crate::audio::CancellationToken;
use std::sync::PoisonError;
use tracing::{info, warn};

/// Owns the handles and the chains built on them. Chains are built once here
/// and reused for every request.
pub struct PlaybackController {
    handles: PlaybackHandles,
    stop_chain: PlaybackChain,
    pending_wait: Option<CancellationToken>,
}

impl PlaybackController {
    pub fn new(handles: PlaybackHandles) -> Self {
        let stop_chain = stop_playback_chain(&handles);
        Self {
            handles,
            stop_chain,
            pending_wait: None,
        }
    }

    pub fn handles(&self) -> &PlaybackHandles {
        &self.handles
    }

    /// Register a delayed start; the next stop cancels it.
    pub fn wait_before_playing(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        self.pending_wait = Some(token.clone());
        token
    }

    /// The delay ran out. Returns false when a stop got there first.
    pub fn finish_wait(&mut self) -> bool {
        match self.pending_wait.take() {
            Some(token) => !token.is_cancelled(),
            None => false,
        }
    }

    pub fn has_pending_wait(&self) -> bool {
        self.pending_wait.is_some()
    }

    pub fn stop_chain_state(&self) -> ChainState {
        self.stop_chain.state()
    }

    // A poisoned player still yields a readable snapshot; halting it is
    // what fails, and the chain reports that.
    fn request_context(&mut self) -> PlaybackRequestContext {
        let player = self
            .handles
            .player
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let context = PlaybackRequestContext::from_player(&*player);
        drop(player);

        match self.pending_wait.take() {
            Some(token) => context.with_pending_wait(token),
            None => context,
        }
    }

    pub fn stop(&mut self) -> ChainOutcome {
        let context = self.request_context();
        let outcome = self.stop_chain.execute(context);

        match &outcome {
            ChainOutcome::Completed(_) => info!("playback stopped"),
            ChainOutcome::Aborted {
                action,
                reason,
                context,
            } => {
                warn!("stop did not complete ({}): {}", action, reason);
                // A wait the chain never reached stays ours to cancel later
                if let Some(token) = &context.pending_wait {
                    self.pending_wait = Some(token.clone());
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackState, Track};
    use crate::playback::fakes::{poison, Rig};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_stop_reads_context_from_player() {
        let rig = Rig::new(Track::new("/music/a.mp3"), Duration::from_secs(33));
        let mut controller = PlaybackController::new(rig.handles.clone());
        assert_eq!(controller.stop_chain_state(), ChainState::Built);

        let outcome = controller.stop();

        assert!(outcome.is_completed());
        assert_eq!(controller.stop_chain_state(), ChainState::Completed);
        let profiles = rig.handles.profiles.lock().unwrap();
        assert_eq!(
            profiles.get(Path::new("/music/a.mp3")).unwrap().last_position,
            Duration::from_secs(33)
        );
    }

    #[test]
    fn test_stop_cancels_pending_wait() {
        let rig = Rig::new(Track::new("/music/a.mp3"), Duration::ZERO);
        rig.player.lock().unwrap().state = PlaybackState::Waiting;
        let mut controller = PlaybackController::new(rig.handles.clone());

        let wait = controller.wait_before_playing();
        controller.stop();

        assert!(wait.is_cancelled());
        assert_eq!(rig.calls(), vec!["player.stop".to_string(), "sequencer.end".to_string()]);
    }

    #[test]
    fn test_second_stop_is_harmless() {
        let rig = Rig::new(Track::new("/music/a.mp3"), Duration::ZERO);
        let mut controller = PlaybackController::new(rig.handles.clone());

        assert!(controller.stop().is_completed());
        let outcome = controller.stop();

        assert!(outcome.is_completed());
        assert_eq!(outcome.context().current_state, PlaybackState::NoTrack);
        // The player was already stopped, so only the sequencer is touched again
        assert_eq!(
            rig.calls(),
            vec!["player.stop", "sequencer.end", "sequencer.end"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_wait_survives_an_aborted_stop() {
        let rig = Rig::new(Track::new("/music/a.mp3"), Duration::ZERO);
        rig.player.lock().unwrap().state = PlaybackState::Waiting;
        poison(&rig.handles.preferences);
        let mut controller = PlaybackController::new(rig.handles.clone());
        let wait = controller.wait_before_playing();

        match controller.stop() {
            ChainOutcome::Aborted { action, .. } => assert_eq!(action, "save_playback_profile"),
            other => panic!("expected abort, got {:?}", other),
        }
        assert!(!wait.is_cancelled());
        assert!(controller.has_pending_wait());

        rig.handles.preferences.clear_poison();
        assert!(controller.stop().is_completed());
        assert!(wait.is_cancelled());
        assert!(!controller.has_pending_wait());
    }

    #[test]
    fn test_finish_wait_hands_back_the_delay() {
        let rig = Rig::new(Track::new("/music/a.mp3"), Duration::ZERO);
        let mut controller = PlaybackController::new(rig.handles.clone());

        let wait = controller.wait_before_playing();
        assert!(controller.finish_wait());
        assert!(!controller.has_pending_wait());

        // Nothing left for a stop to cancel
        controller.stop();
        assert!(!wait.is_cancelled());
        assert!(!controller.finish_wait());
    }

    #[test]
    fn test_poisoned_player_surfaces_as_abort() {
        let rig = Rig::new(Track::new("/music/a.mp3"), Duration::ZERO);
        poison(&rig.player);
        let mut controller = PlaybackController::new(rig.handles.clone());

        match controller.stop() {
            ChainOutcome::Aborted { action, .. } => assert_eq!(action, "halt_playback"),
            other => panic!("expected abort, got {:?}", other),
        }
        assert_eq!(controller.stop_chain_state(), ChainState::Aborted);
    }
}
