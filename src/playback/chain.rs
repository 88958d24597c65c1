use super::PlaybackRequestContext;
use tracing::{debug, warn};

/// What an action tells the chain after it has run.
#[derive(Debug)]
pub enum ActionOutcome {
    Proceed,
    /// Continue, with later actions seeing this context instead.
    ProceedWith(PlaybackRequestContext),
    /// Stop here. Later actions don't run and nothing is retried.
    Abort(String),
}

/// One step of a playback command.
pub trait PlaybackChainAction {
    fn name(&self) -> &'static str;
    fn execute(&self, context: &mut PlaybackRequestContext) -> ActionOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Built,
    Executing,
    Completed,
    Aborted,
}

#[derive(Debug)]
pub enum ChainOutcome {
    Completed(PlaybackRequestContext),
    Aborted {
        action: &'static str,
        reason: String,
        context: PlaybackRequestContext,
    },
}

impl ChainOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ChainOutcome::Completed(_))
    }

    /// The context as the last action to run left it.
    pub fn context(&self) -> &PlaybackRequestContext {
        match self {
            ChainOutcome::Completed(context) => context,
            ChainOutcome::Aborted { context, .. } => context,
        }
    }
}

/// Ordered actions, built once and executed any number of times.
pub struct PlaybackChain {
    name: &'static str,
    actions: Vec<Box<dyn PlaybackChainAction>>,
    state: ChainState,
}

impl PlaybackChain {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            actions: Vec::new(),
            state: ChainState::Built,
        }
    }

    pub fn with_action(mut self, action: impl PlaybackChainAction + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|action| action.name()).collect()
    }

    /// Run every action in order against `context`.
    pub fn execute(&mut self, mut context: PlaybackRequestContext) -> ChainOutcome {
        self.state = ChainState::Executing;
        debug!("executing {} chain ({} actions)", self.name, self.actions.len());

        for action in &self.actions {
            debug!("{}: {}", self.name, action.name());
            match action.execute(&mut context) {
                ActionOutcome::Proceed => {}
                ActionOutcome::ProceedWith(replacement) => context = replacement,
                ActionOutcome::Abort(reason) => {
                    warn!("{} chain aborted by {}: {}", self.name, action.name(), reason);
                    self.state = ChainState::Aborted;
                    return ChainOutcome::Aborted {
                        action: action.name(),
                        reason,
                        context,
                    };
                }
            }
        }

        self.state = ChainState::Completed;
        ChainOutcome::Completed(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackState, Track};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    enum Behaviour {
        Proceed,
        Replace,
        Abort,
    }

    struct ScriptedAction {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    fn scripted(name: &'static str, behaviour: Behaviour) -> (ScriptedAction, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let action = ScriptedAction {
            name,
            behaviour,
            calls: Arc::clone(&calls),
        };
        (action, calls)
    }

    impl PlaybackChainAction for ScriptedAction {
        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(&self, context: &mut PlaybackRequestContext) -> ActionOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Leave a trace of the running order in the seek position
            context.current_seek_position += Duration::from_secs(1);
            match self.behaviour {
                Behaviour::Proceed => ActionOutcome::Proceed,
                Behaviour::Replace => ActionOutcome::ProceedWith(PlaybackRequestContext::new(
                    PlaybackState::Transcoding,
                    Some(Track::new("/music/replacement.mp3")),
                    Duration::from_secs(100),
                )),
                Behaviour::Abort => ActionOutcome::Abort(format!("{} refused", self.name)),
            }
        }
    }

    #[test]
    fn test_actions_run_in_order_and_complete() {
        let (first, first_calls) = scripted("first", Behaviour::Proceed);
        let (second, second_calls) = scripted("second", Behaviour::Proceed);
        let mut chain = PlaybackChain::new("test").with_action(first).with_action(second);
        assert_eq!(chain.state(), ChainState::Built);
        assert_eq!(chain.action_names(), vec!["first", "second"]);

        let outcome = chain.execute(PlaybackRequestContext::idle());

        assert!(outcome.is_completed());
        assert_eq!(chain.state(), ChainState::Completed);
        assert_eq!(outcome.context().current_seek_position, Duration::from_secs(2));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_abort_skips_remaining_actions() {
        let (first, first_calls) = scripted("first", Behaviour::Proceed);
        let (blocker, blocker_calls) = scripted("blocker", Behaviour::Abort);
        let (third, third_calls) = scripted("third", Behaviour::Proceed);
        let (fourth, fourth_calls) = scripted("fourth", Behaviour::Proceed);
        let mut chain = PlaybackChain::new("test")
            .with_action(first)
            .with_action(blocker)
            .with_action(third)
            .with_action(fourth);

        let outcome = chain.execute(PlaybackRequestContext::idle());

        match outcome {
            ChainOutcome::Aborted { action, reason, context } => {
                assert_eq!(action, "blocker");
                assert_eq!(reason, "blocker refused");
                assert_eq!(context.current_seek_position, Duration::from_secs(2));
            }
            other => panic!("expected abort, got {:?}", other),
        }
        assert_eq!(chain.state(), ChainState::Aborted);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(blocker_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fourth_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_replacement_context_flows_downstream() {
        let (swap, _) = scripted("swap", Behaviour::Replace);
        let (after, _) = scripted("after", Behaviour::Proceed);
        let mut chain = PlaybackChain::new("test").with_action(swap).with_action(after);

        let outcome = chain.execute(PlaybackRequestContext::idle());
        let context = outcome.context();

        assert_eq!(context.current_state, PlaybackState::Transcoding);
        assert_eq!(context.current_seek_position, Duration::from_secs(101));
        assert_eq!(
            context.current_track.as_ref().map(|t| t.file.display().to_string()).as_deref(),
            Some("/music/replacement.mp3")
        );
    }

    #[test]
    fn test_chain_is_reusable_after_abort() {
        let (blocker, blocker_calls) = scripted("blocker", Behaviour::Abort);
        let mut chain = PlaybackChain::new("test").with_action(blocker);

        assert!(!chain.execute(PlaybackRequestContext::idle()).is_completed());
        assert!(!chain.execute(PlaybackRequestContext::idle()).is_completed());
        assert_eq!(blocker_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_chain_completes() {
        let mut chain = PlaybackChain::new("empty");
        assert!(chain.execute(PlaybackRequestContext::idle()).is_completed());
        assert_eq!(chain.state(), ChainState::Completed);
    }
}
