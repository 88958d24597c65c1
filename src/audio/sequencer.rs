// Play queue ordering - which track comes next, with repeat and shuffle

use super::Track;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShuffleMode {
    #[default]
    Off,
    On,
}

/// What playback chains need from the sequencer.
pub trait Sequencing {
    fn current(&self) -> Option<&Track>;
    /// Forget the current position in the sequence. The queue stays.
    fn end(&mut self);
}

#[derive(Debug, Default)]
pub struct Sequencer {
    tracks: Vec<Track>,
    order: Vec<usize>,       // play order as indices into `tracks`
    cursor: Option<usize>,   // position within `order`
    repeat: RepeatMode,
    shuffle: ShuffleMode,
}

impl Sequencer {
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut sequencer = Self {
            tracks,
            ..Default::default()
        };
        sequencer.rebuild_order();
        sequencer
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn add(&mut self, track: Track) {
        if self.tracks.contains(&track) {
            return;
        }
        self.tracks.push(track);
        self.order.push(self.tracks.len() - 1);
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle_mode(&self) -> ShuffleMode {
        self.shuffle
    }

    pub fn set_repeat_mode(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    /// Changing shuffle rebuilds the order; the current track keeps playing
    /// and becomes the head of the new order.
    pub fn set_shuffle_mode(&mut self, shuffle: ShuffleMode) {
        if self.shuffle == shuffle {
            return;
        }
        self.shuffle = shuffle;
        let current = self.current_index();
        self.rebuild_order();

        if let Some(index) = current {
            if let Some(pos) = self.order.iter().position(|&i| i == index) {
                self.order.swap(0, pos);
                self.cursor = Some(0);
            }
        }
    }

    fn rebuild_order(&mut self) {
        self.order = (0..self.tracks.len()).collect();
        if self.shuffle == ShuffleMode::On {
            self.order.shuffle(&mut rand::thread_rng());
        }
        self.cursor = None;
    }

    fn current_index(&self) -> Option<usize> {
        self.cursor.and_then(|pos| self.order.get(pos).copied())
    }

    /// Start from the head of the order.
    pub fn begin(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        if self.shuffle == ShuffleMode::On {
            self.rebuild_order();
        }
        self.cursor = Some(0);
        self.current()
    }

    /// Jump to a specific queue index.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        let pos = self.order.iter().position(|&i| i == index)?;
        self.cursor = Some(pos);
        self.current()
    }

    pub fn next(&mut self) -> Option<&Track> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }

        self.cursor = match (self.cursor, self.repeat) {
            (None, _) => Some(0),
            (Some(pos), RepeatMode::One) => Some(pos),
            (Some(pos), _) if pos + 1 < len => Some(pos + 1),
            (Some(_), RepeatMode::All) => Some(0),
            (Some(_), RepeatMode::Off) => None,
        };
        self.current()
    }

    pub fn previous(&mut self) -> Option<&Track> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }

        self.cursor = match (self.cursor, self.repeat) {
            (None, _) => None,
            (Some(pos), RepeatMode::One) => Some(pos),
            (Some(pos), _) if pos > 0 => Some(pos - 1),
            (Some(_), RepeatMode::All) => Some(len - 1),
            (Some(_), RepeatMode::Off) => None,
        };
        self.current()
    }
}

impl Sequencing for Sequencer {
    fn current(&self) -> Option<&Track> {
        self.current_index().and_then(|i| self.tracks.get(i))
    }

    fn end(&mut self) {
        if self.cursor.take().is_some() {
            debug!("playback sequence ended");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(n: usize) -> Sequencer {
        Sequencer::new((0..n).map(|i| Track::new(format!("/music/{}.mp3", i))).collect())
    }

    fn file_of(track: Option<&Track>) -> Option<String> {
        track.map(|t| t.file.display().to_string())
    }

    #[test]
    fn test_linear_order_without_repeat() {
        let mut seq = queue(3);
        assert!(seq.current().is_none());
        assert_eq!(file_of(seq.begin()).as_deref(), Some("/music/0.mp3"));
        assert_eq!(file_of(seq.next()).as_deref(), Some("/music/1.mp3"));
        assert_eq!(file_of(seq.next()).as_deref(), Some("/music/2.mp3"));
        assert!(seq.next().is_none());
    }

    #[test]
    fn test_repeat_modes() {
        let mut seq = queue(2);
        seq.set_repeat_mode(RepeatMode::All);
        seq.select(1);
        assert_eq!(file_of(seq.next()).as_deref(), Some("/music/0.mp3"));
        assert_eq!(file_of(seq.previous()).as_deref(), Some("/music/1.mp3"));

        seq.set_repeat_mode(RepeatMode::One);
        assert_eq!(file_of(seq.next()).as_deref(), Some("/music/1.mp3"));
    }

    #[test]
    fn test_shuffle_keeps_every_track_once() {
        let mut seq = queue(20);
        seq.set_shuffle_mode(ShuffleMode::On);
        seq.begin();
        let mut seen = vec![file_of(seq.current()).unwrap()];
        while let Some(track) = seq.next() {
            seen.push(track.file.display().to_string());
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn test_shuffle_toggle_keeps_current_track() {
        let mut seq = queue(10);
        seq.select(7);
        seq.set_shuffle_mode(ShuffleMode::On);
        assert_eq!(file_of(seq.current()).as_deref(), Some("/music/7.mp3"));
    }

    #[test]
    fn test_end_clears_position_but_keeps_queue() {
        let mut seq = queue(3);
        seq.select(2);
        seq.end();
        assert!(seq.current().is_none());
        assert_eq!(seq.len(), 3);
        // Ending twice is harmless
        seq.end();
        assert_eq!(file_of(seq.next()).as_deref(), Some("/music/0.mp3"));
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut seq = queue(1);
        seq.add(Track::new("/music/0.mp3"));
        seq.add(Track::new("/music/extra.mp3"));
        assert_eq!(seq.len(), 2);
        assert_eq!(file_of(seq.select(1)).as_deref(), Some("/music/extra.mp3"));
    }
}
