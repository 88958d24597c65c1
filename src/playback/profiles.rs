use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which tracks get their last position remembered on stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RememberPositionOption {
    /// Only tracks that already have a profile.
    IndividualTracks,
    #[default]
    AllTracks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPreferences {
    pub remember_last_position: bool,
    pub remember_last_position_option: RememberPositionOption,
}

impl Default for PlaybackPreferences {
    fn default() -> Self {
        Self {
            remember_last_position: true,
            remember_last_position_option: RememberPositionOption::AllTracks,
        }
    }
}

/// Where playback of a file last stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackProfile {
    pub file: PathBuf,
    pub last_position: Duration,
    pub saved_at: DateTime<Utc>,
}

impl PlaybackProfile {
    pub fn new(file: impl Into<PathBuf>, last_position: Duration) -> Self {
        Self {
            file: file.into(),
            last_position,
            saved_at: Utc::now(),
        }
    }
}

/// One profile per file; adding again replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct PlaybackProfiles {
    profiles: HashMap<PathBuf, PlaybackProfile>,
}

impl PlaybackProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, profile: PlaybackProfile) {
        self.profiles.insert(profile.file.clone(), profile);
    }

    pub fn get(&self, file: &Path) -> Option<&PlaybackProfile> {
        self.profiles.get(file)
    }

    pub fn has_for(&self, file: &Path) -> bool {
        self.profiles.contains_key(file)
    }

    pub fn remove(&mut self, file: &Path) -> Option<PlaybackProfile> {
        self.profiles.remove(file)
    }

    /// Most recently saved first.
    pub fn all(&self) -> Vec<&PlaybackProfile> {
        let mut all: Vec<_> = self.profiles.values().collect();
        all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.file.cmp(&b.file)));
        all
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<PlaybackProfile> for PlaybackProfiles {
    fn from_iter<I: IntoIterator<Item = PlaybackProfile>>(iter: I) -> Self {
        let mut profiles = Self::new();
        for profile in iter {
            profiles.add(profile);
        }
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_add_replaces_existing_profile() {
        let mut profiles = PlaybackProfiles::new();
        profiles.add(PlaybackProfile::new("/music/a.mp3", Duration::from_secs(10)));
        profiles.add(PlaybackProfile::new("/music/a.mp3", Duration::from_secs(42)));

        assert_eq!(profiles.len(), 1);
        let profile = profiles.get(Path::new("/music/a.mp3")).unwrap();
        assert_eq!(profile.last_position, Duration::from_secs(42));
    }

    #[test]
    fn test_remove_and_has_for() {
        let mut profiles: PlaybackProfiles =
            [PlaybackProfile::new("/music/a.mp3", Duration::ZERO)].into_iter().collect();
        assert!(profiles.has_for(Path::new("/music/a.mp3")));
        assert!(profiles.remove(Path::new("/music/a.mp3")).is_some());
        assert!(!profiles.has_for(Path::new("/music/a.mp3")));
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_all_is_most_recent_first() {
        let mut older = PlaybackProfile::new("/music/old.mp3", Duration::ZERO);
        older.saved_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut newer = PlaybackProfile::new("/music/new.mp3", Duration::ZERO);
        newer.saved_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let profiles: PlaybackProfiles = [older, newer].into_iter().collect();
        let files: Vec<_> = profiles.all().iter().map(|p| p.file.clone()).collect();
        assert_eq!(files, vec![PathBuf::from("/music/new.mp3"), PathBuf::from("/music/old.mp3")]);
    }

    #[test]
    fn test_preferences_toml_names() {
        let prefs = PlaybackPreferences {
            remember_last_position: false,
            remember_last_position_option: RememberPositionOption::IndividualTracks,
        };
        let text = toml::to_string(&prefs).unwrap();
        assert!(text.contains("remember_last_position_option = \"individual_tracks\""));
        assert_eq!(toml::from_str::<PlaybackPreferences>(&text).unwrap(), prefs);
    }
}
