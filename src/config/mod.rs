// Configuration management for trackchain
// Loads/saves settings, writing sensible defaults when the config is missing

use crate::audio::AudioConfig;
use crate::playback::PlaybackPreferences;
use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub music_directories: Vec<PathBuf>,
    pub profiles_db_path: PathBuf,
    /// Where converted copies of non-native files go.
    pub transcode_dir: PathBuf,
    pub playback: PlaybackPreferences,
    pub audio: AudioConfig,
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trackchain");

        Self {
            music_directories: vec![dirs::audio_dir().unwrap_or_else(|| PathBuf::from("~/Music"))],
            profiles_db_path: app_dir.join("profiles.db"),
            transcode_dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("trackchain")
                .join("transcoded"),
            playback: PlaybackPreferences::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read `path`, or write the defaults there when it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("trackchain");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::RememberPositionOption;

    #[test]
    fn test_missing_config_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert!(config.playback.remember_last_position);
        assert_eq!(config.audio.volume, AudioConfig::default().volume);
    }

    #[test]
    fn test_saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.music_directories = vec![PathBuf::from("/srv/music")];
        config.playback.remember_last_position_option = RememberPositionOption::IndividualTracks;
        config.audio.volume = 0.25;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.music_directories, vec![PathBuf::from("/srv/music")]);
        assert_eq!(
            loaded.playback.remember_last_position_option,
            RememberPositionOption::IndividualTracks
        );
        assert_eq!(loaded.audio.volume, 0.25);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "music_directories = [\"/a\"]\n\n[playback]\nremember_last_position = false\nremember_last_position_option = \"all_tracks\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.music_directories, vec![PathBuf::from("/a")]);
        assert!(!config.playback.remember_last_position);
        assert_eq!(config.audio.volume, AudioConfig::default().volume);
    }

    #[test]
    fn test_old_fade_setting_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[audio]\nvolume = 0.5\nfade_out_duration = 200\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.audio.volume, 0.5);
    }
}
