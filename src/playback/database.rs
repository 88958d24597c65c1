use super::profiles::{PlaybackProfile, PlaybackProfiles};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("database: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("bad timestamp '{value}' for {file}")]
    Timestamp { file: String, value: String },
}

/// SQLite store for remembered playback positions.
pub struct ProfileDatabase {
    conn: Connection,
}

impl ProfileDatabase {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, ProfileError> {
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.initialize_tables()?;
        Ok(db)
    }

    fn initialize_tables(&self) -> Result<(), ProfileError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS playback_profiles (
                file BLOB PRIMARY KEY,
                last_position_ms INTEGER NOT NULL DEFAULT 0,
                saved_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn save_profile(&self, profile: &PlaybackProfile) -> Result<(), ProfileError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO playback_profiles (file, last_position_ms, saved_at)
             VALUES (?1, ?2, ?3)",
            params![
                path_key(&profile.file),
                profile.last_position.as_millis() as i64,
                profile.saved_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, file: &Path) -> Result<Option<PlaybackProfile>, ProfileError> {
        let mut stmt = self.conn.prepare(
            "SELECT file, last_position_ms, saved_at FROM playback_profiles WHERE file = ?1",
        )?;
        let raw = stmt
            .query_row(params![path_key(file)], raw_profile)
            .optional()?;
        raw.map(into_profile).transpose()
    }

    pub fn remove_profile(&self, file: &Path) -> Result<bool, ProfileError> {
        let removed = self.conn.execute(
            "DELETE FROM playback_profiles WHERE file = ?1",
            params![path_key(file)],
        )?;
        Ok(removed > 0)
    }

    pub fn load_profiles(&self) -> Result<PlaybackProfiles, ProfileError> {
        let mut stmt = self
            .conn
            .prepare("SELECT file, last_position_ms, saved_at FROM playback_profiles")?;
        let rows = stmt
            .query_map([], raw_profile)?
            .collect::<Result<Vec<_>, _>>()?;

        let profiles = rows
            .into_iter()
            .map(into_profile)
            .collect::<Result<PlaybackProfiles, _>>()?;
        debug!("loaded {} playback profiles", profiles.len());
        Ok(profiles)
    }

    /// Make the table match `profiles` exactly.
    pub fn save_profiles(&mut self, profiles: &PlaybackProfiles) -> Result<(), ProfileError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM playback_profiles", [])?;
        for profile in profiles.all() {
            tx.execute(
                "INSERT INTO playback_profiles (file, last_position_ms, saved_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    path_key(&profile.file),
                    profile.last_position.as_millis() as i64,
                    profile.saved_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        debug!("saved {} playback profiles", profiles.len());
        Ok(())
    }
}

// Paths are keyed by their raw bytes so names that aren't valid UTF-8 stay distinct
#[cfg(unix)]
fn path_key(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(unix)]
fn path_from_key(key: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(key))
}

#[cfg(not(unix))]
fn path_key(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(not(unix))]
fn path_from_key(key: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&key).into_owned())
}

type RawProfile = (Vec<u8>, i64, String);

fn raw_profile(row: &Row) -> rusqlite::Result<RawProfile> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_profile((key, position_ms, saved_at): RawProfile) -> Result<PlaybackProfile, ProfileError> {
    let file = path_from_key(key);
    let saved_at = DateTime::parse_from_rfc3339(&saved_at)
        .map_err(|_| ProfileError::Timestamp {
            file: file.display().to_string(),
            value: saved_at.clone(),
        })?
        .with_timezone(&Utc);

    Ok(PlaybackProfile {
        file,
        last_position: Duration::from_millis(position_ms.max(0) as u64),
        saved_at,
    })
}
