use super::Track;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

const MAX_FILE_SIZE: u64 = 1_000_000_000;

/// Finds playable files on disk. Tags are not read here; the metadata
/// loader fills tracks in on demand.
#[derive(Clone)]
pub struct MusicScanner {
    supported_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ScanProgress {
    Started { total_directories: usize },
    TrackFound { track: Track, progress: usize },
    DirectoryCompleted { path: PathBuf, tracks_found: usize },
    Completed { total_tracks: usize },
    Error { path: PathBuf, error: String },
}

impl MusicScanner {
    pub fn new() -> Self {
        Self {
            supported_extensions: [
                "mp3", "flac", "ogg", "oga", "m4a", "m4b", "mp4", "aac", "wav", "aif", "aiff",
                "aifc",
            ]
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
        }
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Track>> {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() || !self.is_candidate(entry.path()) {
                continue;
            }
            match self.create_track_from_file(entry.path()) {
                Ok(track) => tracks.push(track),
                Err(e) => debug!("skipping {}: {}", entry.path().display(), e),
            }
        }

        Ok(tracks)
    }

    pub fn scan_directories(&self, paths: &[PathBuf]) -> Result<Vec<Track>> {
        let mut all_tracks = Vec::new();

        for path in paths {
            if path.exists() {
                all_tracks.append(&mut self.scan_directory(path)?);
            } else {
                warn!("music directory {} does not exist", path.display());
            }
        }

        Ok(all_tracks)
    }

    /// Same walk as `scan_directories`, reporting each track as it's found.
    pub async fn scan_directories_incremental(
        &self,
        paths: &[PathBuf],
        progress_tx: mpsc::Sender<ScanProgress>,
    ) -> Result<Vec<Track>> {
        let mut all_tracks = Vec::new();
        let _ = progress_tx
            .send(ScanProgress::Started { total_directories: paths.len() })
            .await;

        for path in paths {
            if !path.exists() {
                let _ = progress_tx
                    .send(ScanProgress::Error {
                        path: path.clone(),
                        error: "Directory does not exist".to_string(),
                    })
                    .await;
                continue;
            }

            let mut directory_tracks = 0;
            for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(Result::ok) {
                let entry_path = entry.path();
                if !entry.file_type().is_file() || !self.is_candidate(entry_path) {
                    continue;
                }

                match self.create_track_from_file(entry_path) {
                    Ok(track) => {
                        directory_tracks += 1;
                        all_tracks.push(track.clone());
                        let _ = progress_tx
                            .send(ScanProgress::TrackFound {
                                track,
                                progress: all_tracks.len(),
                            })
                            .await;

                        if all_tracks.len() % 10 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                    Err(e) => {
                        let _ = progress_tx
                            .send(ScanProgress::Error {
                                path: entry_path.to_path_buf(),
                                error: e.to_string(),
                            })
                            .await;
                    }
                }
            }

            let _ = progress_tx
                .send(ScanProgress::DirectoryCompleted {
                    path: path.clone(),
                    tracks_found: directory_tracks,
                })
                .await;
        }

        let _ = progress_tx
            .send(ScanProgress::Completed { total_tracks: all_tracks.len() })
            .await;
        Ok(all_tracks)
    }

    pub fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.supported_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    // Dotfiles, empty files and anything over 1GB are ignored
    fn is_candidate(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with('.'));
        if hidden || !self.is_supported_file(path) {
            return false;
        }
        match fs::metadata(path) {
            Ok(metadata) => metadata.len() > 0 && metadata.len() <= MAX_FILE_SIZE,
            Err(_) => false,
        }
    }

    fn create_track_from_file(&self, path: &Path) -> Result<Track> {
        let mut track = Track::new(path);
        track.file_size = fs::metadata(path)?.len();
        Ok(track)
    }
}

impl Default for MusicScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, bytes: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_scan_filters_candidates() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.mp3"), b"data");
        touch(&dir.path().join("nested/b.FLAC"), b"data");
        touch(&dir.path().join("nested/deeper/c.m4b"), b"data");
        touch(&dir.path().join(".hidden.mp3"), b"data");
        touch(&dir.path().join("empty.mp3"), b"");
        touch(&dir.path().join("notes.txt"), b"data");

        let scanner = MusicScanner::new();
        let mut names: Vec<String> = scanner
            .scan_directory(dir.path())
            .unwrap()
            .iter()
            .map(|t| t.file.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.mp3", "b.FLAC", "c.m4b"]);
    }

    #[test]
    fn test_scanned_tracks_carry_size_and_reader() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("song.flac"), b"12345");

        let tracks = MusicScanner::new().scan_directory(dir.path()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].file_size, 5);
        assert!(!tracks[0].metadata_natively_supported);
        assert!(tracks[0].primary.title.is_none());
    }

    #[test]
    fn test_missing_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.wav"), b"data");

        let tracks = MusicScanner::new()
            .scan_directories(&[dir.path().join("missing"), dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_incremental_scan_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.mp3"), b"data");
        touch(&dir.path().join("b.ogg"), b"data");

        let (tx, mut rx) = mpsc::channel(32);
        let tracks = MusicScanner::new()
            .scan_directories_incremental(&[dir.path().to_path_buf()], tx)
            .await
            .unwrap();
        assert_eq!(tracks.len(), 2);

        let mut found = 0;
        let mut completed = None;
        while let Some(event) = rx.recv().await {
            match event {
                ScanProgress::TrackFound { .. } => found += 1,
                ScanProgress::Completed { total_tracks } => completed = Some(total_tracks),
                _ => {}
            }
        }
        assert_eq!(found, 2);
        assert_eq!(completed, Some(2));
    }
}
