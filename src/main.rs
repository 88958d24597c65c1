// trackchain - command line front-end
// Inspect tags, list a library, or play a queue and stop it through the stop chain

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use trackchain::metadata::{PrimaryMetadata, ReaderKind, SecondaryMetadata};
use trackchain::{ArtworkCache, Config, MetadataKeySpecs, MetadataLoader, MusicScanner, Track};

#[derive(Parser)]
#[command(name = "trackchain")]
#[command(about = "Track metadata and playback chains from the command line")]
struct Args {
    /// Enable developer logging (stderr instead of the log file)
    #[arg(long, global = true)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print everything the readers find in some files
    Info {
        files: Vec<PathBuf>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List playable files (defaults to the configured music directories)
    Scan { directories: Vec<PathBuf> },
    /// Play files or directories for a while, then stop
    #[cfg(feature = "audio")]
    Play {
        paths: Vec<PathBuf>,
        /// How long to play before stopping
        #[arg(long, default_value_t = 10)]
        seconds: u64,
        /// Wait this long before the first track starts
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Output volume from 0.0 to 1.0 (defaults to the configured one)
        #[arg(long)]
        volume: Option<f32>,
    },
}

fn init_logging(dev: bool) -> Result<Option<WorkerGuard>> {
    // Base filter: info level for general logs, debug for trackchain
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,trackchain=debug"));

    if dev {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_env_filter(filter)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(None);
    }

    let log_dir = PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&log_dir, "trackchain.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Some(guard))
}

#[derive(Serialize)]
struct TrackReport {
    file: PathBuf,
    reader: &'static str,
    primary: PrimaryMetadata,
    secondary: SecondaryMetadata,
    tags: Vec<(String, String)>,
    artwork: Option<ArtworkReport>,
}

#[derive(Serialize)]
struct ArtworkReport {
    mime_type: String,
    bytes: usize,
}

fn report_for(loader: &MetadataLoader, specs: &MetadataKeySpecs, file: PathBuf) -> TrackReport {
    let mut track = Track::new(file);
    loader.load_primary(&mut track);
    loader.load_secondary(&mut track);
    loader.load_all(&mut track);
    loader.load_art(&mut track);

    let reader = match ReaderKind::for_file(&track.file) {
        ReaderKind::Native => "native",
        ReaderKind::Fallback => "fallback",
    };
    let tags = specs.labelled_entries(&mut track.metadata);

    TrackReport {
        reader,
        tags,
        artwork: track.art.as_ref().map(|art| ArtworkReport {
            mime_type: art.mime_type.clone(),
            bytes: art.data.len(),
        }),
        primary: track.primary,
        secondary: track.secondary,
        file: track.file,
    }
}

fn print_report(report: &TrackReport) {
    println!("{} ({} reader)", report.file.display(), report.reader);
    let fields = [
        ("Title", report.primary.title.clone()),
        ("Artist", report.primary.artist.clone()),
        ("Album", report.primary.album.clone()),
        ("Genre", report.primary.genre.clone()),
        ("Duration", report.primary.duration.map(|d| format!("{:.1}s", d.as_secs_f64()))),
        ("Track", report.secondary.track_number.map(|n| n.to_string())),
        ("Disc", report.secondary.disc_number.map(|n| n.to_string())),
    ];
    for (label, value) in fields {
        println!("  {:<10} {}", label, value.unwrap_or_else(|| "unknown".to_string()));
    }
    for (label, value) in &report.tags {
        println!("  [{}] {}", label, value);
    }
    match &report.artwork {
        Some(art) => println!("  artwork: {} ({} bytes)", art.mime_type, art.bytes),
        None => println!("  artwork: none"),
    }
}

fn run_info(files: Vec<PathBuf>, json: bool) -> Result<()> {
    let loader = MetadataLoader::new(Arc::new(ArtworkCache::new()));
    let specs = MetadataKeySpecs::new();

    let reports: Vec<TrackReport> = files
        .into_iter()
        .map(|file| report_for(&loader, &specs, file))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    info!(
        "reported {} files ({} long-form fallbacks)",
        reports.len(),
        specs.fallback_lookups()
    );
    Ok(())
}

fn run_scan(config: &Config, directories: Vec<PathBuf>) -> Result<()> {
    let directories = if directories.is_empty() {
        config.music_directories.clone()
    } else {
        directories
    };

    let tracks = MusicScanner::new().scan_directories(&directories)?;
    for track in &tracks {
        println!("{}", track.file.display());
    }
    info!("scan found {} tracks", tracks.len());
    Ok(())
}

#[cfg(feature = "audio")]
mod play {
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use tokio::sync::mpsc;
    use tokio::time::sleep;
    use tracing::{debug, warn};
    use trackchain::audio::{
        AudioPlayer, PlaybackState, Player, PlayerError, PlayerEvent, Sequencer, Sequencing,
        Transcoder, Transcoding,
    };
    use trackchain::playback::{PlaybackPreferences, PlaybackProfiles, Shared};
    use trackchain::{
        ArtworkCache, ChainOutcome, Config, MetadataLoader, MusicScanner, PlaybackController,
        PlaybackHandles, Track,
    };

    fn collect_tracks(paths: &[PathBuf]) -> Result<Vec<Track>> {
        let scanner = MusicScanner::new();
        let mut tracks = Vec::new();
        for path in paths {
            if path.is_dir() {
                tracks.extend(scanner.scan_directory(path)?);
            } else if scanner.is_supported_file(path) {
                tracks.push(Track::new(path));
            } else {
                warn!("skipping unsupported file {}", path.display());
            }
        }
        Ok(tracks)
    }

    #[cfg(feature = "persist")]
    fn load_profiles(config: &Config) -> PlaybackProfiles {
        use trackchain::playback::ProfileDatabase;

        match ProfileDatabase::new(&config.profiles_db_path).and_then(|db| db.load_profiles()) {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("could not load playback profiles: {}", e);
                PlaybackProfiles::new()
            }
        }
    }

    #[cfg(not(feature = "persist"))]
    fn load_profiles(_config: &Config) -> PlaybackProfiles {
        PlaybackProfiles::new()
    }

    #[cfg(feature = "persist")]
    fn save_profiles(config: &Config, profiles: &PlaybackProfiles) -> Result<()> {
        use trackchain::playback::ProfileDatabase;

        if let Some(parent) = config.profiles_db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        ProfileDatabase::new(&config.profiles_db_path)?.save_profiles(profiles)?;
        Ok(())
    }

    #[cfg(not(feature = "persist"))]
    fn save_profiles(_config: &Config, _profiles: &PlaybackProfiles) -> Result<()> {
        Ok(())
    }

    /// Start `track`, handing it to the transcoder when the output can't decode it.
    fn start(
        track: Track,
        player: &Mutex<AudioPlayer>,
        transcoder: &Mutex<Transcoder>,
    ) -> Result<()> {
        let mut player = player.lock().map_err(|_| anyhow::anyhow!("player handle is poisoned"))?;
        match player.play_track(track.clone()) {
            Ok(()) => Ok(()),
            Err(PlayerError::Decode { message, .. }) => {
                debug!("output can't decode {} ({}), transcoding", track.file.display(), message);
                transcoder
                    .lock()
                    .map_err(|_| anyhow::anyhow!("transcoder handle is poisoned"))?
                    .transcode(&track);
                player.begin_transcoding(track);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Pick up a finished conversion for the track the player is parked on.
    fn poll_transcoder(player: &Mutex<AudioPlayer>, transcoder: &Mutex<Transcoder>) -> Result<()> {
        let finished = transcoder
            .lock()
            .map_err(|_| anyhow::anyhow!("transcoder handle is poisoned"))?
            .collect_finished();
        let mut player = player.lock().map_err(|_| anyhow::anyhow!("player handle is poisoned"))?;

        for (file, result) in finished {
            let waiting_on = player
                .playing_track()
                .filter(|track| player.state() == PlaybackState::Transcoding && track.file == file);
            match (waiting_on, result) {
                (Some(track), Ok(output)) => player.play_track_from(track, &output)?,
                (Some(_), Err(e)) => {
                    warn!("giving up on {}: {}", file.display(), e);
                    player.stop()?;
                }
                (None, _) => {}
            }
        }
        Ok(())
    }

    pub struct Options {
        pub seconds: u64,
        pub delay_ms: u64,
        pub volume: Option<f32>,
    }

    pub async fn run(config: &Config, paths: Vec<PathBuf>, options: Options) -> Result<()> {
        let tracks = collect_tracks(&paths)?;
        if tracks.is_empty() {
            anyhow::bail!("nothing to play");
        }

        let loader = MetadataLoader::new(Arc::new(ArtworkCache::new()));
        let player = Arc::new(Mutex::new(AudioPlayer::new(config.audio.clone())?));
        let sequencer = Arc::new(Mutex::new(Sequencer::new(tracks)));
        let transcoder = Arc::new(Mutex::new(Transcoder::new(&config.transcode_dir)));
        let profiles = Arc::new(Mutex::new(load_profiles(config)));
        let preferences: Shared<PlaybackPreferences> =
            Arc::new(Mutex::new(config.playback.clone()));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        if let Ok(mut player) = player.lock() {
            player.set_event_sender(event_tx);
            if let Some(volume) = options.volume {
                player.set_volume(volume);
            }
        }

        let player_handle: Shared<dyn Player> = player.clone();
        let sequencer_handle: Shared<dyn Sequencing> = sequencer.clone();
        let transcoder_handle: Shared<dyn Transcoding> = transcoder.clone();
        let mut controller = PlaybackController::new(PlaybackHandles {
            player: player_handle,
            sequencer: sequencer_handle,
            transcoder: transcoder_handle,
            profiles,
            preferences,
        });

        let first = sequencer
            .lock()
            .map_err(|_| anyhow::anyhow!("sequencer handle is poisoned"))?
            .begin()
            .cloned();
        let mut current = first;
        // Set while the first track sits out its delay
        let mut starts_at: Option<Instant> = None;
        if let Some(track) = current.as_mut() {
            loader.load_primary(track);
            print_resume_hint(&controller.handles().profiles, track.path());
            if options.delay_ms > 0 {
                player
                    .lock()
                    .map_err(|_| anyhow::anyhow!("player handle is poisoned"))?
                    .begin_waiting(track.clone());
                controller.wait_before_playing();
                starts_at = Some(Instant::now() + Duration::from_millis(options.delay_ms));
                println!("starting in {} ms", options.delay_ms);
            } else {
                start(track.clone(), &player, &transcoder)?;
            }
        }

        let deadline = Instant::now() + Duration::from_secs(options.seconds);
        while Instant::now() < deadline && current.is_some() {
            sleep(Duration::from_millis(100)).await;

            if starts_at.is_some_and(|at| Instant::now() >= at) {
                starts_at = None;
                if controller.finish_wait() {
                    if let Some(track) = current.clone() {
                        start(track, &player, &transcoder)?;
                    }
                }
            }
            poll_transcoder(&player, &transcoder)?;

            while let Ok(event) = event_rx.try_recv() {
                match event {
                    PlayerEvent::TrackStarted(track) => {
                        println!("now playing: {}", track.display_name())
                    }
                    PlayerEvent::VolumeChanged(volume) => println!("volume {:.2}", volume),
                    PlayerEvent::Error(message) => warn!("player: {}", message),
                    PlayerEvent::TrackStopped => {}
                }
            }

            let finished = player
                .lock()
                .map(|p| p.state() == PlaybackState::Playing && p.is_finished())
                .unwrap_or(false);
            if finished {
                current = sequencer
                    .lock()
                    .map_err(|_| anyhow::anyhow!("sequencer handle is poisoned"))?
                    .next()
                    .cloned();
                if let Some(track) = current.as_mut() {
                    loader.load_primary(track);
                    start(track.clone(), &player, &transcoder)?;
                }
            }
        }

        match controller.stop() {
            ChainOutcome::Completed(context) => {
                println!("stopped (state {:?})", context.current_state)
            }
            ChainOutcome::Aborted { action, reason, .. } => {
                println!("stop aborted in {}: {}", action, reason)
            }
        }

        let profiles = controller
            .handles()
            .profiles
            .lock()
            .map_err(|_| anyhow::anyhow!("profiles handle is poisoned"))?;
        save_profiles(config, &profiles)?;
        Ok(())
    }

    fn print_resume_hint(profiles: &Mutex<PlaybackProfiles>, file: &Path) {
        if let Ok(profiles) = profiles.lock() {
            if let Some(profile) = profiles.get(file) {
                println!(
                    "last stopped at {:.1}s on {}",
                    profile.last_position.as_secs_f64(),
                    profile.saved_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.dev)?;

    // Load config - falls back to defaults if missing
    let config = Config::load()?;

    match args.command {
        Command::Info { files, json } => run_info(files, json),
        Command::Scan { directories } => run_scan(&config, directories),
        #[cfg(feature = "audio")]
        Command::Play {
            paths,
            seconds,
            delay_ms,
            volume,
        } => play::run(&config, paths, play::Options { seconds, delay_ms, volume }).await,
    }
}
