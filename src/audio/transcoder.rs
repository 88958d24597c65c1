// Background transcoding - decodes files the output can't play into WAV
// Each job owns its thread; the only way to stop one is its cancellation flag

use super::Track;
use crate::metadata::stream::{audio_track, open_stream};
use crate::metadata::ReadError;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;
use tracing::{debug, info, warn};
use xxhash_rust::xxh64::xxh64;

/// Shared stop flag. Cloning hands out another view of the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("I/O: {0}")]
    Io(#[from] io::Error),

    #[error("open: {0}")]
    Open(#[from] ReadError),

    #[error("decoder: {0}")]
    Decoder(#[from] SymphoniaError),

    #[error("wav: {0}")]
    Wav(#[from] hound::Error),

    #[error("no decodable audio in {0}")]
    NoAudio(String),

    #[error("{0} decodes to more than a WAV file can hold")]
    TooLong(String),

    #[error("cancelled")]
    Cancelled,

    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// What playback chains need from the transcoder.
pub trait Transcoding {
    fn is_transcoding(&self, file: &Path) -> bool;
    /// Signal the job for `file` to stop. Returns false when there was none.
    fn cancel(&mut self, file: &Path) -> bool;
}

struct TranscodeJob {
    token: CancellationToken,
    handle: JoinHandle<Result<PathBuf, TranscodeError>>,
}

pub struct Transcoder {
    output_dir: PathBuf,
    jobs: HashMap<PathBuf, TranscodeJob>,
}

impl Transcoder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            jobs: HashMap::new(),
        }
    }

    /// Converted copy of `file`. Keyed on the whole source path so tracks
    /// sharing a file name in different folders never share an output.
    pub fn output_path_for(&self, file: &Path) -> PathBuf {
        let stem = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("track");
        let hash = xxh64(file.as_os_str().as_encoded_bytes(), 0);
        self.output_dir.join(format!("{}-{:016x}.wav", stem, hash))
    }

    /// Start converting a track in the background. Asking twice for the same
    /// file returns the running job's token.
    pub fn transcode(&mut self, track: &Track) -> CancellationToken {
        let source = track.file.clone();
        let output = self.output_path_for(&track.file);
        let output_dir = self.output_dir.clone();

        self.spawn_job(&track.file, move |token| {
            fs::create_dir_all(&output_dir)?;
            transcode_to_wav(&source, &output, token)?;
            Ok(output)
        })
    }

    /// Run arbitrary work as the job for `file`.
    pub fn spawn_job<F>(&mut self, file: &Path, work: F) -> CancellationToken
    where
        F: FnOnce(&CancellationToken) -> Result<PathBuf, TranscodeError> + Send + 'static,
    {
        if let Some(job) = self.jobs.get(file) {
            return job.token.clone();
        }

        let token = CancellationToken::new();
        let worker_token = token.clone();
        let name = file.display().to_string();
        let handle = thread::spawn(move || {
            let result = work(&worker_token);
            match &result {
                Ok(output) => info!("transcoded {} -> {}", name, output.display()),
                Err(TranscodeError::Cancelled) => debug!("transcoding of {} cancelled", name),
                Err(e) => warn!("transcoding of {} failed: {}", name, e),
            }
            result
        });

        info!("transcoding started for {}", file.display());
        self.jobs.insert(
            file.to_path_buf(),
            TranscodeJob {
                token: token.clone(),
                handle,
            },
        );
        token
    }

    pub fn pending(&self) -> usize {
        self.jobs.len()
    }

    /// Reap jobs whose threads have finished.
    pub fn collect_finished(&mut self) -> Vec<(PathBuf, Result<PathBuf, TranscodeError>)> {
        let done: Vec<PathBuf> = self
            .jobs
            .iter()
            .filter(|(_, job)| job.handle.is_finished())
            .map(|(file, _)| file.clone())
            .collect();

        done.into_iter()
            .filter_map(|file| {
                let job = self.jobs.remove(&file)?;
                let result = job
                    .handle
                    .join()
                    .unwrap_or(Err(TranscodeError::WorkerPanicked));
                Some((file, result))
            })
            .collect()
    }
}

impl Transcoding for Transcoder {
    fn is_transcoding(&self, file: &Path) -> bool {
        self.jobs.contains_key(file)
    }

    fn cancel(&mut self, file: &Path) -> bool {
        match self.jobs.remove(file) {
            // Dropping the handle detaches the thread; it exits at the next flag check
            Some(job) => {
                job.token.cancel();
                info!("cancelled transcoding for {}", file.display());
                true
            }
            None => false,
        }
    }
}

/// Decode `source` and write 16-bit PCM WAV to `output`, checking `token`
/// between packets. Samples go to a private partial file next to `output`
/// that is only renamed into place once the stream is complete, so a
/// cancelled or failed run never touches an existing `output`.
pub fn transcode_to_wav(
    source: &Path,
    output: &Path,
    token: &CancellationToken,
) -> Result<(), TranscodeError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Removed on drop unless persisted
    let partial = tempfile::Builder::new()
        .prefix(".transcode-")
        .suffix(".part")
        .tempfile_in(dir)?
        .into_temp_path();

    write_wav(source, &partial, token)?;
    if token.is_cancelled() {
        return Err(TranscodeError::Cancelled);
    }
    partial.persist(output).map_err(|e| e.error)?;
    Ok(())
}

fn write_wav(source: &Path, output: &Path, token: &CancellationToken) -> Result<(), TranscodeError> {
    let mut stream = open_stream(source)?;
    let (track_id, codec_params) = {
        let track = audio_track(&stream)
            .ok_or_else(|| TranscodeError::NoAudio(source.display().to_string()))?;
        (track.id, track.codec_params.clone())
    };

    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    // Opened on the first decoded packet, once channels and rate are known
    let mut writer: Option<WavWriter<BufWriter<File>>> = None;
    let mut written: u64 = 0;

    loop {
        if token.is_cancelled() {
            return Err(TranscodeError::Cancelled);
        }

        let packet = match stream.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt frame: skip it
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let mut samples = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        samples.copy_interleaved_ref(decoded);

        written += samples.samples().len() as u64;
        if !fits_in_wav(written) {
            return Err(TranscodeError::TooLong(source.display().to_string()));
        }
        if writer.is_none() {
            writer = Some(WavWriter::create(
                output,
                WavSpec {
                    channels: spec.channels.count() as u16,
                    sample_rate: spec.rate,
                    bits_per_sample: 16,
                    sample_format: SampleFormat::Int,
                },
            )?);
        }
        if let Some(writer) = writer.as_mut() {
            for &sample in samples.samples() {
                writer.write_sample(sample)?;
            }
        }
    }

    let writer = writer.ok_or_else(|| TranscodeError::NoAudio(source.display().to_string()))?;
    writer.finalize()?;
    Ok(())
}

// hound keeps sizes in u32 fields; leave room for the largest header it writes
const MAX_WAV_DATA_BYTES: u64 = u32::MAX as u64 - 1024;

fn fits_in_wav(samples: u64) -> bool {
    samples * 2 <= MAX_WAV_DATA_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    type Finished = Vec<(PathBuf, Result<PathBuf, TranscodeError>)>;

    fn wait_for_all(transcoder: &mut Transcoder) -> Finished {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut done = Vec::new();
        while transcoder.pending() > 0 && Instant::now() < deadline {
            done.extend(transcoder.collect_finished());
            thread::sleep(Duration::from_millis(10));
        }
        done.extend(transcoder.collect_finished());
        done
    }

    fn sine_wav(path: &Path, frames: u32) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer
                .write_sample(((i as f32 * 0.05).sin() * 8_000.0) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    fn output_for(done: &Finished, source: &Path) -> PathBuf {
        done.iter()
            .find(|(file, _)| file == source)
            .and_then(|(_, result)| result.as_ref().ok())
            .cloned()
            .expect("transcode should succeed")
    }

    #[test]
    fn test_cancel_signals_running_job() {
        let mut transcoder = Transcoder::new("/tmp/unused");
        let file = Path::new("/music/long.flac");
        let (seen_tx, seen_rx) = mpsc::channel();

        transcoder.spawn_job(file, move |token| {
            while !token.is_cancelled() {
                thread::sleep(Duration::from_millis(5));
            }
            let _ = seen_tx.send(());
            Err(TranscodeError::Cancelled)
        });
        assert!(transcoder.is_transcoding(file));

        assert!(transcoder.cancel(file));
        assert!(!transcoder.is_transcoding(file));
        seen_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker should observe the cancellation flag");

        // Nothing left to cancel
        assert!(!transcoder.cancel(file));
    }

    #[test]
    fn test_duplicate_requests_share_a_job() {
        let mut transcoder = Transcoder::new("/tmp/unused");
        let file = Path::new("/music/a.ogg");
        let first = transcoder.spawn_job(file, |token| {
            while !token.is_cancelled() {
                thread::sleep(Duration::from_millis(5));
            }
            Err(TranscodeError::Cancelled)
        });
        let second = transcoder.spawn_job(file, |_| Ok(PathBuf::from("never")));
        assert_eq!(transcoder.pending(), 1);

        first.cancel();
        assert!(second.is_cancelled());
        transcoder.cancel(file);
    }

    #[test]
    fn test_transcode_wav_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tone.wav");
        sine_wav(&source, 4_000);

        let mut transcoder = Transcoder::new(dir.path().join("out"));
        transcoder.transcode(&Track::new(&source));

        let done = wait_for_all(&mut transcoder);
        assert_eq!(done.len(), 1);
        let output = output_for(&done, &source);
        assert_eq!(output, transcoder.output_path_for(&source));
        assert!(output.starts_with(dir.path().join("out")));

        let reader = WavReader::open(&output).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.spec().bits_per_sample, 16);
        assert_eq!(reader.duration(), 4_000);

        // Only the finished file is left in the output folder
        let names: Vec<_> = fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(names, vec![output]);
    }

    #[test]
    fn test_same_file_name_in_different_folders_gets_own_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("disc1")).unwrap();
        fs::create_dir_all(dir.path().join("disc2")).unwrap();
        let long = dir.path().join("disc1").join("intro.wav");
        let short = dir.path().join("disc2").join("intro.wav");
        sine_wav(&long, 4_000);
        sine_wav(&short, 400);

        let mut transcoder = Transcoder::new(dir.path().join("out"));
        assert_ne!(transcoder.output_path_for(&long), transcoder.output_path_for(&short));

        transcoder.transcode(&Track::new(&long));
        transcoder.transcode(&Track::new(&short));
        let done = wait_for_all(&mut transcoder);
        assert_eq!(done.len(), 2);

        let long_out = output_for(&done, &long);
        let short_out = output_for(&done, &short);
        assert_ne!(long_out, short_out);
        assert_eq!(WavReader::open(&long_out).unwrap().duration(), 4_000);
        assert_eq!(WavReader::open(&short_out).unwrap().duration(), 400);
    }

    #[test]
    fn test_cancelled_transcode_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tone.wav");
        sine_wav(&source, 1_000);
        let output = dir.path().join("out.wav");

        let token = CancellationToken::new();
        token.cancel();
        let result = transcode_to_wav(&source, &output, &token);
        assert!(matches!(result, Err(TranscodeError::Cancelled)));
        assert!(!output.exists());
        // No partial file either
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_cancelled_run_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tone.wav");
        sine_wav(&source, 1_000);
        let output = dir.path().join("out.wav");

        transcode_to_wav(&source, &output, &CancellationToken::new()).unwrap();
        assert!(output.exists());

        // A stale job for the same output is cancelled after a newer one finished
        let stale = CancellationToken::new();
        stale.cancel();
        let result = transcode_to_wav(&source, &output, &stale);

        assert!(matches!(result, Err(TranscodeError::Cancelled)));
        assert_eq!(WavReader::open(&output).unwrap().duration(), 1_000);
    }

    #[test]
    fn test_wav_size_limit() {
        assert!(fits_in_wav(0));
        assert!(fits_in_wav(MAX_WAV_DATA_BYTES / 2));
        assert!(!fits_in_wav(MAX_WAV_DATA_BYTES / 2 + 1));
        // 44.1 kHz stereo runs out a little before seven hours
        assert!(fits_in_wav(44_100 * 2 * 60 * 60 * 6));
        assert!(!fits_in_wav(44_100 * 2 * 60 * 60 * 7));
    }

    #[test]
    fn test_unreadable_source_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("junk.ogg");
        fs::write(&source, b"not audio").unwrap();
        let output = dir.path().join("junk.wav");

        let result = transcode_to_wav(&source, &output, &CancellationToken::new());

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
