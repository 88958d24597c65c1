// Opening files through symphonia for duration and container-level tags

use super::ReadError;
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision};
use symphonia::core::probe::{Hint, ProbeResult};

pub(crate) fn open_stream(path: &Path) -> Result<ProbeResult, ReadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    Ok(symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?)
}

/// First track with a real codec.
pub(crate) fn audio_track(stream: &ProbeResult) -> Option<&Track> {
    stream
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
}

pub(crate) fn duration_of(stream: &ProbeResult) -> Result<Duration, ReadError> {
    let track = audio_track(stream)
        .ok_or_else(|| ReadError::Unsupported("no audio track".to_string()))?;

    match (track.codec_params.time_base, track.codec_params.n_frames) {
        (Some(time_base), Some(n_frames)) => {
            let time = time_base.calc_time(n_frames);
            Ok(Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac))
        }
        _ => Err(ReadError::Unsupported("stream length unknown".to_string())),
    }
}

pub(crate) fn stream_duration(path: &Path) -> Result<Duration, ReadError> {
    let stream = open_stream(path)?;
    duration_of(&stream)
}

/// Latest revision from the container prefix (e.g. an ID3 block ahead of the
/// stream) followed by the latest revision from the format itself.
pub(crate) fn metadata_revisions(stream: &mut ProbeResult) -> Vec<MetadataRevision> {
    let mut revisions = Vec::new();

    if let Some(container) = stream.metadata.get() {
        if let Some(revision) = container.current() {
            revisions.push(revision.clone());
        }
    }

    if let Some(revision) = stream.format.metadata().current() {
        revisions.push(revision.clone());
    }

    revisions
}
