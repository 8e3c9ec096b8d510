//! Named audio clips and their durations.
//!
//! The pools never touch sample data; they only need to know how long a
//! clip runs so one-shots can be reclaimed on time. Durations come either
//! straight from `Config.toml` or from probing the file with symphonia.

use crate::{config::ClipConfig, error::SfxError};
use anyhow::{bail, Context, Result};
use std::{collections::HashMap, fs::File, path::Path, time::Duration};
use symphonia::core::codecs::CodecParameters;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub name: String,
    pub duration: Duration,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Clip {
            name: name.into(),
            duration,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, Clip>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the library from config entries, probing files that have no
    /// declared duration.
    pub async fn load(entries: &[ClipConfig]) -> Result<Self> {
        let mut library = ClipLibrary::new();

        for entry in entries {
            let duration = match (entry.duration_secs, &entry.path) {
                (Some(secs), _) => Duration::try_from_secs_f64(secs).map_err(|_| {
                    SfxError::InvalidConfiguration(format!(
                        "clip {} has invalid duration {secs}",
                        entry.name
                    ))
                })?,
                (None, Some(path)) => {
                    let path = path.clone();
                    tokio::task::spawn_blocking(move || probe_duration(&path))
                        .await
                        .context("Clip probe task panicked")?
                        .with_context(|| format!("Could not probe clip {}", entry.name))?
                }
                (None, None) => {
                    return Err(SfxError::InvalidConfiguration(format!(
                        "clip {} needs either a path or duration_secs",
                        entry.name
                    ))
                    .into())
                }
            };

            debug!(
                "Registered clip {} ({:.2}s)",
                entry.name,
                duration.as_secs_f64()
            );
            library.insert(Clip::new(entry.name.clone(), duration));
        }

        info!("Clip library ready with {} clips", library.len());
        Ok(library)
    }

    pub fn insert(&mut self, clip: Clip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn get(&self, name: &str) -> Result<&Clip, SfxError> {
        self.clips
            .get(name)
            .ok_or_else(|| SfxError::MissingAsset(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Reads the playback length of an audio file.
pub fn probe_duration(file_path: &str) -> Result<Duration> {
    let file = File::open(Path::new(file_path))
        .with_context(|| format!("Could not open audio file {file_path}"))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = Path::new(file_path).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();
    let probed =
        symphonia::default::get_probe().format(&hint, mss, &format_opts, &metadata_opts)?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .context("Could not find any tracks in file")?;
    let track_id = track.id;
    let params: CodecParameters = track.codec_params.clone();

    let sample_rate = params
        .sample_rate
        .context("Track does not declare a sample rate")?;
    if sample_rate == 0 {
        bail!("Track declares a sample rate of zero");
    }

    // Some containers omit the frame count, in which case we walk the packets
    let frames = match params.n_frames {
        Some(frames) => frames,
        None => count_frames(format.as_mut(), track_id)?,
    };

    Ok(Duration::from_secs_f64(frames as f64 / sample_rate as f64))
}

fn count_frames(format: &mut dyn FormatReader, track_id: u32) -> Result<u64> {
    let mut frames = 0;

    loop {
        let packet = format.next_packet();

        // Symphonia reports the end of the stream as UnexpectedEof
        let packet = match packet {
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                return Ok(frames);
            }
            other => other?,
        };

        if packet.track_id() == track_id {
            frames += packet.dur;
        }
    }
}
