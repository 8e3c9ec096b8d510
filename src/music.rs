//! Dedicated background-music channel.
//!
//! Music gets its own always-flat emitter outside the pools so sound
//! effects can never steal it.

use crate::{
    clip::{Clip, ClipLibrary},
    config::MusicTrackConfig,
    constants::DEFAULT_MUSIC_VOLUME,
    emitter::{Emitter, EmitterId},
    error::SfxError,
    profile::SpatialProfile,
};
use std::{collections::HashMap, time::Duration};

#[derive(Clone, Debug)]
pub enum MusicAction {
    /// Plays a registered track
    PlayTrack {
        track: String,
        volume: Option<f32>,
        looping: bool,
    },

    Stop,

    SetVolume(f32),
}

pub struct MusicPlayer {
    source: Emitter,
    tracks: HashMap<String, Clip>,
    now_playing: Option<String>,

    /// Time left for a non-looping track
    remaining: Option<Duration>,
}

impl MusicPlayer {
    pub fn new(tracks: HashMap<String, Clip>) -> Self {
        MusicPlayer {
            source: Emitter::new(EmitterId(0), "MusicSource".to_string(), &SpatialProfile::two_d()),
            tracks,
            now_playing: None,
            remaining: None,
        }
    }

    /// Resolves every configured track against the clip library. A track
    /// pointing at an unknown clip is a configuration error.
    pub fn from_config(entries: &[MusicTrackConfig], clips: &ClipLibrary) -> Result<Self, SfxError> {
        let mut tracks = HashMap::new();

        for entry in entries {
            // First registration of a track wins
            if tracks.contains_key(&entry.track) {
                warn!("Duplicate music track {}, ignoring", entry.track);
                continue;
            }
            let clip = clips.get(&entry.clip)?.clone();
            tracks.insert(entry.track.clone(), clip);
        }

        Ok(MusicPlayer::new(tracks))
    }

    pub fn play_track(
        &mut self,
        track: &str,
        volume: Option<f32>,
        looping: bool,
    ) -> Result<(), SfxError> {
        let Some(clip) = self.tracks.get(track).cloned() else {
            let e = SfxError::UnknownTrack(track.to_string());
            warn!("{e}");
            return Err(e);
        };

        self.play(clip, volume.unwrap_or(DEFAULT_MUSIC_VOLUME), looping);
        self.now_playing = Some(track.to_string());
        Ok(())
    }

    pub fn play(&mut self, clip: Clip, volume: f32, looping: bool) {
        info!(
            "Playing music {} ({:.1}s, looping {looping})",
            clip.name,
            clip.duration.as_secs_f64()
        );

        self.remaining = (!looping).then_some(clip.duration);
        self.now_playing = Some(clip.name.clone());
        self.source.spatial_blend = 0.0;
        self.source.start(clip, volume.clamp(0.0, 1.0), looping);
    }

    pub fn stop(&mut self) {
        if self.source.playing {
            info!("Music stopped");
        }
        self.source.stop();
        self.now_playing = None;
        self.remaining = None;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.source.volume = volume.clamp(0.0, 1.0);
    }

    /// Ends a non-looping track once its clip has run out.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(remaining) = self.remaining {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                debug!("Music track finished");
                self.stop();
            } else {
                self.remaining = Some(remaining);
            }
        }
    }

    pub fn apply(&mut self, action: MusicAction) {
        match action {
            MusicAction::PlayTrack {
                track,
                volume,
                looping,
            } => {
                // Unknown tracks are already logged
                let _ = self.play_track(&track, volume, looping);
            }
            MusicAction::Stop => self.stop(),
            MusicAction::SetVolume(volume) => self.set_volume(volume),
        }
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.source.playing
    }

    pub fn source(&self) -> &Emitter {
        &self.source
    }

    pub fn has_track(&self, track: &str) -> bool {
        self.tracks.contains_key(track)
    }
}
