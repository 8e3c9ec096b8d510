use crate::{
    constants::{
        CONFIG_FILE, DEFAULT_2D_POOL_SIZE, DEFAULT_3D_POOL_SIZE, DEFAULT_DOPPLER_LEVEL,
        DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE, DEFAULT_SPREAD,
    },
    error::SfxError,
    mixer::{BusVolumes, MixBus},
    profile::SpatialProfile,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::read_to_string;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Sfx2dConfig {
    pub pool_size: usize,
}

impl Default for Sfx2dConfig {
    fn default() -> Self {
        Sfx2dConfig {
            pool_size: DEFAULT_2D_POOL_SIZE,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Sfx3dConfig {
    pub pool_size: usize,
    pub min_distance: f32,
    pub max_distance: f32,
    pub doppler_level: f32,
    pub spread: f32,
}

impl Sfx3dConfig {
    pub fn profile(&self) -> SpatialProfile {
        SpatialProfile::three_d(
            self.min_distance,
            self.max_distance,
            self.doppler_level,
            self.spread,
        )
    }
}

impl Default for Sfx3dConfig {
    fn default() -> Self {
        Sfx3dConfig {
            pool_size: DEFAULT_3D_POOL_SIZE,
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            doppler_level: DEFAULT_DOPPLER_LEVEL,
            spread: DEFAULT_SPREAD,
        }
    }
}

/// Initial mixer bus volumes, all in [0, 1]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MixerConfig {
    pub master: f32,
    pub music: f32,
    pub ambience: f32,
    pub sfx: f32,
    pub sfx_2d: f32,
    pub sfx_3d: f32,
}

impl MixerConfig {
    fn entries(&self) -> [(MixBus, f32); 6] {
        [
            (MixBus::Master, self.master),
            (MixBus::Music, self.music),
            (MixBus::Ambience, self.ambience),
            (MixBus::Sfx, self.sfx),
            (MixBus::Sfx2d, self.sfx_2d),
            (MixBus::Sfx3d, self.sfx_3d),
        ]
    }

    pub fn volumes(&self) -> BusVolumes {
        let mut volumes = BusVolumes::default();
        for (bus, volume) in self.entries() {
            volumes.set(bus, volume);
        }
        volumes
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        MixerConfig {
            master: 1.0,
            music: 1.0,
            ambience: 1.0,
            sfx: 1.0,
            sfx_2d: 1.0,
            sfx_3d: 1.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClipConfig {
    pub name: String,

    /// Audio file to probe for the duration
    pub path: Option<String>,

    /// Declared duration, takes precedence over probing
    pub duration_secs: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MusicTrackConfig {
    pub track: String,
    pub clip: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub sfx_2d: Sfx2dConfig,

    #[serde(default)]
    pub sfx_3d: Sfx3dConfig,

    #[serde(default)]
    pub mixer: MixerConfig,

    #[serde(default)]
    pub clips: Vec<ClipConfig>,

    #[serde(default)]
    pub music_tracks: Vec<MusicTrackConfig>,

    /// Track to start once the audio system is up
    pub startup_track: Option<String>,
}

impl Config {
    pub fn validate(&self) -> Result<(), SfxError> {
        if self.sfx_2d.pool_size == 0 || self.sfx_3d.pool_size == 0 {
            return Err(SfxError::InvalidConfiguration(
                "pool_size must be at least 1".to_string(),
            ));
        }

        self.sfx_3d.profile().validate()?;

        for (bus, volume) in self.mixer.entries() {
            if !(0.0..=1.0).contains(&volume) {
                return Err(SfxError::InvalidConfiguration(format!(
                    "{bus:?} volume must be within [0, 1], got {volume}"
                )));
            }
        }

        if let Some(track) = &self.startup_track {
            if !self.music_tracks.iter().any(|t| &t.track == track) {
                return Err(SfxError::InvalidConfiguration(format!(
                    "startup_track {track} is not a configured music track"
                )));
            }
        }

        Ok(())
    }
}

pub fn parse(config: &str) -> Result<Config> {
    let config: Config = toml::from_str(config)?;
    config.validate()?;

    Ok(config)
}

pub async fn load() -> Result<Config> {
    load_from(CONFIG_FILE).await
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config = read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;

    parse(&config).with_context(|| format!("Invalid config in {}", path.display()))
}
