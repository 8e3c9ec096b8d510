use std::time::Duration;

// Pool sizes per category
pub const DEFAULT_2D_POOL_SIZE: usize = 5;
pub const DEFAULT_3D_POOL_SIZE: usize = 10;

/// Pools may grow lazily up to this multiple of their initial size.
pub const POOL_GROWTH_FACTOR: usize = 2;

// 3D attenuation defaults
pub const DEFAULT_MIN_DISTANCE: f32 = 1.0;
pub const DEFAULT_MAX_DISTANCE: f32 = 20.0;
pub const DEFAULT_DOPPLER_LEVEL: f32 = 1.0;
pub const DEFAULT_SPREAD: f32 = 0.0;

// Ambience defaults
pub const AMBIENCE_MIN_DISTANCE: f32 = 1.0;
pub const AMBIENCE_MAX_DISTANCE: f32 = 50.0;
pub const AMBIENCE_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub const DEFAULT_MUSIC_VOLUME: f32 = 0.5;

/// Frame tick for the runtime driver (60 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_micros(16_667);

pub const CONFIG_FILE: &str = "Config.toml";
