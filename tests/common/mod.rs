//! Test infrastructure for sfx-pool integration tests.
//!
//! Provides a configured audio system on a fresh event bus plus helpers
//! for sending actions and waiting on manager state.

#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

pub use sfx_pool::audio::{self, AudioSystem, SharedMusic, SharedSfx};
pub use sfx_pool::clip::Clip;
pub use sfx_pool::config::{self, Config};
pub use sfx_pool::error::SfxError;
pub use sfx_pool::event::{Event, EventBus, Subscriber};
pub use sfx_pool::manager::{SfxAction, SfxManager, SoundKey};
pub use sfx_pool::mixer::{MixBus, MixerAction};
pub use sfx_pool::music::{MusicAction, MusicPlayer};
pub use sfx_pool::scene::{AnchorId, SceneAction};

/// Small pools and short clips so timing-based tests finish quickly.
pub const TEST_CONFIG: &str = r#"
[sfx_2d]
pool_size = 2

[sfx_3d]
pool_size = 2
min_distance = 1.0
max_distance = 20.0

[[clips]]
name = "blip"
duration_secs = 0.3

[[clips]]
name = "long"
duration_secs = 30.0

[[clips]]
name = "wind"
duration_secs = 10.0

[[clips]]
name = "menu_theme"
duration_secs = 60.0

[[music_tracks]]
track = "Menu"
clip = "menu_theme"
"#;

pub fn test_config() -> Config {
    config::parse(TEST_CONFIG).expect("test config should be valid")
}

/// Test harness owning a running audio system.
pub struct TestHarness {
    pub bus: EventBus,
    pub audio: AudioSystem,
}

impl TestHarness {
    /// Starts an audio system with the default test configuration.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let bus = EventBus::new();
        let audio = audio::init(&bus, &config)
            .await
            .expect("audio system should start");

        Self { bus, audio }
    }

    pub fn send(&self, event: Event) {
        self.bus.send(event);
    }

    pub fn play_2d(&self, name: &str, clip: &str) {
        self.send(Event::Sfx2d(SfxAction::Play2d {
            name: name.to_string(),
            clip: clip.to_string(),
            volume: 1.0,
        }));
    }

    pub fn play_3d(&self, name: &str, clip: &str, anchor: AnchorId, looping: bool) {
        self.send(Event::Sfx3d(SfxAction::Play3d {
            name: name.to_string(),
            clip: clip.to_string(),
            anchor,
            volume: 1.0,
            looping,
            min_distance: None,
            max_distance: None,
        }));
    }

    pub fn stop_2d(&self, name: &str) {
        self.send(Event::Sfx2d(SfxAction::Stop {
            name: name.to_string(),
        }));
    }

    pub async fn active_2d(&self) -> usize {
        self.audio.sfx_2d.read().await.active_count()
    }

    pub async fn active_3d(&self) -> usize {
        self.audio.sfx_3d.read().await.active_count()
    }
}

/// Polls `check` until it returns true or `timeout` passes.
pub async fn wait_until<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Waits until the manager behind `shared` satisfies `predicate`.
pub async fn wait_for_manager<P>(shared: &SharedSfx, timeout: Duration, predicate: P) -> bool
where
    P: Fn(&SfxManager) -> bool,
{
    let predicate = &predicate;
    wait_until(timeout, move || async move { predicate(&*shared.read().await) }).await
}

/// Waits until the music player behind `shared` satisfies `predicate`.
pub async fn wait_for_music<P>(shared: &SharedMusic, timeout: Duration, predicate: P) -> bool
where
    P: Fn(&MusicPlayer) -> bool,
{
    let predicate = &predicate;
    wait_until(timeout, move || async move { predicate(&*shared.read().await) }).await
}
