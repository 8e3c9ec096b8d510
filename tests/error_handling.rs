//! Integration tests for error handling.
//!
//! Every runtime error is absorbed; only setup can fail.

mod common;

use common::*;
use sfx_pool::clip::{probe_duration, ClipLibrary};
use sfx_pool::config::ClipConfig;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(3);

/// Playing an unregistered clip is a logged no-op.
#[tokio::test]
async fn test_missing_clip_is_ignored() {
    let harness = TestHarness::new().await;

    harness.play_2d("ghost", "does_not_exist");
    harness.play_2d("real", "long");

    assert!(wait_for_manager(&harness.audio.sfx_2d, TIMEOUT, |m| m.active_count() == 1).await);
    let keys = harness.audio.sfx_2d.read().await.active_keys();
    assert_eq!(keys[0].name(), "real");
}

/// Requests past the hard cap are dropped, the rest keep playing.
#[tokio::test]
async fn test_exhausted_pool_through_bus() {
    let harness = TestHarness::new().await;

    // 2D pool of 2 grows to 4
    for i in 0..6 {
        harness.play_2d(&format!("sound{i}"), "long");
    }
    harness.play_2d("marker", "long");

    assert!(
        wait_for_manager(&harness.audio.sfx_2d, TIMEOUT, |m| m.dropped() == 3).await,
        "expected three dropped requests"
    );
    let manager = harness.audio.sfx_2d.read().await;
    assert_eq!(manager.active_count(), 4);
    assert_eq!(manager.pool().len(), 4);
}

#[tokio::test]
async fn test_unknown_music_track_is_ignored() {
    let harness = TestHarness::new().await;

    harness.send(Event::Music(MusicAction::PlayTrack {
        track: "Nope".to_string(),
        volume: None,
        looping: true,
    }));
    harness.send(Event::Music(MusicAction::PlayTrack {
        track: "Menu".to_string(),
        volume: None,
        looping: true,
    }));

    assert!(wait_for_music(&harness.audio.music, TIMEOUT, |m| m.is_playing()).await);
    assert_eq!(harness.audio.music.read().await.now_playing(), Some("Menu"));
}

/// A music track pointing at an unknown clip fails at startup.
#[tokio::test]
async fn test_init_fails_on_music_track_without_clip() {
    let config = config::parse(
        r#"
[[music_tracks]]
track = "Boss"
clip = "boss_theme"
"#,
    )
    .unwrap();

    let bus = EventBus::new();
    let result = audio::init(&bus, &config).await;
    let err = result.err().expect("init should fail");
    assert_eq!(
        err.downcast_ref::<SfxError>(),
        Some(&SfxError::MissingAsset("boss_theme".to_string()))
    );
}

#[tokio::test]
async fn test_clip_without_duration_or_path_fails() {
    let entries = vec![ClipConfig {
        name: "broken".to_string(),
        path: None,
        duration_secs: None,
    }];

    let err = ClipLibrary::load(&entries).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SfxError>(),
        Some(SfxError::InvalidConfiguration(_))
    ));
}

#[tokio::test]
async fn test_clip_with_negative_duration_fails() {
    let entries = vec![ClipConfig {
        name: "broken".to_string(),
        path: None,
        duration_secs: Some(-1.0),
    }];

    assert!(ClipLibrary::load(&entries).await.is_err());
}

#[test]
fn test_probe_missing_file_fails() {
    let result = probe_duration("/definitely/not/here.ogg");
    assert!(result.is_err());
}

#[test]
fn test_probe_garbage_file_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("garbage.wav");
    std::fs::write(&path, b"this is not audio").unwrap();

    assert!(probe_duration(path.to_str().unwrap()).is_err());
}

#[test]
fn test_error_display() {
    let err = SfxError::PoolExhausted {
        category: sfx_pool::manager::Category::Sfx3d,
        capacity: 20,
    };
    assert_eq!(
        err.to_string(),
        "No available 3D emitter in the pool (capacity 20)"
    );

    assert_eq!(
        SfxError::UnknownTrack("Boss".to_string()).to_string(),
        "Music track not found: Boss"
    );
    assert_eq!(
        SfxError::MissingAsset("boom".to_string()).to_string(),
        "Audio clip not registered: boom"
    );
}

/// Stop and stop-all on empty managers never fail.
#[test]
fn test_stop_on_empty_manager() {
    let mut manager = SfxManager::new(
        sfx_pool::manager::Category::Sfx2d,
        1,
        sfx_pool::profile::SpatialProfile::two_d(),
    )
    .unwrap();

    assert_eq!(manager.stop("anything"), 0);
    assert_eq!(manager.stop(""), 0);
    assert_eq!(manager.stop_all(), 0);
}
