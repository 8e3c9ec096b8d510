//! Unit tests for the config module

#[cfg(test)]
mod tests {
    use crate::config::{self, Config};
    use crate::error::SfxError;
    use crate::mixer::MixBus;

    const FULL_CONFIG: &str = r#"
startup_track = "Exploration"

[sfx_2d]
pool_size = 4

[sfx_3d]
pool_size = 8
min_distance = 2.0
max_distance = 40.0
doppler_level = 0.5
spread = 15.0

[mixer]
music = 0.25

[[clips]]
name = "shoot"
duration_secs = 0.35

[[clips]]
name = "theme"
path = "assets/theme.ogg"

[[music_tracks]]
track = "Exploration"
clip = "theme"
"#;

    fn config_error(err: anyhow::Error) -> SfxError {
        err.downcast::<SfxError>()
            .expect("expected an SfxError at the root")
    }

    #[test]
    fn test_parse_full_config() {
        let config = config::parse(FULL_CONFIG).unwrap();

        assert_eq!(config.sfx_2d.pool_size, 4);
        assert_eq!(config.sfx_3d.pool_size, 8);
        assert_eq!(config.sfx_3d.max_distance, 40.0);
        assert_eq!(config.clips.len(), 2);
        assert_eq!(config.clips[0].duration_secs, Some(0.35));
        assert_eq!(config.clips[1].path.as_deref(), Some("assets/theme.ogg"));
        assert_eq!(config.startup_track.as_deref(), Some("Exploration"));

        let profile = config.sfx_3d.profile();
        assert_eq!(profile.min_distance, 2.0);
        assert_eq!(profile.doppler_level, 0.5);
        assert_eq!(profile.spread, 15.0);

        let volumes = config.mixer.volumes();
        assert_eq!(volumes.get(MixBus::Music), 0.25);
        assert_eq!(volumes.get(MixBus::Master), 1.0);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sfx_2d.pool_size, 5);
        assert_eq!(config.sfx_3d.pool_size, 10);
        assert_eq!(config.sfx_3d.min_distance, 1.0);
        assert_eq!(config.sfx_3d.max_distance, 20.0);
    }

    #[test]
    fn test_inverted_distances_fail_at_load() {
        let err = config::parse("[sfx_3d]\nmin_distance = 30.0\nmax_distance = 10.0\n")
            .unwrap_err();
        assert!(matches!(config_error(err), SfxError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_pool_size_fails_at_load() {
        let err = config::parse("[sfx_2d]\npool_size = 0\n").unwrap_err();
        assert!(matches!(config_error(err), SfxError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_mixer_volume_out_of_range_fails() {
        let err = config::parse("[mixer]\nmaster = 1.5\n").unwrap_err();
        assert!(matches!(config_error(err), SfxError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_unknown_startup_track_fails() {
        let err = config::parse("startup_track = \"Nope\"\n").unwrap_err();
        assert!(matches!(config_error(err), SfxError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_malformed_toml_fails() {
        assert!(config::parse("[sfx_2d\npool_size = 3").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Config.toml");
        tokio::fs::write(&path, FULL_CONFIG).await.unwrap();

        let config = config::load_from(&path).await.unwrap();
        assert_eq!(config.sfx_2d.pool_size, 4);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = config::load_from(dir.path().join("missing.toml")).await;
        assert!(result.is_err());
    }
}
