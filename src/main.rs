use anyhow::Result;
use sfx_pool::{
    audio, config,
    event::{self, Event, EventBus},
    music::MusicAction,
};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let bus = EventBus::new();
    event::debug(&bus);

    let config = config::load().await?;
    let mut audio = audio::init(&bus, &config).await?;

    if let Some(track) = config.startup_track.clone() {
        bus.send(Event::Music(MusicAction::PlayTrack {
            track,
            volume: None,
            looping: true,
        }));
    }

    tokio::signal::ctrl_c().await?;

    audio.shutdown().await;

    Ok(())
}
