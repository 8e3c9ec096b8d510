//! Wires the managers to the event bus and drives them from a frame tick.
//!
//! Call [init] before anything is played and [AudioSystem::shutdown] on
//! teardown; shutdown stops every sound before releasing the emitters.

use crate::{
    clip::{Clip, ClipLibrary},
    config::Config,
    constants::TICK_INTERVAL,
    event::{Event, EventBus},
    manager::{Category, DistanceOverrides, SfxAction, SfxManager},
    mixer::{self, MixerOutput},
    music::MusicPlayer,
    profile::SpatialProfile,
    scene::Scene,
};
use anyhow::Result;
use std::sync::Arc;
use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};

pub type SharedSfx = Arc<RwLock<SfxManager>>;
pub type SharedMusic = Arc<RwLock<MusicPlayer>>;
pub type SharedScene = Arc<RwLock<Scene>>;

pub struct AudioSystem {
    pub sfx_2d: SharedSfx,
    pub sfx_3d: SharedSfx,
    pub music: SharedMusic,
    pub scene: SharedScene,
    pub mixer: MixerOutput,
    pub clips: Arc<ClipLibrary>,
    tasks: Vec<JoinHandle<()>>,
}

pub async fn init(bus: &EventBus, config: &Config) -> Result<AudioSystem> {
    config.validate()?;

    let clips = Arc::new(ClipLibrary::load(&config.clips).await?);

    let sfx_2d = SfxManager::new(
        Category::Sfx2d,
        config.sfx_2d.pool_size,
        SpatialProfile::two_d(),
    )?;
    let sfx_3d = SfxManager::new(
        Category::Sfx3d,
        config.sfx_3d.pool_size,
        config.sfx_3d.profile(),
    )?;
    let music = MusicPlayer::from_config(&config.music_tracks, &clips)?;

    let system = AudioSystem {
        sfx_2d: Arc::new(RwLock::new(sfx_2d)),
        sfx_3d: Arc::new(RwLock::new(sfx_3d)),
        music: Arc::new(RwLock::new(music)),
        scene: Arc::new(RwLock::new(Scene::new())),
        mixer: mixer::init(bus, config.mixer.volumes()),
        clips,
        tasks: Vec::new(),
    };

    Ok(system.start(bus))
}

impl AudioSystem {
    fn start(mut self, bus: &EventBus) -> Self {
        let event_loop = handle_incoming_event_loop(bus, self.handles());
        let tick_loop = tick_loop(self.handles());
        self.tasks = vec![event_loop, tick_loop];

        info!("Audio system started");
        self
    }

    fn handles(&self) -> Handles {
        Handles {
            sfx_2d: self.sfx_2d.clone(),
            sfx_3d: self.sfx_3d.clone(),
            music: self.music.clone(),
            scene: self.scene.clone(),
            clips: self.clips.clone(),
        }
    }

    /// Stops the background loops, every sound and the music, then releases
    /// the pools.
    pub async fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }

        self.sfx_2d.write().await.shutdown();
        self.sfx_3d.write().await.shutdown();
        self.music.write().await.stop();

        info!("Audio system shut down");
    }
}

#[derive(Clone)]
struct Handles {
    sfx_2d: SharedSfx,
    sfx_3d: SharedSfx,
    music: SharedMusic,
    scene: SharedScene,
    clips: Arc<ClipLibrary>,
}

fn handle_incoming_event_loop(bus: &EventBus, handles: Handles) -> JoinHandle<()> {
    // Subscribed before spawning so events sent right after init are seen
    let mut bus_rx = bus.subscribe();

    tokio::spawn(async move {
        // Handled inline so actions apply in the order they were sent
        loop {
            let event = bus_rx.recv().await;
            handle_incoming_event(event, &handles).await;
        }
    })
}

async fn handle_incoming_event(event: Event, handles: &Handles) {
    match event {
        Event::Sfx2d(action) => {
            let scene = handles.scene.read().await;
            let mut manager = handles.sfx_2d.write().await;
            handle_sfx_action(&mut manager, &scene, &handles.clips, action);
        }
        Event::Sfx3d(action) => {
            let scene = handles.scene.read().await;
            let mut manager = handles.sfx_3d.write().await;
            handle_sfx_action(&mut manager, &scene, &handles.clips, action);
        }
        Event::Scene(action) => handles.scene.write().await.apply(action),
        Event::Music(action) => handles.music.write().await.apply(action),
        Event::Mixer(_) => {}
    }
}

pub fn handle_sfx_action(
    manager: &mut SfxManager,
    scene: &Scene,
    clips: &ClipLibrary,
    action: SfxAction,
) {
    match action {
        SfxAction::Play2d { name, clip, volume } => {
            if let Some(clip) = lookup(clips, &clip) {
                manager.play_2d(&name, clip, volume);
            }
        }
        SfxAction::Play3d {
            name,
            clip,
            anchor,
            volume,
            looping,
            min_distance,
            max_distance,
        } => {
            if let Some(clip) = lookup(clips, &clip) {
                let distances = DistanceOverrides {
                    min_distance,
                    max_distance,
                };
                manager.play_3d(&name, clip, anchor, volume, looping, distances);
            }
        }
        SfxAction::PlayAmbience {
            name,
            clip,
            anchor,
            volume,
            min_distance,
            max_distance,
        } => {
            if let Some(clip) = lookup(clips, &clip) {
                manager.play_ambience(
                    scene,
                    &name,
                    clip,
                    anchor,
                    volume,
                    min_distance,
                    max_distance,
                );
            }
        }
        SfxAction::Stop { name } => {
            let stopped = manager.stop(&name);
            debug!("Stop {name}: {stopped} {} sounds stopped", manager.category());
        }
        SfxAction::StopAll => {
            manager.stop_all();
        }
    }
}

fn lookup<'a>(clips: &'a ClipLibrary, name: &str) -> Option<&'a Clip> {
    match clips.get(name) {
        Ok(clip) => Some(clip),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

fn tick_loop(handles: Handles) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            ticker.tick().await;
            let now = Instant::now();
            let dt = now - last;
            last = now;

            let scene = handles.scene.read().await;
            handles.sfx_2d.write().await.tick(dt, &scene);
            handles.sfx_3d.write().await.tick(dt, &scene);
            drop(scene);

            handles.music.write().await.tick(dt);
        }
    })
}
