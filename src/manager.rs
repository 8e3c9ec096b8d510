//! Sound-emitter pool manager.
//!
//! One manager exists per audio category. It hands out pooled emitters for
//! play requests, tracks them under a key derived from the caller's name,
//! and reclaims them when their clip runs out or when they are stopped.
//!
//! Nothing here blocks or suspends. Deferred work (one-shot reclamation,
//! the ambience blend poll) goes through a [Scheduler] that advances only
//! when [SfxManager::tick] is called.

use crate::{
    clip::Clip,
    constants::AMBIENCE_POLL_INTERVAL,
    emitter::{Emitter, EmitterId},
    error::SfxError,
    pool::EmitterPool,
    profile::{distance_blend, validate_distances, SpatialProfile},
    scene::{AnchorId, Scene},
    scheduler::Scheduler,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, time::Duration};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Category {
    Sfx2d,
    Sfx3d,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Sfx2d => write!(f, "2D"),
            Category::Sfx3d => write!(f, "3D"),
        }
    }
}

/// Key of an active sound.
///
/// Looping sounds are tracked under their bare name, so only one loop per
/// name can be active. One-shots get a per-manager token so any number of
/// them can share a name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    Looping(String),
    OneShot { name: String, token: u64 },
}

impl SoundKey {
    pub fn name(&self) -> &str {
        match self {
            SoundKey::Looping(name) => name,
            SoundKey::OneShot { name, .. } => name,
        }
    }

    /// Prefix match on the rendered key. `"Shooting"` matches
    /// `"ShootingEcho"` too.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.to_string().starts_with(prefix)
    }
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundKey::Looping(name) => write!(f, "{name}"),
            SoundKey::OneShot { name, token } => write!(f, "{name}#{token}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundHandle {
    pub key: SoundKey,
    pub emitter: EmitterId,
}

/// Per-call overrides of the profile's attenuation bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceOverrides {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
}

impl DistanceOverrides {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        DistanceOverrides {
            min_distance: Some(min_distance),
            max_distance: Some(max_distance),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayRequest {
    pub name: String,
    pub clip: Clip,
    pub volume: f32,
    pub looping: bool,
    pub anchor: Option<AnchorId>,
    pub distances: DistanceOverrides,
}

impl PlayRequest {
    pub fn new(name: impl Into<String>, clip: Clip, volume: f32) -> Self {
        PlayRequest {
            name: name.into(),
            clip,
            volume,
            looping: false,
            anchor: None,
            distances: DistanceOverrides::default(),
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn anchor(mut self, anchor: AnchorId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn distances(mut self, distances: DistanceOverrides) -> Self {
        self.distances = distances;
        self
    }
}

#[derive(Clone, Debug)]
pub enum SfxAction {
    /// Flat one-shot
    Play2d {
        name: String,
        clip: String,
        volume: f32,
    },

    /// Positional sound following `anchor`
    Play3d {
        name: String,
        clip: String,
        anchor: AnchorId,
        volume: f32,
        looping: bool,
        min_distance: Option<f32>,
        max_distance: Option<f32>,
    },

    /// Looping sound whose 2D/3D mix follows listener distance
    PlayAmbience {
        name: String,
        clip: String,
        anchor: AnchorId,
        volume: f32,
        min_distance: f32,
        max_distance: f32,
    },

    /// Stops every sound whose key starts with `name`
    Stop { name: String },

    StopAll,
}

#[derive(Clone, Debug, PartialEq)]
enum Task {
    Reclaim {
        key: SoundKey,
        emitter: EmitterId,
    },
    AmbiencePoll {
        emitter: EmitterId,
        generation: u64,
        min_distance: f32,
        max_distance: f32,
    },
}

pub struct SfxManager {
    category: Category,
    pool: EmitterPool,
    active: HashMap<SoundKey, EmitterId>,
    scheduler: Scheduler<Task>,
    next_token: u64,
    dropped: u64,
}

impl SfxManager {
    pub fn new(
        category: Category,
        pool_size: usize,
        profile: SpatialProfile,
    ) -> Result<Self, SfxError> {
        let pool = EmitterPool::new(&category.to_string(), pool_size, profile)?;

        info!(
            "{} sound pool ready: {} emitters (cap {})",
            category,
            pool.len(),
            pool.capacity()
        );

        Ok(SfxManager {
            category,
            pool,
            active: HashMap::new(),
            scheduler: Scheduler::new(),
            next_token: 0,
            dropped: 0,
        })
    }

    /// Plays a request on a pooled emitter.
    ///
    /// Returns `None` when the request was dropped: pool exhausted, invalid
    /// distance overrides, or the manager has been shut down. Drops are
    /// logged and never fatal.
    pub fn play(&mut self, request: PlayRequest) -> Option<SoundHandle> {
        let PlayRequest {
            name,
            clip,
            volume,
            looping,
            anchor,
            distances,
        } = request;

        if self.pool.is_closed() {
            warn!("{} manager is shut down, dropping sound {name}", self.category);
            return None;
        }

        let min_distance = distances
            .min_distance
            .unwrap_or(self.pool.profile().min_distance);
        let max_distance = distances
            .max_distance
            .unwrap_or(self.pool.profile().max_distance);
        if let Err(e) = validate_distances(min_distance, max_distance) {
            warn!("Dropping sound {name}: {e}");
            self.dropped += 1;
            return None;
        }

        let key = if looping {
            SoundKey::Looping(name.clone())
        } else {
            let token = self.next_token;
            self.next_token += 1;
            SoundKey::OneShot {
                name: name.clone(),
                token,
            }
        };

        // Only one loop per name is trackable; the newer request wins
        if looping {
            if let Some(previous) = self.active.remove(&key) {
                debug!(
                    "Replacing looping {} sound {name} on {previous}",
                    self.category
                );
                self.stop_emitter(previous);
            }
        }

        let Some(id) = self.pool.acquire() else {
            let e = SfxError::PoolExhausted {
                category: self.category,
                capacity: self.pool.capacity(),
            };
            warn!("{e}, dropping sound {name}");
            self.dropped += 1;
            return None;
        };

        let positional = self.pool.profile().positional;
        let duration = clip.duration;
        let emitter = self.pool.get_mut(id)?;

        emitter.min_distance = min_distance;
        emitter.max_distance = max_distance;

        if positional {
            match anchor {
                Some(anchor) => emitter.attach(anchor),
                None => emitter.detach(),
            }
        }

        emitter.start(clip, volume, looping);

        debug!(
            "Playing {} sound {key} on {id} (volume {volume:.2}, looping {looping})",
            self.category
        );

        if !looping {
            self.scheduler.schedule_in(
                duration,
                Task::Reclaim {
                    key: key.clone(),
                    emitter: id,
                },
            );
        }
        self.active.insert(key.clone(), id);

        Some(SoundHandle { key, emitter: id })
    }

    pub fn play_2d(&mut self, name: &str, clip: &Clip, volume: f32) -> Option<SoundHandle> {
        self.play(PlayRequest::new(name, clip.clone(), volume))
    }

    pub fn play_3d(
        &mut self,
        name: &str,
        clip: &Clip,
        anchor: AnchorId,
        volume: f32,
        looping: bool,
        distances: DistanceOverrides,
    ) -> Option<SoundHandle> {
        self.play(
            PlayRequest::new(name, clip.clone(), volume)
                .looping(looping)
                .anchor(anchor)
                .distances(distances),
        )
    }

    /// Plays a looping sound and keeps re-evaluating its spatial blend from
    /// the listener distance at 5 Hz for as long as it stays active. The
    /// blend is evaluated once against `scene` before returning.
    #[allow(clippy::too_many_arguments)]
    pub fn play_ambience(
        &mut self,
        scene: &Scene,
        name: &str,
        clip: &Clip,
        anchor: AnchorId,
        volume: f32,
        min_distance: f32,
        max_distance: f32,
    ) -> Option<SoundHandle> {
        // Flat pools keep a zero blend, so there is nothing to fade
        if !self.pool.profile().positional {
            warn!(
                "Ambience needs a positional pool, dropping {} sound {name}",
                self.category
            );
            self.dropped += 1;
            return None;
        }

        let handle = self.play_3d(
            name,
            clip,
            anchor,
            volume,
            true,
            DistanceOverrides::new(min_distance, max_distance),
        )?;

        let emitter = self.pool.get_mut(handle.emitter)?;
        emitter.doppler_level = 0.0;
        let generation = emitter.generation;

        self.poll_ambience(scene, handle.emitter, generation, min_distance, max_distance);

        Some(handle)
    }

    /// Stops every active sound whose key starts with `prefix`. Returns how
    /// many were stopped.
    pub fn stop(&mut self, prefix: &str) -> usize {
        let keys = self
            .active
            .keys()
            .filter(|key| key.matches_prefix(prefix))
            .cloned()
            .sorted_by_key(|key| key.to_string())
            .collect::<Vec<_>>();

        for key in &keys {
            if let Some(id) = self.active.remove(key) {
                self.stop_emitter(id);
                debug!("Stopped {} sound {key} on {id}", self.category);
            }
        }

        keys.len()
    }

    /// Stops every active sound. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let ids = self.active.drain().map(|(_, id)| id).collect::<Vec<_>>();
        for id in &ids {
            self.stop_emitter(*id);
        }

        if !ids.is_empty() {
            debug!("Stopped all {} {} sounds", ids.len(), self.category);
        }
        ids.len()
    }

    /// Advances the manager's clock by `dt` and runs whatever became due.
    pub fn tick(&mut self, dt: Duration, scene: &Scene) {
        for task in self.scheduler.advance(dt) {
            match task {
                Task::Reclaim { key, emitter } => self.reclaim(key, emitter),
                Task::AmbiencePoll {
                    emitter,
                    generation,
                    min_distance,
                    max_distance,
                } => self.poll_ambience(scene, emitter, generation, min_distance, max_distance),
            }
        }
    }

    /// Stops everything and releases the pool. Further plays are dropped.
    pub fn shutdown(&mut self) {
        self.stop_all();
        self.scheduler.clear();
        self.pool.release();
        info!("{} sound pool shut down", self.category);
    }

    fn reclaim(&mut self, key: SoundKey, id: EmitterId) {
        // An explicit stop may have beaten us to it
        if self.active.get(&key) != Some(&id) {
            trace!("{} sound {key} already reclaimed", self.category);
            return;
        }

        self.active.remove(&key);
        self.stop_emitter(id);
        debug!("Reclaimed {} sound {key} from {id}", self.category);
    }

    fn poll_ambience(
        &mut self,
        scene: &Scene,
        id: EmitterId,
        generation: u64,
        min_distance: f32,
        max_distance: f32,
    ) {
        let Some(emitter) = self.pool.get_mut(id) else {
            return;
        };
        if !emitter.playing || emitter.generation != generation {
            trace!("Ambience poll for {id} ended");
            return;
        }

        match emitter.world_position(scene) {
            Some(position) => {
                let distance = position.distance(scene.listener());
                emitter.spatial_blend = distance_blend(distance, min_distance, max_distance);
                trace!(
                    "Ambience {id} at distance {distance:.2}, blend {:.2}",
                    emitter.spatial_blend
                );
            }
            None => debug!("Anchor of ambience {id} is not in the scene, skipping poll"),
        }

        self.scheduler.schedule_in(
            AMBIENCE_POLL_INTERVAL,
            Task::AmbiencePoll {
                emitter: id,
                generation,
                min_distance,
                max_distance,
            },
        );
    }

    fn stop_emitter(&mut self, id: EmitterId) {
        if let Some(emitter) = self.pool.get_mut(id) {
            emitter.stop();
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pool(&self) -> &EmitterPool {
        &self.pool
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.pool.get(id)
    }

    pub fn is_active(&self, key: &SoundKey) -> bool {
        self.active.contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active keys in rendered order
    pub fn active_keys(&self) -> Vec<SoundKey> {
        self.active
            .keys()
            .cloned()
            .sorted_by_key(|key| key.to_string())
            .collect()
    }

    /// Number of requests dropped since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}
