use crate::{
    clip::Clip,
    profile::{Rolloff, SpatialProfile},
    scene::{AnchorId, Scene},
};
use glam::Vec3;
use std::fmt;

/// Index of an emitter inside its pool. Stable for the pool's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub usize);

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "emitter#{}", self.0)
    }
}

/// A reusable playback handle. Either free (not playing, inactive) or
/// serving exactly one sound.
#[derive(Clone, Debug)]
pub struct Emitter {
    pub id: EmitterId,
    pub label: String,

    pub clip: Option<Clip>,
    pub volume: f32,
    pub looping: bool,
    pub pitch: f32,

    pub spatial_blend: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub doppler_level: f32,
    pub spread: f32,
    pub rolloff: Rolloff,

    /// Anchor this emitter follows, if parented
    pub anchor: Option<AnchorId>,
    pub local_offset: Vec3,

    /// Visible to gameplay
    pub active: bool,
    pub playing: bool,

    /// Bumped on every start so tasks bound to an earlier activation can
    /// tell they are stale
    pub generation: u64,
}

impl Emitter {
    pub fn new(id: EmitterId, label: String, profile: &SpatialProfile) -> Self {
        let mut emitter = Emitter {
            id,
            label,
            clip: None,
            volume: 1.0,
            looping: false,
            pitch: 1.0,
            spatial_blend: profile.spatial_blend,
            min_distance: profile.min_distance,
            max_distance: profile.max_distance,
            doppler_level: profile.doppler_level,
            spread: profile.spread,
            rolloff: profile.rolloff,
            anchor: None,
            local_offset: Vec3::ZERO,
            active: false,
            playing: false,
            generation: 0,
        };
        emitter.reset(profile);
        emitter
    }

    /// Reapplies the profile defaults before the emitter serves a new sound.
    pub fn reset(&mut self, profile: &SpatialProfile) {
        self.pitch = 1.0;
        self.spatial_blend = profile.spatial_blend;
        self.min_distance = profile.min_distance;
        self.max_distance = profile.max_distance;
        self.doppler_level = profile.doppler_level;
        self.spread = profile.spread;
        self.rolloff = profile.rolloff;
    }

    pub fn is_free(&self) -> bool {
        !self.playing
    }

    /// Parents the emitter to `anchor` with no local offset.
    pub fn attach(&mut self, anchor: AnchorId) {
        self.anchor = Some(anchor);
        self.local_offset = Vec3::ZERO;
    }

    /// Returns the emitter to its manager.
    pub fn detach(&mut self) {
        self.anchor = None;
        self.local_offset = Vec3::ZERO;
    }

    pub fn start(&mut self, clip: Clip, volume: f32, looping: bool) {
        self.clip = Some(clip);
        self.volume = volume;
        self.looping = looping;
        self.active = true;
        self.playing = true;
        self.generation += 1;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.active = false;
        self.detach();
    }

    /// World position of the emitter. Unparented emitters sit at the
    /// manager origin. `None` when the anchor is no longer in the scene.
    pub fn world_position(&self, scene: &Scene) -> Option<Vec3> {
        match self.anchor {
            Some(anchor) => scene
                .anchor_position(anchor)
                .map(|position| position + self.local_offset),
            None => Some(self.local_offset),
        }
    }
}
