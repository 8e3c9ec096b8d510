//! Bounded, lazily growing set of emitters.

use crate::{
    constants::POOL_GROWTH_FACTOR,
    emitter::{Emitter, EmitterId},
    error::SfxError,
    profile::SpatialProfile,
};

pub struct EmitterPool {
    label: String,
    profile: SpatialProfile,
    initial_size: usize,
    emitters: Vec<Emitter>,
    closed: bool,
}

impl EmitterPool {
    /// Creates `initial_size` inactive emitters configured per `profile`.
    pub fn new(label: &str, initial_size: usize, profile: SpatialProfile) -> Result<Self, SfxError> {
        if initial_size == 0 {
            return Err(SfxError::InvalidConfiguration(format!(
                "{label} pool size must be at least 1"
            )));
        }
        profile.validate()?;

        let mut pool = EmitterPool {
            label: label.to_string(),
            profile,
            initial_size,
            emitters: Vec::with_capacity(initial_size * POOL_GROWTH_FACTOR),
            closed: false,
        };

        for i in 0..initial_size {
            pool.create_emitter(format!("{label}_Emitter_{i}"));
        }

        Ok(pool)
    }

    fn create_emitter(&mut self, name: String) -> EmitterId {
        let id = EmitterId(self.emitters.len());
        self.emitters.push(Emitter::new(id, name, &self.profile));
        id
    }

    /// Hands out the first emitter that isn't playing, growing by one if
    /// every emitter is busy and the hard cap allows it. The returned
    /// emitter has been reset to the profile defaults.
    pub fn acquire(&mut self) -> Option<EmitterId> {
        if self.closed {
            return None;
        }

        let free = self
            .emitters
            .iter()
            .find(|emitter| emitter.is_free())
            .map(|emitter| emitter.id);

        let id = match free {
            Some(id) => id,
            None if self.emitters.len() < self.capacity() => {
                let name = format!("{}_Emitter_Extra_{}", self.label, self.emitters.len());
                let id = self.create_emitter(name);
                debug!(
                    "Grew {} pool to {} emitters",
                    self.label,
                    self.emitters.len()
                );
                id
            }
            None => return None,
        };

        let profile = self.profile;
        self.emitters[id.0].reset(&profile);
        Some(id)
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(id.0)
    }

    pub fn get_mut(&mut self, id: EmitterId) -> Option<&mut Emitter> {
        self.emitters.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Emitter> {
        self.emitters.iter()
    }

    pub fn profile(&self) -> &SpatialProfile {
        &self.profile
    }

    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Hard cap on the number of emitters this pool will ever hold.
    pub fn capacity(&self) -> usize {
        self.initial_size * POOL_GROWTH_FACTOR
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    pub fn playing_count(&self) -> usize {
        self.emitters.iter().filter(|e| e.playing).count()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stops and drops every emitter. The pool hands out nothing afterwards.
    pub fn release(&mut self) {
        for emitter in &mut self.emitters {
            emitter.stop();
        }
        self.emitters.clear();
        self.closed = true;
    }
}
