//! Spatial configuration shared by every emitter of a pool.

use crate::{
    constants::{DEFAULT_DOPPLER_LEVEL, DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE, DEFAULT_SPREAD},
    error::SfxError,
};
use serde::{Deserialize, Serialize};

/// Distance rolloff curve handed to the audio backend.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Rolloff {
    #[default]
    Logarithmic,
    Linear,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct SpatialProfile {
    /// 0.0 = fully non-positional, 1.0 = fully positional
    pub spatial_blend: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub doppler_level: f32,
    pub spread: f32,
    pub rolloff: Rolloff,

    /// Whether emitters get parented to the requesting anchor
    pub positional: bool,
}

impl SpatialProfile {
    /// Flat profile: blend is always forced to 0 and emitters are never
    /// parented.
    pub fn two_d() -> Self {
        SpatialProfile {
            spatial_blend: 0.0,
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            doppler_level: 0.0,
            spread: DEFAULT_SPREAD,
            rolloff: Rolloff::Logarithmic,
            positional: false,
        }
    }

    pub fn three_d(min_distance: f32, max_distance: f32, doppler_level: f32, spread: f32) -> Self {
        SpatialProfile {
            spatial_blend: 1.0,
            min_distance,
            max_distance,
            doppler_level,
            spread,
            rolloff: Rolloff::Logarithmic,
            positional: true,
        }
    }

    pub fn validate(&self) -> Result<(), SfxError> {
        validate_distances(self.min_distance, self.max_distance)?;

        if !(0.0..=1.0).contains(&self.spatial_blend) {
            return Err(SfxError::InvalidConfiguration(format!(
                "spatial_blend must be within [0, 1], got {}",
                self.spatial_blend
            )));
        }
        if self.doppler_level < 0.0 || self.spread < 0.0 {
            return Err(SfxError::InvalidConfiguration(
                "doppler_level and spread must not be negative".to_string(),
            ));
        }
        if !self.positional && self.spatial_blend != 0.0 {
            return Err(SfxError::InvalidConfiguration(
                "non-positional profiles must use spatial_blend 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SpatialProfile {
    fn default() -> Self {
        SpatialProfile::three_d(
            DEFAULT_MIN_DISTANCE,
            DEFAULT_MAX_DISTANCE,
            DEFAULT_DOPPLER_LEVEL,
            DEFAULT_SPREAD,
        )
    }
}

pub fn validate_distances(min_distance: f32, max_distance: f32) -> Result<(), SfxError> {
    if !min_distance.is_finite() || !max_distance.is_finite() || min_distance < 0.0 {
        return Err(SfxError::InvalidConfiguration(format!(
            "distances must be finite and non-negative, got min {min_distance} max {max_distance}"
        )));
    }
    if max_distance <= min_distance {
        return Err(SfxError::InvalidConfiguration(format!(
            "max_distance ({max_distance}) must be greater than min_distance ({min_distance})"
        )));
    }
    Ok(())
}

/// Spatial blend for an ambience emitter at `distance` from the listener.
///
/// Fully flat inside `min_distance`, fully positional beyond `max_distance`,
/// linear in between.
pub fn distance_blend(distance: f32, min_distance: f32, max_distance: f32) -> f32 {
    if distance <= min_distance {
        return 0.0;
    }

    let range = max_distance - min_distance;
    if range <= 0.0 {
        return 1.0;
    }

    ((distance - min_distance) / range).clamp(0.0, 1.0)
}
