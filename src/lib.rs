//! sfx-pool library crate
//!
//! Pooled sound emitters with keyed tracking and timed reclamation, plus the
//! music channel and mixer buses around them. The binary in main.rs wires
//! everything to an event bus.

#[macro_use]
extern crate log;

pub mod audio;
pub mod clip;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod event;
pub mod manager;
pub mod mixer;
pub mod music;
pub mod pool;
pub mod profile;
pub mod scene;
pub mod scheduler;

// Test modules
#[cfg(test)]
mod config_tests;
