use thiserror::Error;

use crate::manager::Category;

/// Domain errors for the emitter pools.
///
/// None of these are fatal. The managers log them and drop the request;
/// they are returned as values so callers and tests can inspect what went
/// wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SfxError {
    #[error("No available {category} emitter in the pool (capacity {capacity})")]
    PoolExhausted { category: Category, capacity: usize },

    #[error("Music track not found: {0}")]
    UnknownTrack(String),

    #[error("Audio clip not registered: {0}")]
    MissingAsset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
