//! Error types for the dataset crate.

use crate::types::GameId;
use thiserror::Error;

/// Errors that can occur while building or persisting the sampled dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O error while writing or reading a snapshot or the CSV table
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be serialized or deserialized
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The same game id appeared twice in the collected rank list
    #[error("Duplicate game id {id} in rank list")]
    DuplicateGame { id: GameId },

    /// A game id referenced during sampling is not part of the pool
    #[error("Game id {id} is not in the pool")]
    UnknownGame { id: GameId },

    /// Every game in the pool has a zero rating count, so no weight
    /// distribution can be formed
    #[error("Pool has no game with a nonzero rating count")]
    EmptyPool,

    /// More distinct rating positions were requested for a game than it has
    /// ratings; indicates an inconsistency between collected counts and the
    /// drawn sample
    #[error("Game {game_id}: requested {requested} distinct positions but only {available} ratings exist")]
    SampleRange {
        game_id: GameId,
        requested: usize,
        available: u32,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DatasetError>;
