//! Persisted high score
//!
//! The best score lives in a durable key/value store under [`HIGH_SCORE_KEY`],
//! string-encoded, so it survives restarts of the game and of the program.

pub mod high_score;
pub mod store;

pub use high_score::{HIGH_SCORE_KEY, HighScore};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
