use anyhow::{Context, Result};
use tracing::{info, warn};

use super::store::KeyValueStore;

/// Key the best score is stored under
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Best score across sessions, backed by a key/value store
pub struct HighScore<S: KeyValueStore> {
    store: S,
    best: u32,
}

impl<S: KeyValueStore> HighScore<S> {
    /// Read the stored best score. An absent or unreadable value counts as 0.
    pub fn load(store: S) -> Result<Self> {
        let raw = store
            .get(HIGH_SCORE_KEY)
            .context("Failed to read high score")?;

        let best = match raw {
            Some(text) => text.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(value = %text, "Ignoring unparsable high score");
                0
            }),
            None => 0,
        };

        Ok(Self { store, best })
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Store `score` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, score: u32) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }

        self.store
            .set(HIGH_SCORE_KEY, &score.to_string())
            .context("Failed to write high score")?;
        info!(previous = self.best, score, "New high score");
        self.best = score;

        Ok(true)
    }

    /// Forget the stored best score
    pub fn reset(&mut self) -> Result<()> {
        self.store
            .remove(HIGH_SCORE_KEY)
            .context("Failed to clear high score")?;
        info!(previous = self.best, "High score cleared");
        self.best = 0;

        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
