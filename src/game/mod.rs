//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal driver feeds it commands and ticks; tests drive it directly.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, SurfaceSize};
pub use direction::Direction;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, Food, GameState, Phase, Position, Snake};
