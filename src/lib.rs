//! Classic Snake - grid snake for the terminal
//!
//! This library provides:
//! - Core game logic: movement, growth, collisions, speed ramp (game module)
//! - Keyboard and drag-swipe input mapping (input module)
//! - Persisted high score behind a key/value store (persistence module)
//! - TUI rendering (render module)
//! - The interactive tick-driven driver (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
