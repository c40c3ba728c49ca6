//! Core game logic module for Snake
//!
//! This module contains the state machine without any I/O or rendering
//! dependencies. The app drives it with one `GameEngine::step` per tick.

pub mod action;
pub mod config;
pub mod engine;
pub mod speed;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use speed::TickSpeed;
pub use state::{CollisionType, GameState, Position, Snake};
