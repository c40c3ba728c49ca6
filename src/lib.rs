//! Terminal Snake
//!
//! - `game`: the state machine (movement, growth, collisions, food, tick speed)
//! - `app`: the fixed-tick loop that drives it from keyboard input
//! - `render`, `input`, `metrics`: terminal glue around the loop

pub mod app;
pub mod game;
pub mod input;
pub mod metrics;
pub mod render;
