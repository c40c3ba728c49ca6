use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::speed::{DEFAULT_DELAY_MS, TickSpeed};

/// Largest grid side, in cells. Bigger boards do not fit on a terminal.
pub const MAX_GRID_SIDE: usize = 200;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid, in cells
    pub grid_width: usize,
    /// Height of the game grid, in cells
    pub grid_height: usize,
    /// Length of the snake at the start of a round
    pub initial_snake_length: usize,
    /// Score added for each food eaten
    pub food_reward: u32,
    /// Delay between ticks when the game starts
    pub tick_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            initial_snake_length: 1,
            food_reward: 10,
            tick_delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Read a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Reject grids the engine cannot start a round on
    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 2 || self.grid_height < 1 {
            bail!(
                "grid must be at least 2x1 cells, got {}x{}",
                self.grid_width,
                self.grid_height
            );
        }
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            bail!(
                "grid sides must be at most {} cells, got {}x{}",
                MAX_GRID_SIDE,
                self.grid_width,
                self.grid_height
            );
        }
        if self.initial_snake_length == 0 {
            bail!("initial snake length must be at least 1");
        }
        if self.initial_snake_length >= self.grid_width {
            bail!(
                "initial snake length {} must be shorter than the grid width {}",
                self.initial_snake_length,
                self.grid_width
            );
        }
        if self.food_reward == 0 {
            bail!("food reward must be at least 1");
        }
        Ok(())
    }

    pub fn speed(&self) -> TickSpeed {
        TickSpeed::with_delay(self.tick_delay_ms)
    }
}
