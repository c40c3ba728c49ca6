use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use simplelog::{Config, WriteLogger};
use snake_tui::app::App;
use snake_tui::game::GameConfig;
use snake_tui::game::speed::{MAX_DELAY_MS, MIN_DELAY_MS};

#[derive(Parser)]
#[command(name = "snake_tui")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Initial delay between ticks, in milliseconds (50-300)
    #[arg(long)]
    delay: Option<u64>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Seed for food placement, for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log; the terminal itself is taken by the game
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Log food and speed changes too
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.length {
            config.initial_snake_length = length;
        }
        if let Some(delay) = self.delay {
            config.tick_delay_ms = delay;
        }

        if !(MIN_DELAY_MS..=MAX_DELAY_MS).contains(&config.tick_delay_ms) {
            warn!(
                "tick delay {} ms out of range, clamping to {}-{} ms",
                config.tick_delay_ms, MIN_DELAY_MS, MAX_DELAY_MS
            );
            config.tick_delay_ms = config.speed().delay_ms();
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(level, Config::default(), log_file).context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("config: {:?}", config);

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut app = App::new(config, rng);
    app.run().await?;

    Ok(())
}
