use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};
use tick_snake::game::GameConfig;
use tick_snake::modes::{HeadlessMode, HumanMode};

#[derive(Parser)]
#[command(name = "tick_snake")]
#[command(version, about = "Snake with an authoritative tick-driven engine")]
struct Cli {
    /// Front end to run
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width
    #[arg(long)]
    width: Option<i32>,

    /// Board height
    #[arg(long)]
    height: Option<i32>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Log destination (the terminal belongs to the game)
    #[arg(long, default_value = "tick_snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with the keyboard in the terminal
    Human,
    /// Read commands from stdin, write JSON snapshots to stdout
    Headless,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

fn init_logging(path: &Path, level: LogLevel) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    WriteLogger::init(level.into(), Config::default(), file)
        .context("Failed to initialize logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file, cli.log_level)?;
    let config = cli.game_config()?;
    info!(
        "starting {}x{} board, tick every {} ms",
        config.width, config.height, config.tick_interval_ms
    );

    match cli.mode {
        Mode::Human => HumanMode::new(config)?.run().await?,
        Mode::Headless => HeadlessMode::new(config)?.run().await?,
    }

    Ok(())
}
