use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::direction::Direction;
use super::error::ConfigError;
use super::state::Position;

/// Configuration for one engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub width: i32,
    /// Board height in cells
    pub height: i32,
    /// Starting cell of the snake; the board centre when unset
    pub start: Option<Position>,
    /// Heading of a fresh snake
    pub initial_direction: Direction,
    /// Delay between ticks for the periodic driver
    pub tick_interval_ms: u64,
    /// Seed for food placement; fresh entropy when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            start: None,
            initial_direction: Direction::Right,
            tick_interval_ms: 100,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn start_position(&self) -> Position {
        self.start
            .unwrap_or_else(|| Position::new(self.width / 2, self.height / 2))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 {
            return Err(ConfigError::ZeroWidth(self.width));
        }
        if self.height < 1 {
            return Err(ConfigError::ZeroHeight(self.height));
        }

        let start = self.start_position();
        if !(0..self.width).contains(&start.x) || !(0..self.height).contains(&start.y) {
            return Err(ConfigError::StartOutOfBounds {
                x: start.x,
                y: start.y,
                width: self.width,
                height: self.height,
            });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 30);
        assert_eq!(config.start_position(), Position::new(15, 15));
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            GameConfig::new(0, 10).validate(),
            Err(ConfigError::ZeroWidth(0))
        );
        assert_eq!(
            GameConfig::new(10, -3).validate(),
            Err(ConfigError::ZeroHeight(-3))
        );
    }

    #[test]
    fn test_start_must_be_on_board() {
        let config = GameConfig {
            start: Some(Position::new(5, 0)),
            ..GameConfig::new(5, 5)
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds { x: 5, y: 0, .. })
        ));
    }

    #[test]
    fn test_one_by_one_board_is_valid() {
        let config = GameConfig::new(1, 1);
        assert_eq!(config.start_position(), Position::new(0, 0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "width": 12, "initial_direction": "Up" }"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 30);
        assert_eq!(config.initial_direction, Direction::Up);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("tick_snake_cfg_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "width": 8, "height": 6, "seed": 7 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.width, 8);
        assert_eq!(config.height, 6);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("tick_snake_does_not_exist.json");
        assert!(GameConfig::load(&path).is_err());
    }
}
