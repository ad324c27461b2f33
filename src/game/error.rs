use thiserror::Error;

/// Invalid engine configuration, reported when the engine is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width must be at least 1, got {0}")]
    ZeroWidth(i32),
    #[error("board height must be at least 1, got {0}")]
    ZeroHeight(i32),
    #[error("start cell ({x}, {y}) lies outside the {width}x{height} board")]
    StartOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("tick interval must be positive")]
    ZeroTickInterval,
}

/// A game state that the engine refuses to adopt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state board {width}x{height} differs from the configured {expected_width}x{expected_height}")]
    BoardMismatch {
        width: i32,
        height: i32,
        expected_width: i32,
        expected_height: i32,
    },
    #[error("snake body is empty")]
    EmptySnake,
    #[error("snake segment ({x}, {y}) lies outside the board")]
    SnakeOutOfBounds { x: i32, y: i32 },
    #[error("snake covers ({x}, {y}) more than once")]
    OverlappingSnake { x: i32, y: i32 },
    #[error("food at ({x}, {y}) is off the board or under the snake")]
    MisplacedFood { x: i32, y: i32 },
}
