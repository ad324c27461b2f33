//! Core game logic for Snake
//!
//! No I/O and no rendering: the engine owns the board and applies every
//! transition. Collisions end the game through `GameState::lost`, never
//! through an error.

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod state;

pub use config::GameConfig;
pub use direction::{Direction, ParseDirectionError};
pub use engine::{GameEngine, StepOutcome, StepResult};
pub use error::{ConfigError, StateError};
pub use state::{CollisionType, GameState, Position, Snake};
