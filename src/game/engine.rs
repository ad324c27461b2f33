use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    error::{ConfigError, StateError},
    state::{CollisionType, GameState, Position, Snake},
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate and grew by one segment
    Ate,
    /// The snake hit something; the game is now lost
    Collided(CollisionType),
    /// The game was already lost, nothing changed
    AlreadyLost,
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Collided(_) | StepOutcome::AlreadyLost)
    }
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Snapshot after the step
    pub state: GameState,
    pub outcome: StepOutcome,
}

/// Owns the current game and applies every state transition.
///
/// The engine is single-writer: callers that share it between an input
/// context and a timer context wrap it in a lock (see [`crate::session`]).
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    rng: R,
    game: Option<GameState>,
}

impl GameEngine<StdRng> {
    /// Create an engine seeded from `config.seed`, or from entropy when unset
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "engine configured for a {}x{} board",
            config.width, config.height
        );
        Ok(Self {
            config,
            rng,
            game: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The game in progress, if `start_game` has been called
    pub fn state(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Replace the current game with an explicit state, e.g. one read back
    /// from a serialized snapshot. The state must fit the configured board
    /// and satisfy `GameState::validate`.
    pub fn restore(&mut self, state: GameState) -> Result<(), StateError> {
        if state.width != self.config.width || state.height != self.config.height {
            return Err(StateError::BoardMismatch {
                width: state.width,
                height: state.height,
                expected_width: self.config.width,
                expected_height: self.config.height,
            });
        }
        state.validate()?;

        self.game = Some(state);
        Ok(())
    }

    /// Start a fresh game, discarding any game in progress
    pub fn start_game(&mut self) -> GameState {
        let snake = Snake::new(self.config.start_position());
        let mut state = GameState::new(
            self.config.width,
            self.config.height,
            snake,
            None,
            self.config.initial_direction,
        );
        state.food = spawn_food(&mut self.rng, &state);

        info!(
            "new game: head at ({}, {}), heading {}",
            state.snake.head().x,
            state.snake.head().y,
            state.direction
        );
        self.game = Some(state.clone());
        state
    }

    /// Record the heading to apply on the next tick.
    ///
    /// A reversal onto the current heading is dropped while the snake is
    /// longer than one cell. No-op without a running game.
    pub fn change_direction(&mut self, requested: Direction) {
        let Some(state) = self.game.as_mut() else {
            return;
        };
        if state.lost {
            return;
        }

        if state.snake.len() > 1 && state.direction.is_opposite(requested) {
            debug!(
                "ignoring reversal from {} to {}",
                state.direction, requested
            );
            return;
        }

        state.pending_direction = Some(requested);
    }

    /// Advance one step. Returns `None` when no game has been started.
    pub fn step(&mut self) -> Option<StepResult> {
        let state = self.game.as_mut()?;

        if state.lost {
            return Some(StepResult {
                state: state.clone(),
                outcome: StepOutcome::AlreadyLost,
            });
        }

        if let Some(direction) = state.pending_direction.take() {
            state.direction = direction;
        }

        let new_head = state.snake.head().step(state.direction);

        let outcome = if !state.is_in_bounds(new_head) {
            StepOutcome::Collided(CollisionType::Wall)
        } else {
            let grows = state.food == Some(new_head);
            if state.snake.would_bite(new_head, grows) {
                StepOutcome::Collided(CollisionType::SelfCollision)
            } else {
                state.snake.advance(new_head, grows);
                if grows {
                    state.food = spawn_food(&mut self.rng, state);
                    StepOutcome::Ate
                } else {
                    StepOutcome::Moved
                }
            }
        };

        if let StepOutcome::Collided(collision) = outcome {
            state.lost = true;
            info!(
                "game lost: {:?} at ({}, {}) with length {}",
                collision,
                new_head.x,
                new_head.y,
                state.snake.len()
            );
        }

        Some(StepResult {
            state: state.clone(),
            outcome,
        })
    }

    /// Advance one step and return the snapshot
    pub fn tick(&mut self) -> Option<GameState> {
        self.step().map(|result| result.state)
    }
}

/// Pick a uniformly random free cell, or `None` when the snake fills the board
fn spawn_food<R: Rng>(rng: &mut R, state: &GameState) -> Option<Position> {
    let food = state.free_cells().choose(rng).copied();
    if food.is_none() {
        warn!("no free cell left for food, continuing without it");
    }
    food
}
