use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::direction::Direction;
use super::error::StateError;

/// A cell on the board; (0, 0) is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`, which may lie off the board
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The snake's body, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub body: Vec<Position>,
}

impl Snake {
    /// A one-cell snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from explicit segments. Returns `None` for an empty body.
    pub fn from_body(body: Vec<Position>) -> Option<Self> {
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a snake built through `new` or `from_body`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Whether moving the head onto `pos` hits the body.
    ///
    /// The tail cell only counts when it stays put, i.e. when the snake grows
    /// on this move.
    pub fn would_bite(&self, pos: Position, grows: bool) -> bool {
        let solid = if grows {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        solid.contains(&pos)
    }

    /// Push a new head; the tail is dropped unless `grows`
    pub fn advance(&mut self, new_head: Position, grows: bool) {
        self.body.insert(0, new_head);
        if !grows {
            self.body.pop();
        }
    }
}

/// Collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    Wall,
    SelfCollision,
}

/// Complete game state, serialized to the presentation layer after every
/// transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub width: i32,
    pub height: i32,
    pub snake: Snake,
    /// `None` only once the snake covers every cell
    pub food: Option<Position>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
    pub lost: bool,
}

impl GameState {
    pub fn new(
        width: i32,
        height: i32,
        snake: Snake,
        food: Option<Position>,
        direction: Direction,
    ) -> Self {
        Self {
            width,
            height,
            snake,
            food,
            direction,
            pending_direction: None,
            lost: false,
        }
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check the at-rest invariants: a non-empty snake on the board with no
    /// repeated segment, and food (if any) on a free cell.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.snake.is_empty() {
            return Err(StateError::EmptySnake);
        }

        let mut seen = HashSet::with_capacity(self.snake.len());
        for &pos in &self.snake.body {
            if !self.is_in_bounds(pos) {
                return Err(StateError::SnakeOutOfBounds { x: pos.x, y: pos.y });
            }
            if !seen.insert(pos) {
                return Err(StateError::OverlappingSnake { x: pos.x, y: pos.y });
            }
        }

        if let Some(food) = self.food {
            if !self.is_in_bounds(food) || seen.contains(&food) {
                return Err(StateError::MisplacedFood {
                    x: food.x,
                    y: food.y,
                });
            }
        }

        Ok(())
    }

    /// Every in-bounds cell not covered by the snake, row by row
    pub fn free_cells(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity(self.cell_count().saturating_sub(self.snake.len()));
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if !self.snake.contains(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_body(cells.iter().map(|&(x, y)| Position::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn test_position_step() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.step(Direction::Right), Position::new(6, 5));
        assert_eq!(pos.step(Direction::Left), Position::new(4, 5));
        assert_eq!(pos.step(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.step(Direction::Up), Position::new(5, 4));
        assert_eq!(Position::new(0, 0).step(Direction::Up), Position::new(0, -1));
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(Snake::from_body(Vec::new()).is_none());
    }

    #[test]
    fn test_advance_moves_and_grows() {
        let mut s = snake(&[(2, 2), (1, 2)]);
        s.advance(Position::new(3, 2), false);
        assert_eq!(s.body, vec![Position::new(3, 2), Position::new(2, 2)]);

        s.advance(Position::new(4, 2), true);
        assert_eq!(s.len(), 3);
        assert_eq!(s.head(), Position::new(4, 2));
        assert_eq!(s.tail(), Position::new(2, 2));
    }

    #[test]
    fn test_tail_is_free_only_when_it_vacates() {
        let s = snake(&[(1, 1), (2, 1), (2, 2), (1, 2)]);
        assert!(!s.would_bite(Position::new(1, 2), false));
        assert!(s.would_bite(Position::new(1, 2), true));
        assert!(s.would_bite(Position::new(2, 2), false));
        assert!(!s.would_bite(Position::new(0, 1), false));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(20, 10, snake(&[(5, 5)]), None, Direction::Right);
        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 9)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 10)));
        assert!(!state.is_in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn test_validate_rejects_broken_states() {
        let ok = GameState::new(
            4,
            4,
            snake(&[(1, 1), (2, 1)]),
            Some(Position::new(3, 3)),
            Direction::Left,
        );
        assert_eq!(ok.validate(), Ok(()));

        let empty = GameState {
            snake: Snake { body: Vec::new() },
            ..ok.clone()
        };
        assert_eq!(empty.validate(), Err(StateError::EmptySnake));

        let off_board = GameState {
            snake: snake(&[(3, 1), (4, 1)]),
            ..ok.clone()
        };
        assert_eq!(
            off_board.validate(),
            Err(StateError::SnakeOutOfBounds { x: 4, y: 1 })
        );

        let doubled = GameState {
            snake: snake(&[(1, 1), (2, 1), (1, 1)]),
            ..ok.clone()
        };
        assert_eq!(
            doubled.validate(),
            Err(StateError::OverlappingSnake { x: 1, y: 1 })
        );

        let buried_food = GameState {
            food: Some(Position::new(2, 1)),
            ..ok.clone()
        };
        assert_eq!(
            buried_food.validate(),
            Err(StateError::MisplacedFood { x: 2, y: 1 })
        );
    }

    #[test]
    fn test_deserialized_empty_snake_is_caught() {
        let state: GameState = serde_json::from_str(
            r#"{"width":3,"height":3,"snake":{"body":[]},"food":null,
                "direction":"Up","pending_direction":null,"lost":false}"#,
        )
        .unwrap();
        assert_eq!(state.validate(), Err(StateError::EmptySnake));
    }

    #[test]
    fn test_free_cells_exclude_snake() {
        let state = GameState::new(2, 2, snake(&[(0, 0), (1, 0)]), None, Direction::Left);
        assert_eq!(
            state.free_cells(),
            vec![Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let state = GameState::new(
            4,
            3,
            snake(&[(2, 1), (1, 1)]),
            Some(Position::new(3, 2)),
            Direction::Right,
        );
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["width"], 4);
        assert_eq!(json["height"], 3);
        assert_eq!(json["snake"]["body"][0]["x"], 2);
        assert_eq!(json["snake"]["body"][1]["y"], 1);
        assert_eq!(json["food"]["x"], 3);
        assert_eq!(json["direction"], "Right");
        assert!(json["pending_direction"].is_null());
        assert_eq!(json["lost"], false);
    }
}
