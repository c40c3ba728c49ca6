use std::collections::VecDeque;

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// Segments are stored tail first, so the head is the last element. The body
/// is never empty and holds no duplicate cells while the round is running.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    /// Heading of the last move (or the initial heading)
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose head is at `head`, with `length - 1` segments laid
    /// out behind it, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .rev()
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        *self.body.back().expect("snake body is never empty")
    }

    /// Get the tail position
    pub fn tail(&self) -> Position {
        *self.body.front().expect("snake body is never empty")
    }

    /// Segments from tail to head
    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move one cell in the current direction. The new head is appended
    /// first; the tail is dropped afterwards unless the snake grows.
    pub fn advance(&mut self, grow: bool) -> Position {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_back(new_head);

        if !grow {
            self.body.pop_front();
        }

        new_head
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the snake covers every cell
    pub food: Option<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub paused: bool,
    pub game_over: bool,
    pub collision: Option<CollisionType>,
}

impl GameState {
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            paused: false,
            game_over: false,
            collision: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Whether a tick would advance the snake
    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }

    /// The round ended because the board filled up, not by a collision
    pub fn is_won(&self) -> bool {
        self.game_over && self.collision.is_none()
    }

    /// Flip the paused flag; a finished round stays as it is.
    /// Returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.game_over {
            self.paused = !self.paused;
        }
        self.paused
    }
}
