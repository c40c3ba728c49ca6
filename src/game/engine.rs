use log::debug;
use rand::{Rng, rngs::ThreadRng, seq::SliceRandom};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};

/// Random guesses at a food cell before falling back to scanning the grid
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the snake moved
    pub advanced: bool,
    /// Whether this step ended the round
    pub terminated: bool,
    /// Score gained on this step
    pub score_gained: u32,
    pub info: StepInfo,
}

impl StepResult {
    fn idle() -> Self {
        Self {
            advanced: false,
            terminated: false,
            score_gained: 0,
            info: StepInfo {
                ate_food: false,
                collision_type: None,
            },
        }
    }
}

/// The game engine that applies the update rule once per tick
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing food positions from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh round: the snake lies along the top row heading right,
    /// with its tail in the top-left corner.
    pub fn reset(&mut self) -> GameState {
        let length = self
            .config
            .initial_snake_length
            .clamp(1, self.config.grid_width.max(1));

        let snake = Snake::new(
            Position::new(length as i32 - 1, 0),
            Direction::Right,
            length,
        );

        let food = self.spawn_food(&snake);
        let mut state = GameState::new(snake, food, self.config.grid_width, self.config.grid_height);
        state.game_over = food.is_none();
        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_running() {
            return StepResult::idle();
        }

        // The snake's direction is always the heading of its last move, so
        // a reversal is rejected no matter how many keys were pressed between
        // two ticks.
        if let Action::Move(new_direction) = action {
            if !state.snake.direction.is_opposite(new_direction) {
                state.snake.direction = new_direction;
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.game_over = true;
            state.collision = Some(collision_type);

            return StepResult {
                advanced: false,
                terminated: true,
                score_gained: 0,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        let ate_food = state.food == Some(new_head);
        state.snake.advance(ate_food);
        state.steps += 1;

        let mut score_gained = 0;
        if ate_food {
            score_gained = self.config.food_reward;
            state.score = state.score.saturating_add(score_gained);
            state.food = self.spawn_food(&state.snake);
            debug!(
                "food eaten at ({}, {}), score {}, length {}",
                new_head.x,
                new_head.y,
                state.score,
                state.snake.len()
            );

            if state.food.is_none() {
                state.game_over = true;
            }
        }

        StepResult {
            advanced: true,
            terminated: state.game_over,
            score_gained,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check if the new head position causes a collision.
    ///
    /// Runs before the tail moves, so the current tail cell counts as
    /// occupied.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a random free cell, or `None` when the snake fills the grid.
    ///
    /// Tries random cells first; the full scan only runs once the board is
    /// crowded enough that guesses keep landing on the snake.
    fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;
        if width <= 0 || height <= 0 {
            return None;
        }

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = Position::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));
            if !snake.contains(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.contains(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
