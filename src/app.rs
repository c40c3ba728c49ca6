use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use rand::Rng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{
    Action, CollisionType, Direction, GameConfig, GameEngine, GameState, TickSpeed,
};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at ~30 FPS, independent of the game tick
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive session: owns the state machine and drives it from the
/// terminal.
pub struct App<R: Rng> {
    engine: GameEngine<R>,
    state: GameState,
    speed: TickSpeed,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    speed_changed: bool,
    pending_direction: Option<Direction>,
}

impl<R: Rng> App<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let speed = config.speed();
        let mut engine = GameEngine::with_rng(config, rng);
        let state = engine.reset();

        Self {
            engine,
            state,
            speed,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            speed_changed: false,
            pending_direction: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            "starting on a {}x{} grid, tick every {} ms",
            self.state.grid_width,
            self.state.grid_height,
            self.speed.delay_ms()
        );

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal even if the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = new_tick_timer(self.speed);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, self.speed);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.speed_changed {
                tick_timer = new_tick_timer(self.speed);
                self.speed_changed = false;
            }

            if self.should_quit {
                info!("quitting after {} rounds", self.metrics.games_played);
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(Action::Move(dir)) => {
                if !self.state.game_over {
                    self.pending_direction = Some(dir);
                }
            }
            KeyAction::GameAction(Action::Continue) | KeyAction::None => {}
            KeyAction::TogglePause => {
                let paused = self.state.toggle_pause();
                self.metrics.on_pause_changed(paused);
                info!("{}", if paused { "paused" } else { "resumed" });
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::Faster => {
                if self.speed.faster() {
                    self.on_speed_change();
                }
            }
            KeyAction::Slower => {
                if self.speed.slower() {
                    self.on_speed_change();
                }
            }
            KeyAction::Quit => self.should_quit = true,
        }
    }

    fn update_game(&mut self) {
        if !self.state.is_running() {
            return;
        }

        let action = Action::from(self.pending_direction.take());
        let result = self.engine.step(&mut self.state, action);

        if result.terminated {
            self.metrics.on_game_over(self.state.score);

            match self.state.collision {
                Some(CollisionType::Wall) => info!(
                    "round over: hit the wall, score {} after {} steps",
                    self.state.score, self.state.steps
                ),
                Some(CollisionType::SelfCollision) => info!(
                    "round over: ran into itself, score {} after {} steps",
                    self.state.score, self.state.steps
                ),
                None => info!("round over: board cleared, score {}", self.state.score),
            }
        }
    }

    fn on_speed_change(&mut self) {
        self.speed_changed = true;
        debug!("tick delay now {} ms", self.speed.delay_ms());
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
        info!("round restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Fixed-period tick whose first deadline is one full period away, so a
/// speed change never fires an immediate extra tick.
fn new_tick_timer(speed: TickSpeed) -> Interval {
    let period = speed.interval();
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use rand::{SeedableRng, rngs::StdRng};

    fn app() -> App<StdRng> {
        App::new(GameConfig::small(), StdRng::seed_from_u64(42))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let app = app();
        assert!(app.state.is_running());
        assert_eq!(app.state.score, 0);
        assert_eq!(app.speed.delay_ms(), 200);
    }

    #[test]
    fn test_game_reset() {
        let mut app = app();
        app.state.score = 10;
        app.state.game_over = true;
        app.pending_direction = Some(Direction::Down);

        app.handle_event(key(KeyCode::Char('r')));

        assert_eq!(app.state.score, 0);
        assert!(app.state.is_running());
        assert_eq!(app.pending_direction, None);
    }

    #[test]
    fn test_direction_applied_on_next_tick() {
        let mut app = app();
        app.state.food = Some(Position::new(9, 9));

        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.state.snake.head(), Position::new(0, 0));

        app.update_game();
        assert_eq!(app.state.snake.head(), Position::new(0, 1));
        assert_eq!(app.pending_direction, None);
    }

    #[test]
    fn test_last_key_before_tick_wins() {
        let mut app = app();
        app.state.food = Some(Position::new(9, 9));

        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Right));
        app.update_game();

        assert_eq!(app.state.snake.head(), Position::new(1, 0));
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app();
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );

        app.handle_event(Event::Key(release));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let mut app = app();
        let head = app.state.snake.head();

        app.handle_event(key(KeyCode::Char('p')));
        app.update_game();
        assert!(app.state.paused);
        assert_eq!(app.state.snake.head(), head);

        app.handle_event(key(KeyCode::Char('p')));
        app.update_game();
        assert_ne!(app.state.snake.head(), head);
    }

    #[test]
    fn test_round_clock_stops_while_paused() {
        let mut app = app();

        app.handle_event(key(KeyCode::Char('p')));
        let frozen = app.metrics.elapsed_time;
        std::thread::sleep(Duration::from_millis(30));
        app.metrics.update();
        assert_eq!(app.metrics.elapsed_time, frozen);

        app.handle_event(key(KeyCode::Char('p')));
        app.metrics.update();
        assert!(app.metrics.elapsed_time < Duration::from_millis(30));
    }

    #[test]
    fn test_speed_keys_flag_timer_rebuild() {
        let mut app = app();

        app.handle_event(key(KeyCode::Char('+')));
        assert!(app.speed_changed);
        assert_eq!(app.speed.delay_ms(), 190);

        app.speed_changed = false;
        app.speed = TickSpeed::with_delay(300);
        app.handle_event(key(KeyCode::Char('-')));
        assert!(!app.speed_changed);
        assert_eq!(app.speed.delay_ms(), 300);
    }

    #[test]
    fn test_game_over_recorded_once() {
        let mut app = app();
        app.state.food = Some(Position::new(9, 9));

        app.handle_event(key(KeyCode::Up));
        app.update_game();
        assert!(app.state.game_over);
        assert_eq!(app.metrics.games_played, 1);

        app.update_game();
        assert_eq!(app.metrics.games_played, 1);
    }

    #[test]
    fn test_direction_ignored_after_game_over() {
        let mut app = app();
        app.state.game_over = true;

        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.pending_direction, None);
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        app.handle_event(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
