use std::time::{Duration, Instant};

/// Round clock and per-session tallies shown in the header. Kept in memory
/// only; a new process starts from zero.
pub struct GameMetrics {
    /// Playing time of the current round, excluding pauses
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    round_started: Instant,
    paused_since: Option<Instant>,
    paused_total: Duration,
    round_over: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            round_started: Instant::now(),
            paused_since: None,
            paused_total: Duration::ZERO,
            round_over: false,
        }
    }

    /// Advance the round clock. It holds still while paused and after the
    /// round has ended.
    pub fn update(&mut self) {
        if self.round_over || self.paused_since.is_some() {
            return;
        }
        self.elapsed_time = self
            .round_started
            .elapsed()
            .saturating_sub(self.paused_total);
    }

    pub fn on_game_start(&mut self) {
        self.round_started = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paused_since = None;
        self.paused_total = Duration::ZERO;
        self.round_over = false;
    }

    /// Stop or restart the clock when the player pauses or resumes
    pub fn on_pause_changed(&mut self, paused: bool) {
        match (paused, self.paused_since) {
            (true, None) => {
                self.update();
                self.paused_since = Some(Instant::now());
            }
            (false, Some(since)) => {
                self.paused_total += since.elapsed();
                self.paused_since = None;
            }
            _ => {}
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.round_over = true;
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
    }

    /// Round time as `MM:SS`; minutes keep counting past an hour
    pub fn format_time(&self) -> String {
        let secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
