use std::time::{Duration, Instant};

/// Session clock shown next to the board
pub struct GameMetrics {
    started_at: Instant,
    /// Set once the game ends so the clock stops
    final_time: Option<Duration>,
    pub ticks: u64,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            final_time: None,
            ticks: 0,
            games_played: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.final_time
            .unwrap_or_else(|| self.started_at.elapsed())
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Instant::now();
        self.final_time = None;
        self.ticks = 0;
    }

    pub fn on_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn on_game_over(&mut self) {
        if self.final_time.is_none() {
            self.final_time = Some(self.started_at.elapsed());
            self.games_played += 1;
        }
    }

    pub fn format_time(&self) -> String {
        format_duration(self.elapsed())
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// mm:ss, minutes unbounded
pub fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
