use std::time::{Duration, Instant};

/// Per-session stats shown in the header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Time spent paused in the current game, excluding an ongoing pause
    pub paused_total: Duration,
    pub paused_at: Option<Instant>,
    /// Best score since the program started
    pub session_best: u32,
    pub games_played: u32,
    pub foods_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            paused_total: Duration::ZERO,
            paused_at: None,
            session_best: 0,
            games_played: 0,
            foods_eaten: 0,
        }
    }

    /// Refresh the play time; time spent paused does not count
    pub fn update(&mut self) {
        let now = Instant::now();
        let current_pause = self
            .paused_at
            .map_or(Duration::ZERO, |paused_at| now.duration_since(paused_at));
        self.elapsed_time = now
            .duration_since(self.start_time)
            .saturating_sub(self.paused_total + current_pause);
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paused_total = Duration::ZERO;
        self.paused_at = None;
    }

    pub fn on_pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn on_resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += paused_at.elapsed();
        }
    }

    pub fn on_food_eaten(&mut self) {
        self.foods_eaten += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.games_played += 1;
        if final_score > self.session_best {
            self.session_best = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
