use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::collections::VecDeque;
use std::io::{Stderr, stderr};
use tracing::{debug, info, warn};

use super::scheduler::TickScheduler;
use crate::game::{CollisionType, GameConfig, GameEngine, GameState, StepResult};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::metrics::GameMetrics;
use crate::persistence::{HighScore, KeyValueStore};
use crate::render::Renderer;

/// Interactive game driven by keyboard and mouse in the terminal.
///
/// Terminal events are turned into [`KeyAction`]s and queued; the queue is
/// drained by the same loop that runs the ticks, so every mutation of the
/// game happens on one task, one at a time.
pub struct PlayMode<S: KeyValueStore> {
    engine: GameEngine,
    state: GameState,
    high_score: HighScore<S>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    commands: VecDeque<KeyAction>,
    /// Whether the last finished game beat the stored best
    new_record: bool,
    needs_redraw: bool,
    should_quit: bool,
}

impl<S: KeyValueStore> PlayMode<S> {
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let high_score = HighScore::load(store)?;

        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            high_score,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::new(),
            commands: VecDeque::new(),
            new_record: false,
            needs_redraw: false,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut scheduler = TickScheduler::new();
        self.metrics.on_game_start();
        scheduler.arm(self.state.tick_interval);

        info!(
            width = self.state.grid_width,
            height = self.state.grid_height,
            high_score = self.high_score.best(),
            "Game started"
        );
        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.queue_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game tick: render, then advance
                _ = scheduler.tick() => {
                    self.draw(terminal)?;
                    let result = self.update_game(&mut scheduler);
                    if result.info.collision_type.is_some() {
                        self.needs_redraw = true;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            self.process_commands(&mut scheduler);

            if self.should_quit {
                break;
            }

            if self.needs_redraw {
                self.draw(terminal)?;
            }
        }

        info!(
            games_played = self.metrics.games_played,
            session_best = self.metrics.session_best,
            "Quitting"
        );

        Ok(())
    }

    /// Turn a terminal event into a queued command
    fn queue_event(&mut self, event: Event) {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self
                .swipe
                .handle_mouse_event(mouse)
                .map_or(KeyAction::None, KeyAction::Turn),
            Event::Resize(..) => {
                self.needs_redraw = true;
                KeyAction::None
            }
            _ => KeyAction::None,
        };

        if action != KeyAction::None {
            self.commands.push_back(action);
        }
    }

    fn process_commands(&mut self, scheduler: &mut TickScheduler) {
        while let Some(action) = self.commands.pop_front() {
            self.apply_action(action, scheduler);
        }
    }

    fn apply_action(&mut self, action: KeyAction, scheduler: &mut TickScheduler) {
        match action {
            KeyAction::Turn(direction) => {
                if self.state.set_direction(direction) {
                    debug!(?direction, "Direction changed");
                }
            }
            KeyAction::TogglePause => {
                if self.state.toggle_pause() {
                    if self.state.is_paused() {
                        scheduler.cancel();
                        self.metrics.on_pause();
                        info!(score = self.state.score, "Paused");
                    } else {
                        scheduler.arm(self.state.tick_interval);
                        self.metrics.on_resume();
                        info!("Resumed");
                    }
                    self.needs_redraw = true;
                }
            }
            KeyAction::Restart => {
                self.reset_game(scheduler);
                self.needs_redraw = true;
            }
            KeyAction::ResetHighScore => {
                if let Err(err) = self.high_score.reset() {
                    warn!("Failed to clear high score: {err:#}");
                }
                self.needs_redraw = true;
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self, scheduler: &mut TickScheduler) -> StepResult {
        let result = self.engine.step(&mut self.state);

        if result.info.ate_food {
            self.metrics.on_food_eaten();
            debug!(
                points = result.points,
                special = result.info.special_food,
                score = self.state.score,
                "Food eaten"
            );
        }

        if result.interval_changed {
            scheduler.arm(self.state.tick_interval);
            debug!(
                interval_ms = self.state.tick_interval.as_millis() as u64,
                "Speed increased"
            );
        }

        if let Some(collision) = result.info.collision_type {
            scheduler.cancel();
            self.on_game_over(collision);
        }

        result
    }

    fn on_game_over(&mut self, collision: CollisionType) {
        let score = self.state.score;
        self.metrics.on_game_over(score);
        info!(score, steps = self.state.steps, ?collision, "Game over");

        self.new_record = match self.high_score.record(score) {
            Ok(beaten) => beaten,
            Err(err) => {
                warn!("Failed to save high score: {err:#}");
                false
            }
        };
    }

    fn reset_game(&mut self, scheduler: &mut TickScheduler) {
        self.state = self.engine.reset();
        self.new_record = false;
        self.metrics.on_game_start();
        scheduler.arm(self.state.tick_interval);
        info!("Game restarted");
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // Paused time is left out by the metrics; the clock freezes at game over
        if !self.state.is_over() {
            self.metrics.update();
        }

        let best = self.high_score.best();
        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, &self.state, best, self.new_record, &self.metrics);
            })
            .context("Failed to draw frame")?;
        self.needs_redraw = false;

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
