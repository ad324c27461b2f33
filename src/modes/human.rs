use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::game::{GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::{GameEvent, GameHandle, Ticker};

/// Keyboard-driven game in the terminal
pub struct HumanMode {
    handle: GameHandle,
    tick_interval: Duration,
    events_tx: mpsc::UnboundedSender<GameEvent>,
    events_rx: mpsc::UnboundedReceiver<GameEvent>,
    ticker: Option<Ticker>,
    state: Option<GameState>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let tick_interval = config.tick_interval();
        let engine = GameEngine::new(config).context("Invalid game configuration")?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            handle: GameHandle::new(engine),
            tick_interval,
            events_tx,
            events_rx,
            ticker: None,
            state: None,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.start_game().await;
        let result = self.run_game_loop(&mut terminal).await;

        if let Some(ticker) = self.ticker.take() {
            ticker.stop().await;
        }
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // 30 FPS, independent of the tick rate
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                Some(event) = self.events_rx.recv() => {
                    self.apply_event(event);
                }

                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.state.as_ref(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.handle.change_direction(direction).await,
            KeyAction::Restart => self.start_game().await,
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Started(state) => {
                self.metrics.on_game_start();
                self.state = Some(state);
            }
            GameEvent::Tick(state) => {
                self.metrics.on_tick();
                self.state = Some(state);
            }
            GameEvent::Lost(state) => {
                self.metrics.on_tick();
                self.metrics.on_game_over();
                debug!("game over after {} ticks", self.metrics.ticks);
                self.state = Some(state);
            }
        }
    }

    /// Replace the game and its driver. The old driver has ended before its
    /// queued events are drained, so none of them can overwrite the new game.
    async fn start_game(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop().await;
        }
        while self.events_rx.try_recv().is_ok() {}

        let state = self.handle.start_game().await;
        self.apply_event(GameEvent::Started(state));
        self.ticker = Some(Ticker::spawn(
            self.handle.clone(),
            self.tick_interval,
            self.events_tx.clone(),
        ));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(3),
            ..GameConfig::new(12, 12)
        }
    }

    #[test]
    fn test_invalid_config_is_reported() {
        assert!(HumanMode::new(GameConfig::new(0, 0)).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_starts_and_ticks() {
        let mut mode = HumanMode::new(config()).unwrap();
        mode.start_game().await;
        assert_eq!(mode.state.as_ref().unwrap().snake.len(), 1);

        let event = mode.events_rx.recv().await.unwrap();
        mode.apply_event(event);

        assert_eq!(mode.metrics.ticks, 1);
        assert_eq!(
            mode.state.as_ref().unwrap().direction,
            Direction::Right
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_steer_and_quit() {
        let mut mode = HumanMode::new(config()).unwrap();
        mode.start_game().await;

        mode.handle_event(key(KeyCode::Up)).await;
        let event = mode.events_rx.recv().await.unwrap();
        assert_eq!(event.state().direction, Direction::Up);

        mode.handle_event(key(KeyCode::Char('q'))).await;
        assert!(mode.should_quit);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_restart_mid_game_starts_clean() {
        let config = GameConfig {
            start: Some(Position::new(0, 0)),
            tick_interval_ms: 1,
            ..GameConfig::new(200, 2)
        };
        let mut mode = HumanMode::new(config).unwrap();

        for round in 0..300 {
            mode.start_game().await;
            assert_eq!(mode.metrics.ticks, 0);

            let event = mode.events_rx.recv().await.unwrap();
            assert!(matches!(event, GameEvent::Tick(_)), "round {round}");
            assert_eq!(event.state().snake.head(), Position::new(1, 0), "round {round}");
        }

        if let Some(ticker) = mode.ticker.take() {
            ticker.stop().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_lost_game() {
        let mut mode = HumanMode::new(config()).unwrap();
        mode.start_game().await;

        while let Some(event) = mode.events_rx.recv().await {
            let lost = matches!(event, GameEvent::Lost(_));
            mode.apply_event(event);
            if lost {
                break;
            }
        }
        assert!(mode.state.as_ref().unwrap().lost);
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(key(KeyCode::Char('r'))).await;
        assert!(!mode.state.as_ref().unwrap().lost);
        assert_eq!(mode.metrics.ticks, 0);
    }
}
