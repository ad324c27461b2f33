//! Sharing one engine between an input context and a periodic tick driver.
//!
//! `GameHandle` is the owned, cloneable reference to the engine; every call
//! holds the lock for exactly one engine operation. `Ticker` is the timer
//! task that advances the game and forwards snapshots to the presentation
//! side until the game is lost.

use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Direction, GameEngine, GameState, StepResult};

/// Snapshot notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "state", rename_all = "lowercase")]
pub enum GameEvent {
    /// A fresh game was started
    Started(GameState),
    /// A tick moved the snake
    Tick(GameState),
    /// A tick ended the game; no further events follow for this game
    Lost(GameState),
}

impl GameEvent {
    pub fn state(&self) -> &GameState {
        match self {
            GameEvent::Started(state) | GameEvent::Tick(state) | GameEvent::Lost(state) => state,
        }
    }
}

/// Cloneable handle to a single engine instance
#[derive(Clone)]
pub struct GameHandle {
    engine: Arc<Mutex<GameEngine>>,
}

impl GameHandle {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    pub async fn start_game(&self) -> GameState {
        self.engine.lock().await.start_game()
    }

    pub async fn change_direction(&self, direction: Direction) {
        self.engine.lock().await.change_direction(direction);
    }

    pub async fn step(&self) -> Option<StepResult> {
        self.engine.lock().await.step()
    }

    pub async fn tick(&self) -> Option<GameState> {
        self.engine.lock().await.tick()
    }

    /// Copy of the current game, if one was started
    pub async fn snapshot(&self) -> Option<GameState> {
        self.engine.lock().await.state().cloned()
    }
}

/// Periodic driver calling `tick` on a fixed interval
pub struct Ticker {
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn the driver on the current tokio runtime.
    ///
    /// The task ends by itself after sending `GameEvent::Lost`, when the
    /// receiver is dropped, or when no game has been started.
    pub fn spawn(
        handle: GameHandle,
        period: Duration,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let task = tokio::spawn(run_ticker(handle, period, events));
        Self { task }
    }

    /// Cancel the driver and wait until its task has ended. Once this
    /// returns, no further event from this driver can reach the receiver.
    pub async fn stop(self) {
        self.task.abort();
        self.join().await;
    }

    /// Wait for the driver to end on its own
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            if !err.is_cancelled() {
                debug!("ticker task failed: {}", err);
            }
        }
    }
}

async fn run_ticker(
    handle: GameHandle,
    period: Duration,
    events: mpsc::UnboundedSender<GameEvent>,
) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick of a tokio interval completes immediately
    timer.tick().await;

    loop {
        timer.tick().await;

        let Some(result) = handle.step().await else {
            debug!("ticker stopped: no game in progress");
            break;
        };

        let terminal = result.outcome.is_terminal();
        let event = if terminal {
            GameEvent::Lost(result.state)
        } else {
            GameEvent::Tick(result.state)
        };

        if events.send(event).is_err() {
            debug!("ticker stopped: event receiver dropped");
            break;
        }

        if terminal {
            info!("ticker stopped: game over");
            break;
        }
    }
}
