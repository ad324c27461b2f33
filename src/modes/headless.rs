//! Line-oriented front end: direction commands in, JSON snapshots out.
//!
//! Each input line is one command (`up`, `down`, `left`, `right`,
//! `start`/`restart`, `quit`). Each output line is one serialized
//! `GameEvent`. The mode exits on `quit`, or once input is closed and the
//! current game is lost.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::session::{GameEvent, GameHandle, Ticker};

pub struct HeadlessMode {
    handle: GameHandle,
    tick_interval: Duration,
    input_handler: InputHandler,
}

impl HeadlessMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let tick_interval = config.tick_interval();
        let engine = GameEngine::new(config).context("Invalid game configuration")?;
        Ok(Self {
            handle: GameHandle::new(engine),
            tick_interval,
            input_handler: InputHandler::new(),
        })
    }

    /// Run against the process's stdin and stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run_with(stdin, stdout).await
    }

    pub async fn run_with<I, O>(&mut self, input: I, mut output: O) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let mut lines = input.lines();
        let mut input_open = true;
        let mut lost = false;

        let mut ticker = self.restart(&events_tx, &mut output).await?;

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line.context("Failed to read command")? {
                        Some(line) => match self.input_handler.handle_command(&line) {
                            KeyAction::Steer(direction) => {
                                self.handle.change_direction(direction).await;
                            }
                            KeyAction::Restart => {
                                ticker.stop().await;
                                while events_rx.try_recv().is_ok() {}
                                ticker = self.restart(&events_tx, &mut output).await?;
                                lost = false;
                            }
                            KeyAction::Quit => break,
                            KeyAction::None => {
                                if !line.trim().is_empty() {
                                    warn!("ignoring unknown command {:?}", line.trim());
                                }
                            }
                        },
                        None => {
                            debug!("command input closed");
                            input_open = false;
                            if lost {
                                break;
                            }
                        }
                    }
                }

                Some(event) = events_rx.recv() => {
                    lost = matches!(event, GameEvent::Lost(_));
                    write_event(&mut output, &event).await?;
                    if lost && !input_open {
                        break;
                    }
                }
            }
        }

        ticker.stop().await;
        info!("headless session finished");
        Ok(())
    }

    async fn restart<O>(
        &self,
        events: &mpsc::UnboundedSender<GameEvent>,
        output: &mut O,
    ) -> Result<Ticker>
    where
        O: AsyncWrite + Unpin,
    {
        let state = self.handle.start_game().await;
        write_event(output, &GameEvent::Started(state)).await?;
        Ok(Ticker::spawn(
            self.handle.clone(),
            self.tick_interval,
            events.clone(),
        ))
    }
}

async fn write_event<O>(output: &mut O, event: &GameEvent) -> Result<()>
where
    O: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(event).context("Failed to serialize game event")?;
    line.push('\n');
    output
        .write_all(line.as_bytes())
        .await
        .context("Failed to write game event")?;
    output.flush().await.context("Failed to flush game event")?;
    Ok(())
}
