// MDB - Machine-State Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! Terminal User Interface for MDB
//!
//! This crate provides a terminal-based front-end for inspecting a process
//! attached to a headless MDB debug server: a disassembly window centered
//! on the program counter, the register file, and a stack window, all
//! diff-highlighted against the previous observation.

mod app;
mod arch;
mod config;
pub mod launch;
mod layout;
mod panels;
mod rpc;
mod snapshot;
mod stepper;
mod ui;

pub use app::{App, EventResponse};
pub use config::Config;
pub use layout::LayoutManager;
pub use panels::{Panel, PanelType};
pub use rpc::{ChannelError, DebugChannel, RpcClient};
pub use snapshot::{Snapshot, SnapshotStore, StackWord, STACK_WINDOW};
pub use stepper::StepCommand;
pub use ui::Theme;

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Configuration for the TUI
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// User configuration (colors, RPC timeout)
    pub config: Config,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { rpc_url: "http://127.0.0.1:4111".to_string(), config: Config::default() }
    }
}

/// Main TUI runner that manages the terminal interface and event loop
pub struct Tui {
    /// The main application state and pane management
    app: App<RpcClient>,
    /// Terminal backend for rendering and input handling
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new(config: TuiConfig) -> Result<Self> {
        info!("Initializing TUI with config: {:?}", config);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create RPC client
        let rpc_client = Arc::new(RpcClient::new(&config.rpc_url, config.config.rpc_timeout())?);

        let (width, height) = crossterm::terminal::size()?;
        let app = App::new(
            rpc_client,
            LayoutManager::new(width, height),
            Theme::from_config(&config.config),
        );

        Ok(Self { app, terminal })
    }

    /// Run the main TUI event loop
    ///
    /// Every key press or resize triggers exactly one full poll of the
    /// debug server followed by a render. Step commands run as a single
    /// spawned task so that Esc can abandon the wait and `q` can still
    /// quit while the debuggee runs; while one is in flight no other
    /// request is issued over the channel.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting TUI event loop");

        // Park the view on a first observation before any input arrives.
        self.app.poll().await?;

        let mut event_stream = EventStream::new();
        let mut in_flight: Option<JoinHandle<Result<(), ChannelError>>> = None;

        loop {
            self.terminal.draw(|frame| self.app.render(frame))?;

            tokio::select! {
                event_result = event_stream.next() => {
                    let Some(Ok(current_event)) = event_result else {
                        break;
                    };
                    debug!("Received event: {:?}", current_event);

                    match current_event {
                        Event::Key(key_event) => {
                            match self.app.handle_key_event(key_event) {
                                EventResponse::Exit => {
                                    if let Some(handle) = in_flight.take() {
                                        handle.abort();
                                    }
                                    info!("Exit requested");
                                    break;
                                }
                                EventResponse::StopWaiting => {
                                    match in_flight.take() {
                                        Some(handle) => {
                                            warn!("Abandoning in-flight step command");
                                            handle.abort();
                                        }
                                        None => debug!("Nothing in flight to stop"),
                                    }
                                    self.app.poll().await?;
                                }
                                EventResponse::Command(command) => {
                                    if in_flight.is_some() {
                                        warn!(?command, "Step command ignored: another is in flight");
                                        continue;
                                    }
                                    let channel = self.app.channel();
                                    in_flight = Some(tokio::spawn(async move {
                                        stepper::run(channel.as_ref(), command).await
                                    }));
                                }
                                EventResponse::Handled => {
                                    if in_flight.is_none() {
                                        self.app.poll().await?;
                                    }
                                }
                            }
                        }
                        Event::Resize(width, height) => {
                            debug!("Terminal resized: {}x{}", width, height);
                            self.app.handle_resize(width, height);
                            if in_flight.is_none() {
                                self.app.poll().await?;
                            }
                        }
                        _ => {}
                    }
                }

                // The in-flight step command landed: one fresh poll, then
                // the next render shows the diff.
                step_result = join_in_flight(&mut in_flight) => {
                    in_flight = None;
                    match step_result {
                        Ok(result) => result?,
                        Err(join_error) if join_error.is_cancelled() => {}
                        Err(join_error) => return Err(join_error.into()),
                    }
                    self.app.poll().await?;
                }
            }
        }

        info!("TUI event loop ended");
        Ok(())
    }
}

async fn join_in_flight(
    in_flight: &mut Option<JoinHandle<Result<(), ChannelError>>>,
) -> Result<Result<(), ChannelError>, tokio::task::JoinError> {
    match in_flight.as_mut() {
        Some(handle) => handle.await,
        // Nothing to wait on: park until the other select branches win.
        None => std::future::pending().await,
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Public API for the TUI module
pub mod api {
    use super::*;

    /// Start the TUI with the given configuration
    pub async fn start_tui(config: TuiConfig) -> Result<()> {
        let tui = Tui::new(config)?;
        tui.run().await
    }
}
