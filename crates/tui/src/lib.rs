// Ooga Workbench - Debug visualization for ooga-lang programs
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

//! Terminal workbench for ooga-lang debug runs
//!
//! Submits a program to the execution service and shows every breakpoint it
//! reached as a heap graph next to the per-thread stacks. Runs happen on a
//! background task; their results arrive through a channel and replace the
//! views in one step.

mod app;
mod client;
mod config;
mod dump;
mod panels;
mod ui;

pub use app::App;
pub use client::{ExecutionClient, SERVICE_UNAVAILABLE};
pub use config::{ColorScheme, Config, ServiceConfig, Theme, ThemeConfig, DEFAULT_SERVICE_URL};
pub use dump::{dump_response, read_response, Dump};
pub use panels::{
    EventResponse, HeapPanel, OutputPanel, Panel, PanelContext, PanelType, RunStatus, StackPanel,
};
pub use ui::{BorderPresets, EnhancedBorder, EnhancedBorderStyle};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::{bail, Result};
use futures::{FutureExt, StreamExt};
use ooga_common::types::RunResponse;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, path::PathBuf, time::Duration};
use tokio::{
    select,
    sync::mpsc::{unbounded_channel, UnboundedSender},
    time::interval,
};
use tracing::{debug, error, info, warn};

/// Configuration for the TUI
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Execution service URL
    pub service_url: String,
    /// Execution service request timeout
    pub timeout: Duration,
    /// Program to run at startup and on `r`
    pub source: Option<PathBuf>,
    /// Saved response to show instead of running anything
    pub response: Option<PathBuf>,
    /// Terminal refresh interval
    pub refresh_interval: Duration,
    /// Enable mouse support
    pub enable_mouse: bool,
    /// Active colours
    pub colors: ColorScheme,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout: Duration::from_secs(30),
            source: None,
            response: None,
            refresh_interval: Duration::from_millis(50),
            enable_mouse: false,
            colors: ColorScheme::default(),
        }
    }
}

/// Main TUI runner that manages the terminal interface and event loop
pub struct Tui {
    /// The main application state and panel management
    app: App,
    /// Terminal backend for rendering and input handling
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Client for the execution service
    client: ExecutionClient,
    /// Configuration settings for the TUI behavior
    config: TuiConfig,
}

impl Tui {
    /// Create a new TUI instance
    pub async fn new(config: TuiConfig) -> Result<Self> {
        info!("Initializing TUI with config: {:?}", config);

        let client = ExecutionClient::new(&config.service_url, config.timeout)?;
        let app = App::new(config.colors.clone(), client.server_url());

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.enable_mouse {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { app, terminal, client, config })
    }

    /// Run the main TUI event loop
    pub async fn run(mut self) -> Result<()> {
        info!("Starting TUI event loop");

        let (run_tx, mut run_rx) = unbounded_channel::<RunResponse>();

        if let Some(path) = self.config.response.clone() {
            match read_response(&path) {
                Ok(response) => self.app.install(response),
                Err(e) => self.app.install(RunResponse::failure(format!("{e:#}"))),
            }
        } else {
            self.spawn_run(&run_tx);
        }

        let mut event_stream = EventStream::new();
        let mut ticker = interval(self.config.refresh_interval);

        let result = loop {
            // Render current state
            if let Err(e) = self.terminal.draw(|frame| self.app.render(frame)) {
                break Err(e.into());
            }

            select! {
                // Handle terminal events (keyboard, mouse, resize)
                event_result = event_stream.next() => {
                    if let Some(Ok(current_event)) = event_result {
                        debug!("Received event: {:?}", current_event);

                        match current_event {
                            Event::Mouse(first_mouse_event) if self.config.enable_mouse => {
                                let mut mouse_events = vec![first_mouse_event];
                                let mut other_event_to_handle = None;

                                // Batch consecutive mouse events
                                while let Some(Some(Ok(event))) = event_stream.next().now_or_never() {
                                    match event {
                                        Event::Mouse(mouse_event) => mouse_events.push(mouse_event),
                                        other => {
                                            other_event_to_handle = Some(other);
                                            break;
                                        }
                                    }
                                }

                                if let Err(e) = self.app.handle_mouse_batch(mouse_events) {
                                    error!("Mouse batch error: {}", e);
                                }

                                if let Some(other_event) = other_event_to_handle {
                                    match other_event {
                                        Event::Key(key_event) => {
                                            if self.handle_key_event(key_event, &run_tx)? {
                                                break Ok(());
                                            }
                                        }
                                        Event::Mouse(_) => bail!("Unexpected mouse event in deferred handling"),
                                        _ => {}
                                    }
                                }
                            }
                            Event::Key(key_event) => {
                                if self.handle_key_event(key_event, &run_tx)? {
                                    break Ok(());
                                }
                            }
                            Event::Resize(width, height) => debug!("Terminal resized: {}x{}", width, height),
                            _ => {}
                        }
                    }
                }

                // A run finished
                Some(response) = run_rx.recv() => {
                    self.app.install(response);
                }

                // Periodic refresh tick
                _ = ticker.tick() => {}
            }

            if self.app.should_exit() {
                info!("App requested exit");
                break Ok(());
            }
        };

        info!("TUI event loop ended");
        result
    }

    /// Submit the source file on a background task
    fn spawn_run(&mut self, run_tx: &UnboundedSender<RunResponse>) {
        let Some(path) = self.config.source.clone() else {
            debug!("No source file configured, nothing to run");
            return;
        };

        let code = match fs::read_to_string(&path) {
            Ok(code) => code,
            Err(e) => {
                warn!("Unable to read {:?}: {}", path, e);
                self.app.install(RunResponse::failure(format!("Unable to read {}: {e}", path.display())));
                return;
            }
        };

        self.app.start_run(path.display().to_string());
        let client = self.client.clone();
        let run_tx = run_tx.clone();
        tokio::spawn(async move {
            let response = client.run_or_report(&code).await;
            if run_tx.send(response).is_err() {
                debug!("TUI closed before the run finished");
            }
        });
    }

    // Handle a single key event, returning true if the app should exit
    fn handle_key_event(
        &mut self,
        key_event: KeyEvent,
        run_tx: &UnboundedSender<RunResponse>,
    ) -> Result<bool> {
        match self.app.handle_key_event(key_event)? {
            EventResponse::Exit => {
                info!("Exit requested");
                return Ok(true);
            }
            EventResponse::Handled => {}
            EventResponse::NotHandled => {
                debug!("Unhandled key event: {:?}", key_event);
            }
            EventResponse::ChangeFocus(panel_type) => {
                self.app.change_focus(panel_type);
            }
            EventResponse::Rerun => {
                if self.app.run_status().running {
                    debug!("Run already in flight, ignoring re-run");
                } else {
                    self.spawn_run(run_tx);
                }
            }
        }

        Ok(false)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        if self.config.enable_mouse {
            let _ =
                execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        } else {
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Public API for the TUI module
pub mod api {
    use super::*;

    /// Start the TUI with the given configuration
    pub async fn start_tui(config: TuiConfig) -> Result<()> {
        let tui = Tui::new(config).await?;
        tui.run().await
    }

    /// Load a run without a terminal and render breakpoint `breakpoint` as JSON.
    ///
    /// A saved response takes precedence over running the source file.
    pub async fn dump(config: &TuiConfig, breakpoint: usize) -> Result<String> {
        let response = match (&config.response, &config.source) {
            (Some(path), _) => read_response(path)?,
            (None, Some(path)) => {
                let code = fs::read_to_string(path)
                    .map_err(|e| eyre::eyre!("Unable to read {}: {e}", path.display()))?;
                ExecutionClient::new(&config.service_url, config.timeout)?.run_or_report(&code).await
            }
            (None, None) => bail!("Nothing to dump: pass --response or --file"),
        };
        dump_response(&response, breakpoint)
    }
}
