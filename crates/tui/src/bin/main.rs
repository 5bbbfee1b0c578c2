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

//! Ooga TUI - terminal workbench for ooga-lang debug runs
//!
//! Runs a program on the execution service (or opens a saved response) and
//! shows each breakpoint's heap and stacks.

use clap::Parser;
use eyre::Result;
use ooga_common::logging;
use ooga_tui::{Config, TuiConfig};
use std::{path::PathBuf, time::Duration};
use tracing::warn;

/// Ooga Terminal Workbench
#[derive(Debug, Parser)]
#[command(name = "ooga-tui")]
#[command(about = "Heap and stack visualizer for ooga-lang debug runs", version)]
struct Args {
    /// Execution service URL (overrides the config file)
    #[arg(long)]
    url: Option<String>,

    /// Program to run
    #[arg(long)]
    file: Option<PathBuf>,

    /// Saved service response to open instead of running a program
    #[arg(long)]
    response: Option<PathBuf>,

    /// Config file path (uses ~/.ooga.toml if not specified)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable mouse support
    #[arg(long)]
    mouse: bool,

    /// Terminal refresh interval in milliseconds
    #[arg(long, default_value = "50")]
    refresh_interval: u64,

    /// Execution service timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the views of one breakpoint as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Breakpoint to dump
    #[arg(long, default_value = "0")]
    breakpoint: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The terminal belongs to the UI, so logs go to a file
    let log_file_path = logging::init_file_only_logging("ooga-tui")?;
    if !args.dump {
        eprintln!("Ooga TUI logs: {}", log_file_path.display());
    }

    let config = match &args.config {
        Some(config_path) => Config::load_from_path(config_path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Falling back to default configuration: {:?}", e);
            Config::default()
        }),
    };

    let tui_config = TuiConfig {
        service_url: args.url.clone().unwrap_or_else(|| config.service.url.clone()),
        timeout: args.timeout.map(Duration::from_secs).unwrap_or_else(|| config.service.timeout()),
        source: args.file.clone(),
        response: args.response.clone(),
        refresh_interval: Duration::from_millis(args.refresh_interval),
        enable_mouse: args.mouse,
        colors: config.active_colors(),
    };

    if args.dump {
        let json = ooga_tui::api::dump(&tui_config, args.breakpoint).await?;
        println!("{json}");
        return Ok(());
    }

    tracing::info!("Starting Ooga TUI");
    tracing::info!("Execution service at: {}", tui_config.service_url);

    match ooga_tui::api::start_tui(tui_config).await {
        Ok(_) => {
            tracing::info!("TUI exited normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("TUI error: {}", e);
            Err(e)
        }
    }
}
