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

//! MDB TUI - Terminal User Interface for MDB
//!
//! This binary connects to a headless MDB debug server, or launches one
//! around a debuggee, and renders the live machine state.

use clap::Parser;
use eyre::Result;
use mdb_common::logging;
use mdb_tui::{launch, Config, RpcClient, TuiConfig};
use std::path::PathBuf;

/// MDB Terminal User Interface
#[derive(Debug, Parser)]
#[command(name = "mdb-tui")]
#[command(about = "Terminal front-end for the MDB debug server", version)]
struct Args {
    /// RPC server URL
    #[arg(long, default_value = "http://127.0.0.1:4111")]
    url: String,

    /// Launch this debuggee under a new headless debug server instead of
    /// attaching to an already-running one
    #[arg(long)]
    exec: Option<PathBuf>,

    /// Debug server command used with --exec
    #[arg(long, default_value = "mdb-server")]
    server_cmd: String,

    /// Entry function to park the debuggee at when launching
    #[arg(long, default_value = "main.main")]
    entry: String,

    /// Config file path (uses ~/.mdb.toml if not specified)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // File-only logging: stdout belongs to the terminal UI. The guard is
    // held until exit so buffered records get flushed.
    let (log_dir, _log_guard) = logging::init_file_only_logging("mdb-tui")?;

    // Use stderr so it doesn't interfere with the TUI if there are issues
    eprintln!("MDB TUI logs: {}", log_dir.display());

    // Load configuration
    let config = if let Some(config_path) = args.config {
        Config::load_from_path(&config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Optionally launch the debug server around the debuggee and park it
    // at the entry breakpoint before the interactive loop starts.
    let mut server = None;
    if let Some(debuggee) = &args.exec {
        server = Some(launch::spawn_server(&args.server_cmd, debuggee, listen_addr(&args.url))?);
        launch::wait_for_server(&args.url).await?;

        let client = RpcClient::new(&args.url, config.rpc_timeout())?;
        launch::park_at_entry(&client, &args.entry).await?;
    }

    tracing::info!("Starting MDB TUI against {}", args.url);

    let result = mdb_tui::api::start_tui(TuiConfig { rpc_url: args.url, config }).await;

    // A server we spawned dies with us; an attached one is left running.
    if let Some(mut child) = server {
        let _ = child.kill();
        let _ = child.wait();
    }

    match result {
        Ok(()) => {
            tracing::info!("TUI exited normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("TUI error: {}", e);
            Err(e)
        }
    }
}

/// The listen address the spawned server should bind: the URL without its
/// scheme.
fn listen_addr(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
        .trim_end_matches('/')
}
