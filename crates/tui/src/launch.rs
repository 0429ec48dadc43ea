//! Debug-server launch and readiness glue
//!
//! When asked to launch the debuggee itself, the client spawns a headless
//! debug server, waits for its RPC endpoint to come up, and parks the
//! debuggee at the entry function's breakpoint before the interactive loop
//! starts. When attaching to an already-running server all of this is
//! assumed to have happened elsewhere.

use crate::rpc::{DebugChannel, RpcClient};
use eyre::{eyre, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Spawn a headless debug server executing the debuggee, with the
/// debuggee's stdio inherited from this process.
pub fn spawn_server(server_cmd: &str, debuggee: &Path, listen: &str) -> Result<Child> {
    info!(server = server_cmd, debuggee = %debuggee.display(), listen, "Spawning debug server");

    let child = Command::new(server_cmd)
        .arg("--headless")
        .arg("exec")
        .arg(debuggee)
        .arg("-l")
        .arg(listen)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| eyre!("failed to spawn {server_cmd}: {e}"))?;

    Ok(child)
}

/// Poll the server's RPC endpoint until it answers.
pub async fn wait_for_server(url: &str) -> Result<()> {
    let max_attempts = 15; // 15 seconds total

    for attempt in 1..=max_attempts {
        match RpcClient::test_connection(url).await {
            Ok(()) => {
                info!("Debug server is ready at {}", url);
                return Ok(());
            }
            Err(e) => {
                debug!("Server not ready (attempt {}/{}): {}", attempt, max_attempts, e);

                if attempt == max_attempts {
                    return Err(eyre!("debug server failed to start within {max_attempts} seconds"));
                }

                sleep(Duration::from_secs(1)).await;
            }
        }
    }

    unreachable!()
}

/// Install the entry breakpoint and run the debuggee up to it.
pub async fn park_at_entry(client: &RpcClient, entry: &str) -> Result<()> {
    client.create_breakpoint(entry).await?;
    let state = client.continue_execution().await?;
    if state.exited {
        return Err(eyre!("debuggee exited before reaching {entry}"));
    }
    info!(pc = state.current_thread.pc, "Debuggee parked at {}", entry);
    Ok(())
}
