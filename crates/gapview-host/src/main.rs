// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gapview: headless bridge host.
//
// Reads script messages from stdin, one per line, and writes every result
// callback to stdout as a line of script source.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use gapview_bridge::platform_bridge;
use gapview_bridge::storage::DirectoryStorage;
use gapview_core::BridgeConfig;
use gapview_core::config::data_dir;
use gapview_core::error::{GapviewError, Result};
use gapview_host::{BridgeSession, WriterEngine};

/// Isolated storage lives in this subdirectory of the data directory.
const STORAGE_DIR: &str = "storage";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("gapview starting");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "gapview stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let dir = data_dir();
    let config = BridgeConfig::load(&dir);
    let storage = Arc::new(DirectoryStorage::open(dir.join(STORAGE_DIR))?);
    let bridge = platform_bridge();

    let (mut session, pump) = BridgeSession::open(
        bridge,
        storage,
        config,
        Handle::current(),
        WriterEngine::new(std::io::stdout()),
    )?;
    info!(
        device_id = %session.device_id(),
        platform = session.platform(),
        data_dir = %dir.display(),
        "bridge ready, reading script messages from stdin"
    );

    // A capture still waiting on the camera keeps the delivery channel
    // open, so the pump is stopped explicitly once input ends.
    let (stop, stopped) = oneshot::channel::<()>();
    let pump = tokio::spawn(pump.run_until(async {
        let _ = stopped.await;
    }));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Err(e) = session.dispatch(&line) {
            warn!(error = %e, "message not answered");
        }
    }

    info!("stdin closed, shutting down");
    drop(session);
    let _ = stop.send(());
    pump.await
        .map_err(|e| GapviewError::Bridge(format!("script pump task failed: {e}")))?;
    Ok(())
}
