//! `watch` command: startup build, then rebuild on change until killed.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actor::Coordinator;
use crate::config::BuildConfig;
use crate::log;

pub fn watch(config: Arc<BuildConfig>) -> Result<()> {
    setup_shutdown_handler()?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(Coordinator::with_config(config).run())
}

/// Ctrl+C ends the process right away; there is no state worth flushing.
fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        log!("watch"; "stopped");
        std::process::exit(0);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}
