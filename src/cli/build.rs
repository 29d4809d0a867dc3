//! `build` command: one startup pass without watching.

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::actor::build_dispatcher;
use crate::config::BuildConfig;
use crate::toolchain::LinkOutcome;
use crate::watch::NoopWatcher;

/// Compile every source once and link. Fails if the link fails.
pub fn build(config: Arc<BuildConfig>) -> Result<()> {
    let mut dispatcher = build_dispatcher(config, NoopWatcher);
    match dispatcher.initialize()? {
        LinkOutcome::Linked | LinkOutcome::NothingToLink => Ok(()),
        LinkOutcome::Failed(reason) => bail!("link failed: {reason}"),
    }
}
