//! Actor Coordinator - wires up the watch pipeline
//!
//! A thin orchestrator: it creates the channel, the notifier bridge and the
//! dispatcher, then waits on the dispatcher forever.
//!
//! ```text
//! FsSource (bridge thread) --BuildEvent--> Dispatcher (blocking task)
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use super::dispatcher::Dispatcher;
use super::fs::FsSource;
use super::messages::BuildEvent;
use crate::cache::DirCache;
use crate::config::BuildConfig;
use crate::toolchain::CcToolchain;
use crate::watch::{DirWatcher, WatchTree};

/// Channel buffer size
const CHANNEL_BUFFER: usize = 64;

/// Dispatcher over the configured compiler and object cache.
pub type BuildDispatcher<W> = Dispatcher<CcToolchain<DirCache>, W, DirCache>;

/// Assemble the cache, toolchain and watch tree for `config`.
///
/// The cache directory is excluded from walks so object writes never feed
/// back into the watcher.
pub fn build_dispatcher<W: DirWatcher>(config: Arc<BuildConfig>, watcher: W) -> BuildDispatcher<W> {
    let cache = DirCache::new(&config.cache_dir, config.get_root());
    let toolchain = CcToolchain::new(Arc::clone(&config), cache.clone());
    let tree = WatchTree::new(watcher).exclude(&config.cache_dir);
    Dispatcher::new(config, toolchain, cache, tree)
}

/// Coordinator - wires up and runs the watch pipeline
pub struct Coordinator {
    config: Arc<BuildConfig>,
}

impl Coordinator {
    /// Create from Arc<BuildConfig>
    pub fn with_config(config: Arc<BuildConfig>) -> Self {
        Self { config }
    }

    /// Run the startup build, then dispatch events until the process is killed.
    ///
    /// Only returns on a fatal error.
    pub async fn run(self) -> Result<()> {
        // Watcher-first: subscribe before walking so nothing slips through
        let (watcher, source) = FsSource::new().context("failed to start file watcher")?;
        let (event_tx, event_rx) = mpsc::channel::<BuildEvent>(CHANNEL_BUFFER);

        let config = self.config;
        let dispatcher = tokio::task::spawn_blocking(move || -> Result<()> {
            let mut dispatcher = build_dispatcher(config, watcher);
            dispatcher.initialize()?;
            crate::log!("watch"; "waiting for changes");
            dispatcher.run_blocking(event_rx)?;
            Ok(())
        });

        let _bridge = source.spawn(event_tx);
        crate::debug!("actor"; "start");

        dispatcher.await.context("dispatcher task panicked")??;
        anyhow::bail!("file watcher stopped unexpectedly")
    }
}
