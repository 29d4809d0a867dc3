//! Event Dispatcher
//!
//! Single consumer of the event queue. Each event is handled to completion,
//! including any compiler or linker run, before the next one is pulled, so the
//! toolchain and cache never see concurrent calls.
//!
//! | Event         | Action                                            |
//! |---------------|---------------------------------------------------|
//! | dir created   | register subtree (walk, compile, one link)        |
//! | file created  | compile; link if the compile succeeded            |
//! | file written  | compile; link if the compile succeeded            |
//! | file removed  | log only, or purge objects and link when enabled  |
//! | source error  | log only                                          |

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::BuildEvent;
use crate::cache::ObjectCache;
use crate::config::BuildConfig;
use crate::toolchain::{LinkOutcome, Toolchain};
use crate::watch::{DirWatcher, WatchError, WatchTree};
use crate::{debug, log};

pub struct Dispatcher<T, W, C> {
    config: Arc<BuildConfig>,
    toolchain: T,
    cache: C,
    tree: WatchTree<W>,
}

impl<T, W, C> Dispatcher<T, W, C>
where
    T: Toolchain,
    W: DirWatcher,
    C: ObjectCache,
{
    pub fn new(config: Arc<BuildConfig>, toolchain: T, cache: C, tree: WatchTree<W>) -> Self {
        Self {
            config,
            toolchain,
            cache,
            tree,
        }
    }

    /// Startup walk over the source root: watch, compile everything, link once.
    pub fn initialize(&mut self) -> Result<LinkOutcome, WatchError> {
        let root = self.config.get_root().to_path_buf();
        self.tree.initialize_from_root(&root, &self.toolchain)
    }

    /// Drain the queue until every sender is gone.
    ///
    /// Must run outside the async executor (e.g. in `spawn_blocking`), since
    /// compiles block the thread.
    pub fn run_blocking(mut self, mut rx: mpsc::Receiver<BuildEvent>) -> Result<(), WatchError> {
        while let Some(event) = rx.blocking_recv() {
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Handle one event. Only cache and subtree-walk failures are returned.
    pub fn dispatch(&mut self, event: BuildEvent) -> Result<(), WatchError> {
        let event = event.resolve(self.config.get_root());
        if let Some(path) = event.path()
            && self.tree.is_excluded(path)
        {
            return Ok(());
        }
        debug!("watch"; "{}: {:?}", event.label(), event.path());

        match event {
            BuildEvent::DirCreated(path) => self.on_dir_created(&path),
            BuildEvent::FileCreated(path) | BuildEvent::FileWritten(path) => {
                self.on_file_changed(&path)
            }
            BuildEvent::FileRemoved(path) => self.on_removed(&path),
            BuildEvent::SourceError(err) => {
                log!("error"; "watcher: {}", err);
                Ok(())
            }
        }
    }

    fn on_dir_created(&mut self, path: &Path) -> Result<(), WatchError> {
        if !path.is_dir() {
            debug!("watch"; "directory vanished: {}", path.display());
            return Ok(());
        }
        log!("watch"; "new directory {}", self.cache.source_key(path).display());
        self.tree.register_subtree(path, &self.toolchain)?;
        log!("watch"; "watching {} directories", self.tree.watched_count());
        Ok(())
    }

    fn on_file_changed(&mut self, path: &Path) -> Result<(), WatchError> {
        if self.toolchain.compile(path)?.is_success() {
            self.toolchain.link()?;
        }
        Ok(())
    }

    fn on_removed(&mut self, path: &Path) -> Result<(), WatchError> {
        let key = self.cache.source_key(path);
        log!("watch"; "removed {}", key.display());
        if !self.config.purge_on_remove {
            return Ok(());
        }

        let purged = if self.tree.contains(path) {
            self.cache.delete_objects(&key)?
        } else if self.config.is_target(path) {
            usize::from(self.cache.delete_object(path)?)
        } else {
            0
        };

        if purged > 0 {
            log!("watch"; "purged {} objects", purged);
            self.toolchain.link()?;
        }
        Ok(())
    }
}
