//! Watch tree manager.
//!
//! Owns the set of watched directories. The set only grows during a run: it is
//! seeded by the startup walk and extended whenever a directory appears.

mod tree;

pub use tree::WatchTree;

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::cache::CacheError;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("source root `{0}` does not exist or is not a directory")]
    MissingRoot(PathBuf),

    #[error("failed to walk `{0}`")]
    Walk(PathBuf, #[source] jwalk::Error),

    #[error("failed to watch `{0}`")]
    Subscribe(PathBuf, #[source] notify::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Subscribes single directories (non-recursively) to change notifications.
pub trait DirWatcher {
    fn watch_dir(&mut self, dir: &Path) -> notify::Result<()>;
}

impl DirWatcher for RecommendedWatcher {
    fn watch_dir(&mut self, dir: &Path) -> notify::Result<()> {
        self.watch(dir, RecursiveMode::NonRecursive)
    }
}

/// Watcher that subscribes nothing, for one-shot builds.
#[derive(Debug, Default)]
pub struct NoopWatcher;

impl DirWatcher for NoopWatcher {
    fn watch_dir(&mut self, _dir: &Path) -> notify::Result<()> {
        Ok(())
    }
}
