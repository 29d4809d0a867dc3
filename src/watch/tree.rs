use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use rustc_hash::FxHashSet;

use super::{DirWatcher, WatchError};
use crate::toolchain::{LinkOutcome, Toolchain};
use crate::{debug, log};

/// Watch set plus the walk-compile-link sequence that grows it.
///
/// Startup and runtime directory creation share [`WatchTree::register_subtree`],
/// so both paths register directories the same way.
pub struct WatchTree<W> {
    watcher: W,
    watched: FxHashSet<PathBuf>,
    excludes: Vec<PathBuf>,
}

impl<W: DirWatcher> WatchTree<W> {
    pub fn new(watcher: W) -> Self {
        Self {
            watcher,
            watched: FxHashSet::default(),
            excludes: Vec::new(),
        }
    }

    /// Skip `path` and everything below it during walks.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excludes.push(path.into());
        self
    }

    /// Number of watched directories.
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.watched.contains(dir)
    }

    #[cfg(test)]
    pub(crate) fn watcher(&self) -> &W {
        &self.watcher
    }

    /// Walk the whole source tree, compile every file, then link once.
    pub fn initialize_from_root(
        &mut self,
        root: &Path,
        toolchain: &impl Toolchain,
    ) -> Result<LinkOutcome, WatchError> {
        if !root.is_dir() {
            return Err(WatchError::MissingRoot(root.to_path_buf()));
        }

        let outcome = self.register_subtree(root, toolchain)?;
        log!("watch"; "watching {} directories under {}", self.watched_count(), root.display());
        Ok(outcome)
    }

    /// Watch every directory under `path`, compile every file, then link once.
    ///
    /// Each directory is subscribed before its entries are listed, so a file
    /// created in between is either listed here or reported by the notifier.
    /// The link happens even when nothing in the subtree was compiled.
    pub fn register_subtree(
        &mut self,
        path: &Path,
        toolchain: &impl Toolchain,
    ) -> Result<LinkOutcome, WatchError> {
        let mut pending = vec![path.to_path_buf()];

        while let Some(dir) = pending.pop() {
            if self.is_excluded(&dir) || !self.add(dir.clone())? {
                continue;
            }

            let (subdirs, files) = self.list(&dir)?;
            for file in &files {
                // Individual failures are logged by the toolchain and never stop the walk.
                toolchain.compile(file)?;
            }
            // Reversed so siblings pop in sorted order.
            pending.extend(subdirs.into_iter().rev());
        }

        Ok(toolchain.link()?)
    }

    /// Immediate subdirectories and regular files of `dir`, sorted.
    fn list(&self, dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), WatchError> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort(true)
            .skip_hidden(false)
            .parallelism(Parallelism::Serial);

        for entry in walker {
            let entry = entry.map_err(|err| WatchError::Walk(dir.to_path_buf(), err))?;
            let entry_path = entry.path();
            if self.is_excluded(&entry_path) {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                dirs.push(entry_path);
            } else if file_type.is_file() {
                files.push(entry_path);
            }
        }

        Ok((dirs, files))
    }

    /// Whether `path` lies under an excluded directory.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excludes.iter().any(|ex| path.starts_with(ex))
    }

    /// Subscribe a directory and record it. Returns `false` if it vanished first.
    ///
    /// A directory recreated at a known path is subscribed again, since the old
    /// subscription went away with the old directory, but it is counted once.
    fn add(&mut self, dir: PathBuf) -> Result<bool, WatchError> {
        match self.watcher.watch_dir(&dir) {
            Ok(()) => {}
            Err(err) if matches!(err.kind, notify::ErrorKind::PathNotFound) => {
                debug!("watch"; "vanished before watch: {}", dir.display());
                return Ok(false);
            }
            Err(err) => return Err(WatchError::Subscribe(dir, err)),
        }

        if self.watched.insert(dir.clone()) {
            debug!("watch"; "watching {}", dir.display());
        } else {
            debug!("watch"; "re-watching {}", dir.display());
        }
        Ok(true)
    }
}
