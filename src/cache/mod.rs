//! Object cache: one compiled artifact per source file.
//!
//! Objects live in a flat directory and are named deterministically from the
//! source path:
//!
//! ```text
//! src/a.c         -> src_a.c.o
//! src/lib/util.c  -> srclib_util.c.o
//! ```
//!
//! The directory part of the key has its separators stripped, so distinct
//! directories can collide (`a/b` and `ab` both become `ab`). The scheme is
//! kept for compatibility with existing caches.

mod dir;

pub use dir::DirCache;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cache failures. Linking is meaningless without the cache, so all of
/// these are fatal to the caller.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to create cache directory `{0}`")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("failed to list cache directory `{0}`")]
    List(PathBuf, #[source] std::io::Error),

    #[error("failed to remove cached object `{0}`")]
    Remove(PathBuf, #[source] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Capability interface over an object store.
///
/// The toolchain and dispatcher only talk to this trait, so a different
/// backend can be dropped in without touching them.
pub trait ObjectCache {
    /// Directory holding the objects.
    fn dir(&self) -> &Path;

    /// Naming key of a source path (root name + root-relative path).
    fn source_key(&self, source: &Path) -> PathBuf;

    /// Where the object for `source` is written.
    fn object_path(&self, source: &Path) -> PathBuf {
        self.dir().join(object_name(&self.source_key(source)))
    }

    /// Create the cache directory if it does not exist yet.
    fn ensure_dir(&self) -> CacheResult<()>;

    /// Current objects, sorted by path.
    ///
    /// A cache directory that does not exist yet lists as empty, so a link
    /// before the first compile reports nothing to link instead of failing.
    /// Any other open or read error is fatal.
    fn list_objects(&self) -> CacheResult<Vec<PathBuf>>;

    /// Remove every object whose name starts with `sanitize(prefix) + "_"`.
    ///
    /// Returns the number of removed objects.
    fn delete_objects(&self, prefix: &Path) -> CacheResult<usize>;

    /// Remove the object belonging to a single source file.
    ///
    /// Returns `false` if there was nothing to remove.
    fn delete_object(&self, source: &Path) -> CacheResult<bool>;

    /// Remove every object in the cache.
    fn clear(&self) -> CacheResult<usize>;
}

// ============================================================================
// Naming
// ============================================================================

/// Strip path separators from a directory path.
pub fn sanitize(dir: &Path) -> String {
    dir.to_string_lossy()
        .chars()
        .filter(|c| !std::path::is_separator(*c))
        .collect()
}

/// Object file name for a source key: `<sanitized dir>_<basename>.o`.
pub fn object_name(key: &Path) -> String {
    let dir = key.parent().unwrap_or_else(|| Path::new(""));
    let base = key
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    format!("{}_{}.o", sanitize(dir), base)
}

/// Name prefix shared by every object compiled from `dir`.
pub fn object_prefix(dir: &Path) -> String {
    format!("{}_", sanitize(dir))
}
