//! Compiler port: turns sources into cached objects and objects into a binary.
//!
//! Build failures are expected during development and never escalate: they are
//! reported through [`CompileOutcome::Failed`] / [`LinkOutcome::Failed`]. Only
//! cache failures come back as `Err`, since nothing can be linked without it.

mod cc;

pub use cc::CcToolchain;

use std::path::{Path, PathBuf};

use crate::cache::CacheError;

/// Why a compile was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No extension, or extension not in `targetExts`.
    NotTarget,
    /// Zero-byte source.
    Empty,
}

/// Result of compiling one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Object written to the contained path.
    Compiled(PathBuf),
    /// Not applicable, nothing was spawned.
    Skipped(SkipReason),
    /// Spawn failure or non-zero exit.
    Failed(String),
}

impl CompileOutcome {
    /// Only a successful compile warrants a relink.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Compiled(_))
    }
}

/// Result of linking the cache into the target binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    /// Cache holds no objects; the linker was not spawned.
    NothingToLink,
    Failed(String),
}

/// Capability interface over a compiler toolchain.
pub trait Toolchain {
    /// Compile a single source file into the object cache.
    fn compile(&self, source: &Path) -> Result<CompileOutcome, CacheError>;

    /// Link every cached object into the target binary.
    fn link(&self) -> Result<LinkOutcome, CacheError>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn compile(&self, source: &Path) -> Result<CompileOutcome, CacheError> {
        (**self).compile(source)
    }

    fn link(&self) -> Result<LinkOutcome, CacheError> {
        (**self).link()
    }
}
