//! Actor Message Definitions
//!
//! ```text
//! notify --(bridge thread)--> BuildEvent --> Dispatcher
//! ```

use std::path::{Path, PathBuf};

use crate::utils::path::resolve_under;

/// One classified filesystem notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A directory appeared (created or moved in).
    DirCreated(PathBuf),
    /// A file appeared (created or moved in).
    FileCreated(PathBuf),
    /// File contents changed.
    FileWritten(PathBuf),
    /// A file or directory disappeared.
    FileRemoved(PathBuf),
    /// The notification source reported an error.
    SourceError(String),
}

impl BuildEvent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DirCreated(_) => "dir created",
            Self::FileCreated(_) => "created",
            Self::FileWritten(_) => "written",
            Self::FileRemoved(_) => "removed",
            Self::SourceError(_) => "error",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DirCreated(p)
            | Self::FileCreated(p)
            | Self::FileWritten(p)
            | Self::FileRemoved(p) => Some(p),
            Self::SourceError(_) => None,
        }
    }

    /// Make the event path absolute, taking relative reports as root-relative.
    pub fn resolve(self, root: &Path) -> Self {
        match self {
            Self::DirCreated(p) => Self::DirCreated(resolve_under(&p, root)),
            Self::FileCreated(p) => Self::FileCreated(resolve_under(&p, root)),
            Self::FileWritten(p) => Self::FileWritten(resolve_under(&p, root)),
            Self::FileRemoved(p) => Self::FileRemoved(resolve_under(&p, root)),
            Self::SourceError(err) => Self::SourceError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_against_root() {
        let root = Path::new("/work/src");
        assert_eq!(
            BuildEvent::FileWritten(PathBuf::from("lib/a.c")).resolve(root),
            BuildEvent::FileWritten(PathBuf::from("/work/src/lib/a.c"))
        );
        assert_eq!(
            BuildEvent::DirCreated(PathBuf::from("/elsewhere/x")).resolve(root),
            BuildEvent::DirCreated(PathBuf::from("/elsewhere/x"))
        );
        assert_eq!(
            BuildEvent::SourceError("boom".into()).resolve(root).path(),
            None
        );
    }
}
