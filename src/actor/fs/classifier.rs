use std::path::Path;

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

use crate::actor::messages::BuildEvent;
use crate::debug;

/// Turns raw notifier events into [`BuildEvent`]s.
///
/// Create/written events are checked against the filesystem, since the path
/// may be gone by the time the event is read.
pub(super) struct EventClassifier;

impl EventClassifier {
    pub(super) fn classify(event: &notify::Event) -> Vec<BuildEvent> {
        let paths = &event.paths;
        match &event.kind {
            EventKind::Create(_) => paths.iter().filter_map(|p| Self::created(p)).collect(),

            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::To => paths.iter().filter_map(|p| Self::created(p)).collect(),
                RenameMode::From => paths.iter().map(|p| Self::removed(p)).collect(),
                RenameMode::Both => {
                    let mut events = Vec::with_capacity(2);
                    if let Some(from) = paths.first() {
                        events.push(Self::removed(from));
                    }
                    if let Some(to) = paths.get(1)
                        && let Some(created) = Self::created(to)
                    {
                        events.push(created);
                    }
                    events
                }
                // Backends that cannot tell the direction report `Any`.
                _ => paths
                    .iter()
                    .map(|p| Self::created(p).unwrap_or_else(|| Self::removed(p)))
                    .collect(),
            },

            EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
            EventKind::Modify(_) => paths.iter().filter_map(|p| Self::written(p)).collect(),

            EventKind::Remove(_) => paths.iter().map(|p| Self::removed(p)).collect(),

            EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
        }
    }

    fn created(path: &Path) -> Option<BuildEvent> {
        if path.is_dir() {
            Some(BuildEvent::DirCreated(path.to_path_buf()))
        } else if path.exists() {
            Some(BuildEvent::FileCreated(path.to_path_buf()))
        } else {
            debug!("watch"; "discard created (gone): {}", path.display());
            None
        }
    }

    fn written(path: &Path) -> Option<BuildEvent> {
        if path.is_file() {
            Some(BuildEvent::FileWritten(path.to_path_buf()))
        } else {
            None
        }
    }

    fn removed(path: &Path) -> BuildEvent {
        BuildEvent::FileRemoved(path.to_path_buf())
    }
}
