//! FileSystem event source
//!
//! Bridges the `notify` callback into the dispatcher's bounded queue.
//! Implements the "Watcher-First" pattern: the watcher exists before the
//! startup walk, so changes made during the walk are buffered, not lost.
//!
//! ```text
//! notify callback → std mpsc → bridge thread (classify) → tokio mpsc → Dispatcher
//! ```

use std::thread::JoinHandle;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::BuildEvent;

// Raw notify events -> BuildEvents.
mod classifier;


use classifier::EventClassifier;

/// Receiving end of the notifier, waiting to be bridged.
pub struct FsSource {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
}

impl FsSource {
    /// Create the watcher immediately. Nothing is subscribed yet; the watch
    /// tree subscribes directories through the returned handle.
    pub fn new() -> notify::Result<(RecommendedWatcher, Self)> {
        // notify does not support async, so collect into a sync channel first
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        Ok((watcher, Self { notify_rx }))
    }

    /// Spawn the bridge thread feeding `tx`.
    ///
    /// The thread ends when the watcher is dropped or the receiver goes away.
    pub fn spawn(self, tx: mpsc::Sender<BuildEvent>) -> JoinHandle<()> {
        std::thread::spawn(move || {
            while let Ok(result) = self.notify_rx.recv() {
                if forward(result, &tx).is_err() {
                    break; // Receiver dropped
                }
            }
            crate::debug!("watch"; "event source closed");
        })
    }
}

/// Classify one notifier result and push the events, blocking while the queue is full.
fn forward(
    result: notify::Result<notify::Event>,
    tx: &mpsc::Sender<BuildEvent>,
) -> Result<(), mpsc::error::SendError<BuildEvent>> {
    let events = match result {
        Ok(event) => EventClassifier::classify(&event),
        Err(err) => vec![BuildEvent::SourceError(err.to_string())],
    };
    for event in events {
        tx.blocking_send(event)?;
    }
    Ok(())
}
