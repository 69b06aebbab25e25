//! Definitions folder watcher
//!
//! The notify backend thread pushes every filesystem event into a bounded
//! channel; a single consumer runs the change handler once per event. There is
//! no debouncing and no filtering by event kind.

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Result;

const CHANNEL_CAPACITY: usize = 64;

/// Recursive watch over the definitions folder
pub struct DefinitionWatcher {
    // Dropping the watcher stops the backend and closes the channel.
    _watcher: RecommendedWatcher,
    events: mpsc::Receiver<notify::Result<Event>>,
}

impl DefinitionWatcher {
    /// Start watching `folder` and everything below it
    pub fn start(folder: impl AsRef<Path>) -> Result<Self> {
        let folder = folder.as_ref();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // Called on the backend thread, outside the runtime.
                let _ = tx.blocking_send(res);
            },
            Config::default(),
        )?;
        watcher.watch(folder, RecursiveMode::Recursive)?;

        tracing::info!("Watching {} for changes", folder.display());
        Ok(Self {
            _watcher: watcher,
            events: rx,
        })
    }

    /// Next raw event, or `None` once the backend has shut down
    pub async fn next_event(&mut self) -> Option<notify::Result<Event>> {
        self.events.recv().await
    }

    /// Run `on_change` for every event until the event source closes.
    ///
    /// Handler and backend errors are logged and the watch continues.
    /// Returns the number of events handled successfully.
    pub async fn run<F>(mut self, mut on_change: F) -> usize
    where
        F: FnMut(&Event) -> Result<()>,
    {
        let mut handled = 0;
        while let Some(event) = self.next_event().await {
            match event {
                Ok(event) => {
                    tracing::debug!("{:?} {:?}", event.kind, event.paths);
                    match on_change(&event) {
                        Ok(()) => handled += 1,
                        Err(e) => tracing::error!("Regeneration failed: {}", e),
                    }
                }
                Err(e) => tracing::error!("Watch error: {}", e),
            }
        }
        handled
    }
}
