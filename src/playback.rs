use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::PlaybackError;
use crate::runtime::AppEvent;

/// Something that can hand a video file to a viewer
pub trait Player: Send + Sync + 'static {
    fn open(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Opens files with the operating system's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlayer;

impl Player for SystemPlayer {
    fn open(&self, path: &Path) -> Result<(), PlaybackError> {
        opener::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Dispatches playback off the UI thread and reports back through the event queue.
///
/// The OS call is fire-and-forget: completion means "the handler was asked and
/// the settle delay passed", not that the video finished.
pub struct PlaybackInvoker {
    player: Arc<dyn Player>,
    settle: Duration,
    events: Sender<AppEvent>,
}

impl PlaybackInvoker {
    pub fn new(player: Arc<dyn Player>, settle: Duration, events: Sender<AppEvent>) -> Self {
        Self {
            player,
            settle,
            events,
        }
    }

    pub fn dispatch(&self, path: PathBuf) {
        let player = Arc::clone(&self.player);
        let settle = self.settle;
        let events = self.events.clone();

        // Detached; nothing joins or cancels it
        thread::spawn(move || {
            let error = match player.open(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "playback dispatched");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "playback failed");
                    Some(e.to_string())
                }
            };
            thread::sleep(settle);
            // The UI may already be gone
            let _ = events.send(AppEvent::PlaybackFinished(error));
        });
    }
}

/// Resolve a clip name to the file to open
pub fn resolve(video_root: Option<&Path>, name: &str) -> PathBuf {
    match video_root {
        Some(root) => root.join(name),
        None => PathBuf::from(name),
    }
}
