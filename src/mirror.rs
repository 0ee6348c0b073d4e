//! Local fan-out of playback state for a secondary presenter display.
//!
//! Delivery is at-most-once and order preserving: a receiver that falls
//! behind loses the oldest events and is told how many it missed.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub const MIRROR_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MirrorSettings {
    pub scroll_speed: f32,
    pub font_size: u32,
    pub margin_horizontal: u16,
    pub margin_vertical: u16,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MirrorEvent {
    SettingsUpdate(MirrorSettings),
    Play,
    Pause,
    Reset,
    SlideChange { new_index: usize },
    ScrollToWord { word_index: usize },
}

#[derive(Debug, Clone)]
pub struct MirrorBus {
    sender: broadcast::Sender<MirrorEvent>,
}

impl Default for MirrorBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(MIRROR_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MirrorEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of receivers reached; zero when nobody listens.
    pub fn publish(&self, event: MirrorEvent) -> usize {
        debug!(?event, "Publishing mirror event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Append every event as one JSON line to `path` from a background thread.
    pub fn spawn_jsonl_sink(&self, path: PathBuf) -> std::thread::JoinHandle<()> {
        let mut receiver = self.subscribe();
        info!(path = %path.display(), "Starting mirror sink");
        std::thread::spawn(move || {
            let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => file,
                Err(err) => {
                    warn!(path = %path.display(), "Mirror sink disabled: {err}");
                    return;
                }
            };
            loop {
                match receiver.blocking_recv() {
                    Ok(event) => {
                        let line = match serde_json::to_string(&event) {
                            Ok(line) => line,
                            Err(err) => {
                                warn!("Failed to encode mirror event: {err}");
                                continue;
                            }
                        };
                        if let Err(err) = writeln!(file, "{line}") {
                            warn!(path = %path.display(), "Mirror sink write failed: {err}");
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        debug!(missed, "Mirror sink lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
