use crate::assist::AssistCommand;
use crate::cancellation::CancellationToken;
use crate::command_log::ExportFormat;
use crate::mirror::MirrorEvent;
use crate::resolver::{ResolveRequest, SpeechResolver};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

mod core;
mod import;
mod logging;
mod playback;
mod presets;
mod settings;
mod slides;
mod script;
mod voice;

#[cfg(test)]
pub(super) mod test_support;

/// Describes work that must be performed outside the pure reducer.
pub(super) enum Effect {
    SaveConfig,
    SavePresets,
    /// Absolute vertical offset of the script view.
    ScrollTo(f32),
    Publish(MirrorEvent),
    StartCapture,
    StopCapture,
    Resolve {
        resolver: Arc<dyn SpeechResolver>,
        request: ResolveRequest,
        cancel: CancellationToken,
    },
    FetchSlideImage {
        deck_version: u64,
        index: usize,
        url: String,
    },
    ImportDocument(String),
    ImportPresentation(String),
    LoadScript(PathBuf),
    RunAssist {
        command: AssistCommand,
        range: Range<usize>,
        original: String,
    },
    ExportLog(ExportFormat),
    LoadLog(PathBuf),
    QuitSafely,
}
