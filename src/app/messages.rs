use crate::assist::AssistCommand;
use crate::command_log::{ExportFormat, LogEntry};
use crate::config::AppConfig;
use crate::error::PrompterError;
use crate::resolver::Resolution;
use crate::slides::{PlayerMode, Slide, SlideDisplay};
use iced::keyboard::{Key, Modifiers};
use iced::widget::text_editor;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Instant;

/// Messages emitted by the UI and by background work.
#[derive(Debug, Clone)]
pub enum Message {
    TogglePlayPause,
    Rewind,
    ScrollSpeedChanged(f32),
    FontSizeChanged(u32),
    MarginHorizontalChanged(u16),
    MarginVerticalChanged(u16),
    StartDelayChanged(u32),
    ToggleTheme,
    ToggleSettings,
    ToggleCues,
    ToggleVoiceControl,
    ToggleEditor,
    ScriptEdited(text_editor::Action),
    PlayerModeChanged(PlayerMode),
    SlideDisplayChanged(SlideDisplay),
    NextSlide,
    PreviousSlide,
    GoToSlide(usize),
    SlideImageLoaded {
        deck_version: u64,
        index: usize,
        bytes: Option<Vec<u8>>,
    },
    ImportInputChanged(String),
    ImportDocument,
    ImportPresentation,
    DocumentImported(Result<String, PrompterError>),
    PresentationImported(Result<Vec<Slide>, PrompterError>),
    OpenPathInputChanged(String),
    OpenPathRequested,
    ScriptLoaded {
        path: PathBuf,
        text: Result<String, String>,
        config: Box<AppConfig>,
    },
    Assist(AssistCommand),
    AssistFinished {
        command: AssistCommand,
        range: Range<usize>,
        original: String,
        result: Result<String, PrompterError>,
    },
    ToggleLogging,
    ClearLog,
    ExportLog(ExportFormat),
    LogPathInputChanged(String),
    LoadLogRequested,
    LogLoaded(Result<Vec<LogEntry>, String>),
    PresetNameChanged(String),
    PresetFilterChanged(String),
    SavePreset,
    LoadPreset(String),
    DeletePreset(String),
    ResetSettings,
    Frame(Instant),
    SecondTick(Instant),
    PollCapture,
    CaptureFailed(PrompterError),
    ResolutionReady {
        request_id: u64,
        generation: u64,
        result: Result<Resolution, PrompterError>,
    },
    Scrolled {
        offset_y: f32,
        viewport_height: f32,
        content_height: f32,
    },
    WindowResized {
        width: f32,
        height: f32,
    },
    WindowMoved {
        x: f32,
        y: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    DismissNotice,
    SafeQuit,
    PollSystemSignals,
}
