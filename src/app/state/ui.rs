use crate::presets::PresetValues;
use iced::widget::text_editor;
use std::time::Instant;

pub struct Notice {
    pub(in crate::app) message: String,
    pub(in crate::app) is_error: bool,
    pub(in crate::app) shown_at: Instant,
}

pub struct LoadedPreset {
    pub(in crate::app) name: String,
    pub(in crate::app) values: PresetValues,
}

pub struct UiState {
    pub(in crate::app) notice: Option<Notice>,
    pub(in crate::app) settings_open: bool,
    pub(in crate::app) editor_open: bool,
    pub(in crate::app) editor: text_editor::Content,
    pub(in crate::app) import_input: String,
    pub(in crate::app) import_busy: bool,
    pub(in crate::app) open_path_input: String,
    pub(in crate::app) script_loading: bool,
    pub(in crate::app) log_path_input: String,
    pub(in crate::app) log_loading: bool,
    pub(in crate::app) assist_busy: bool,
    pub(in crate::app) preset_name: String,
    pub(in crate::app) preset_filter: String,
    pub(in crate::app) loaded_preset: Option<LoadedPreset>,
}

impl UiState {
    pub(in crate::app) fn new(text: &str) -> Self {
        Self {
            notice: None,
            settings_open: false,
            editor_open: false,
            editor: text_editor::Content::with_text(text),
            import_input: String::new(),
            import_busy: false,
            open_path_input: String::new(),
            script_loading: false,
            log_path_input: String::new(),
            log_loading: false,
            assist_busy: false,
            preset_name: String::new(),
            preset_filter: String::new(),
            loaded_preset: None,
        }
    }
}
