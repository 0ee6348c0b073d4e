use crate::slides::{PlayerMode, SlideDisplay};
use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
///
/// This flat shape is also what gets cached per script, so every field needs
/// a serde default to keep old cache files loadable.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: u32,
    #[serde(default = "crate::config::defaults::default_margin_horizontal")]
    pub margin_horizontal: u16,
    #[serde(default = "crate::config::defaults::default_margin_vertical")]
    pub margin_vertical: u16,
    #[serde(default = "crate::config::defaults::default_scroll_speed")]
    pub scroll_speed: f32,
    #[serde(default = "crate::config::defaults::default_start_delay_secs")]
    pub start_delay_secs: u32,
    #[serde(default = "crate::config::defaults::default_cues_enabled")]
    pub cues_enabled: bool,
    #[serde(default)]
    pub player_mode: PlayerMode,
    #[serde(default)]
    pub slide_display: SlideDisplay,
    #[serde(default)]
    pub voice_control: bool,
    #[serde(default = "crate::config::defaults::default_input_device")]
    pub input_device: String,
    #[serde(default = "crate::config::defaults::default_clip_interval_secs")]
    pub clip_interval_secs: f32,
    #[serde(default = "crate::config::defaults::default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "crate::config::defaults::default_gemini_endpoint")]
    pub gemini_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default = "crate::config::defaults::default_resolver_timeout_secs")]
    pub resolver_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_access_token: Option<String>,
    #[serde(default = "crate::config::defaults::default_docs_endpoint")]
    pub docs_endpoint: String,
    #[serde(default = "crate::config::defaults::default_slides_endpoint")]
    pub slides_endpoint: String,
    #[serde(default)]
    pub mirror_jsonl_path: Option<String>,
    #[serde(default = "crate::config::defaults::default_export_dir")]
    pub export_dir: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default)]
    pub window_pos_x: Option<f32>,
    #[serde(default)]
    pub window_pos_y: Option<f32>,
    #[serde(default = "crate::config::defaults::default_key_toggle_play_pause")]
    pub key_toggle_play_pause: String,
    #[serde(default = "crate::config::defaults::default_key_rewind")]
    pub key_rewind: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_voice")]
    pub key_toggle_voice: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_cues")]
    pub key_toggle_cues: String,
    #[serde(default = "crate::config::defaults::default_key_next_slide")]
    pub key_next_slide: String,
    #[serde(default = "crate::config::defaults::default_key_prev_slide")]
    pub key_prev_slide: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_logging")]
    pub key_toggle_logging: String,
    #[serde(default = "crate::config::defaults::default_key_safe_quit")]
    pub key_safe_quit: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::Night,
            font_size: crate::config::defaults::default_font_size(),
            margin_horizontal: crate::config::defaults::default_margin_horizontal(),
            margin_vertical: crate::config::defaults::default_margin_vertical(),
            scroll_speed: crate::config::defaults::default_scroll_speed(),
            start_delay_secs: crate::config::defaults::default_start_delay_secs(),
            cues_enabled: crate::config::defaults::default_cues_enabled(),
            player_mode: PlayerMode::Text,
            slide_display: SlideDisplay::Notes,
            voice_control: false,
            input_device: crate::config::defaults::default_input_device(),
            clip_interval_secs: crate::config::defaults::default_clip_interval_secs(),
            gemini_model: crate::config::defaults::default_gemini_model(),
            gemini_endpoint: crate::config::defaults::default_gemini_endpoint(),
            gemini_api_key: None,
            resolver_timeout_secs: crate::config::defaults::default_resolver_timeout_secs(),
            google_access_token: None,
            docs_endpoint: crate::config::defaults::default_docs_endpoint(),
            slides_endpoint: crate::config::defaults::default_slides_endpoint(),
            mirror_jsonl_path: None,
            export_dir: crate::config::defaults::default_export_dir(),
            log_level: crate::config::defaults::default_log_level(),
            window_width: crate::config::defaults::default_window_width(),
            window_height: crate::config::defaults::default_window_height(),
            window_pos_x: None,
            window_pos_y: None,
            key_toggle_play_pause: crate::config::defaults::default_key_toggle_play_pause(),
            key_rewind: crate::config::defaults::default_key_rewind(),
            key_toggle_voice: crate::config::defaults::default_key_toggle_voice(),
            key_toggle_cues: crate::config::defaults::default_key_toggle_cues(),
            key_next_slide: crate::config::defaults::default_key_next_slide(),
            key_prev_slide: crate::config::defaults::default_key_prev_slide(),
            key_toggle_logging: crate::config::defaults::default_key_toggle_logging(),
            key_safe_quit: crate::config::defaults::default_key_safe_quit(),
        }
    }
}

impl AppConfig {
    /// Keep values from `base` that must never come from a per-script cache:
    /// log level, keybindings, secrets and service endpoints.
    pub fn with_base_overrides(mut self, base: &AppConfig) -> AppConfig {
        self.log_level = base.log_level;
        self.gemini_api_key = base.gemini_api_key.clone();
        self.google_access_token = base.google_access_token.clone();
        self.gemini_model = base.gemini_model.clone();
        self.gemini_endpoint = base.gemini_endpoint.clone();
        self.docs_endpoint = base.docs_endpoint.clone();
        self.slides_endpoint = base.slides_endpoint.clone();
        self.resolver_timeout_secs = base.resolver_timeout_secs;
        self.mirror_jsonl_path = base.mirror_jsonl_path.clone();
        self.key_toggle_play_pause = base.key_toggle_play_pause.clone();
        self.key_rewind = base.key_rewind.clone();
        self.key_toggle_voice = base.key_toggle_voice.clone();
        self.key_toggle_cues = base.key_toggle_cues.clone();
        self.key_next_slide = base.key_next_slide.clone();
        self.key_prev_slide = base.key_prev_slide.clone();
        self.key_toggle_logging = base.key_toggle_logging.clone();
        self.key_safe_quit = base.key_safe_quit.clone();
        self
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
