use super::defaults;
use super::models::{AppConfig, LogLevel, ThemeMode};
use crate::slides::{PlayerMode, SlideDisplay};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    voice: VoiceConfig,
    #[serde(default)]
    resolver: ResolverConfig,
    #[serde(default)]
    import: ImportConfig,
    #[serde(default)]
    mirror: MirrorConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    keys: KeysConfig,
    #[serde(default)]
    window: WindowConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            theme: tables.appearance.theme,
            font_size: tables.appearance.font_size,
            margin_horizontal: tables.appearance.margin_horizontal,
            margin_vertical: tables.appearance.margin_vertical,
            scroll_speed: tables.playback.scroll_speed,
            start_delay_secs: tables.playback.start_delay_secs,
            cues_enabled: tables.playback.cues_enabled,
            player_mode: tables.playback.player_mode,
            slide_display: tables.playback.slide_display,
            voice_control: tables.voice.voice_control,
            input_device: tables.voice.input_device,
            clip_interval_secs: tables.voice.clip_interval_secs,
            gemini_model: tables.resolver.gemini_model,
            gemini_endpoint: tables.resolver.gemini_endpoint,
            gemini_api_key: tables.resolver.gemini_api_key,
            resolver_timeout_secs: tables.resolver.resolver_timeout_secs,
            google_access_token: tables.import.google_access_token,
            docs_endpoint: tables.import.docs_endpoint,
            slides_endpoint: tables.import.slides_endpoint,
            mirror_jsonl_path: tables.mirror.jsonl_path,
            export_dir: tables.logging.export_dir,
            log_level: tables.logging.log_level,
            window_width: tables.window.width,
            window_height: tables.window.height,
            window_pos_x: tables.window.pos_x,
            window_pos_y: tables.window.pos_y,
            key_toggle_play_pause: tables.keys.toggle_play_pause,
            key_rewind: tables.keys.rewind,
            key_toggle_voice: tables.keys.toggle_voice,
            key_toggle_cues: tables.keys.toggle_cues,
            key_next_slide: tables.keys.next_slide,
            key_prev_slide: tables.keys.prev_slide,
            key_toggle_logging: tables.keys.toggle_logging,
            key_safe_quit: tables.keys.safe_quit,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            appearance: AppearanceConfig {
                theme: config.theme,
                font_size: config.font_size,
                margin_horizontal: config.margin_horizontal,
                margin_vertical: config.margin_vertical,
            },
            playback: PlaybackConfig {
                scroll_speed: config.scroll_speed,
                start_delay_secs: config.start_delay_secs,
                cues_enabled: config.cues_enabled,
                player_mode: config.player_mode,
                slide_display: config.slide_display,
            },
            voice: VoiceConfig {
                voice_control: config.voice_control,
                input_device: config.input_device.clone(),
                clip_interval_secs: config.clip_interval_secs,
            },
            resolver: ResolverConfig {
                gemini_model: config.gemini_model.clone(),
                gemini_endpoint: config.gemini_endpoint.clone(),
                gemini_api_key: config.gemini_api_key.clone(),
                resolver_timeout_secs: config.resolver_timeout_secs,
            },
            import: ImportConfig {
                google_access_token: config.google_access_token.clone(),
                docs_endpoint: config.docs_endpoint.clone(),
                slides_endpoint: config.slides_endpoint.clone(),
            },
            mirror: MirrorConfig {
                jsonl_path: config.mirror_jsonl_path.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
                export_dir: config.export_dir.clone(),
            },
            keys: KeysConfig {
                toggle_play_pause: config.key_toggle_play_pause.clone(),
                rewind: config.key_rewind.clone(),
                toggle_voice: config.key_toggle_voice.clone(),
                toggle_cues: config.key_toggle_cues.clone(),
                next_slide: config.key_next_slide.clone(),
                prev_slide: config.key_prev_slide.clone(),
                toggle_logging: config.key_toggle_logging.clone(),
                safe_quit: config.key_safe_quit.clone(),
            },
            window: WindowConfig {
                width: config.window_width,
                height: config.window_height,
                pos_x: config.window_pos_x,
                pos_y: config.window_pos_y,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AppearanceConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default = "defaults::default_font_size")]
    font_size: u32,
    #[serde(default = "defaults::default_margin_horizontal")]
    margin_horizontal: u16,
    #[serde(default = "defaults::default_margin_vertical")]
    margin_vertical: u16,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            theme: ThemeMode::default(),
            font_size: defaults::default_font_size(),
            margin_horizontal: defaults::default_margin_horizontal(),
            margin_vertical: defaults::default_margin_vertical(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackConfig {
    #[serde(default = "defaults::default_scroll_speed")]
    scroll_speed: f32,
    #[serde(default = "defaults::default_start_delay_secs")]
    start_delay_secs: u32,
    #[serde(default = "defaults::default_cues_enabled")]
    cues_enabled: bool,
    #[serde(default)]
    player_mode: PlayerMode,
    #[serde(default)]
    slide_display: SlideDisplay,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            scroll_speed: defaults::default_scroll_speed(),
            start_delay_secs: defaults::default_start_delay_secs(),
            cues_enabled: defaults::default_cues_enabled(),
            player_mode: PlayerMode::default(),
            slide_display: SlideDisplay::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct VoiceConfig {
    #[serde(default)]
    voice_control: bool,
    #[serde(default = "defaults::default_input_device")]
    input_device: String,
    #[serde(default = "defaults::default_clip_interval_secs")]
    clip_interval_secs: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            voice_control: false,
            input_device: defaults::default_input_device(),
            clip_interval_secs: defaults::default_clip_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ResolverConfig {
    #[serde(default = "defaults::default_gemini_model")]
    gemini_model: String,
    #[serde(default = "defaults::default_gemini_endpoint")]
    gemini_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gemini_api_key: Option<String>,
    #[serde(default = "defaults::default_resolver_timeout_secs")]
    resolver_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            gemini_model: defaults::default_gemini_model(),
            gemini_endpoint: defaults::default_gemini_endpoint(),
            gemini_api_key: None,
            resolver_timeout_secs: defaults::default_resolver_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ImportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_access_token: Option<String>,
    #[serde(default = "defaults::default_docs_endpoint")]
    docs_endpoint: String,
    #[serde(default = "defaults::default_slides_endpoint")]
    slides_endpoint: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            google_access_token: None,
            docs_endpoint: defaults::default_docs_endpoint(),
            slides_endpoint: defaults::default_slides_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
struct MirrorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jsonl_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
    #[serde(default = "defaults::default_export_dir")]
    export_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
            export_dir: defaults::default_export_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct KeysConfig {
    #[serde(default = "defaults::default_key_toggle_play_pause")]
    toggle_play_pause: String,
    #[serde(default = "defaults::default_key_rewind")]
    rewind: String,
    #[serde(default = "defaults::default_key_toggle_voice")]
    toggle_voice: String,
    #[serde(default = "defaults::default_key_toggle_cues")]
    toggle_cues: String,
    #[serde(default = "defaults::default_key_next_slide")]
    next_slide: String,
    #[serde(default = "defaults::default_key_prev_slide")]
    prev_slide: String,
    #[serde(default = "defaults::default_key_toggle_logging")]
    toggle_logging: String,
    #[serde(default = "defaults::default_key_safe_quit")]
    safe_quit: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            toggle_play_pause: defaults::default_key_toggle_play_pause(),
            rewind: defaults::default_key_rewind(),
            toggle_voice: defaults::default_key_toggle_voice(),
            toggle_cues: defaults::default_key_toggle_cues(),
            next_slide: defaults::default_key_next_slide(),
            prev_slide: defaults::default_key_prev_slide(),
            toggle_logging: defaults::default_key_toggle_logging(),
            safe_quit: defaults::default_key_safe_quit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct WindowConfig {
    #[serde(default = "defaults::default_window_width")]
    width: f32,
    #[serde(default = "defaults::default_window_height")]
    height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pos_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pos_y: Option<f32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: defaults::default_window_width(),
            height: defaults::default_window_height(),
            pos_x: None,
            pos_y: None,
        }
    }
}
