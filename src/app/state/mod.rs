mod constants;
mod playback;
mod slides;
mod ui;
mod voice;

use crate::cache::{UNTITLED_SCRIPT, presets_path, save_script_config};
use crate::command_log::CommandLog;
use crate::config::{
    AppConfig, FONT_SIZE_RANGE, MARGIN_HORIZONTAL_RANGE, MARGIN_VERTICAL_RANGE,
    SCROLL_SPEED_RANGE, START_DELAY_RANGE, ThemeMode,
};
use crate::cues::extract_cues;
use crate::error::PrompterError;
use crate::mirror::{MirrorBus, MirrorEvent, MirrorSettings};
use crate::presets::{PresetStore, PresetValues};
use crate::resolver::{GeminiResolver, PlayerSnapshot, SpeechResolver};
use crate::slides::{PlayerMode, SlideDisplay};
use iced::Task;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::messages::Message;

pub(crate) use constants::*;
pub(in crate::app) use playback::PlaybackState;
pub(in crate::app) use slides::SlidesState;
pub(in crate::app) use ui::{LoadedPreset, Notice, UiState};
pub(in crate::app) use voice::{InFlight, VoiceState};

pub(in crate::app) fn resolver_from_config(config: &AppConfig) -> Option<Arc<dyn SpeechResolver>> {
    match GeminiResolver::from_config(config) {
        Ok(resolver) => Some(Arc::new(resolver)),
        Err(err) => {
            warn!("Voice control unavailable: {err}");
            None
        }
    }
}

/// Core application state composed of sub-models.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) script_path: Option<PathBuf>,
    pub(super) playback: PlaybackState,
    pub(super) voice: VoiceState,
    pub(super) slides: SlidesState,
    pub(super) ui: UiState,
    pub(super) log: CommandLog,
    pub(super) presets: PresetStore,
    pub(super) mirror: MirrorBus,
}

impl App {
    pub(super) fn bootstrap(
        text: String,
        mut config: AppConfig,
        script_path: Option<PathBuf>,
        mirror: MirrorBus,
    ) -> (App, Task<Message>) {
        clamp_config(&mut config);
        let resolver = resolver_from_config(&config);
        let mut voice = VoiceState::new(resolver);
        voice.enabled = config.voice_control && voice.resolver.is_some();
        config.voice_control = voice.enabled;

        let mut app = App {
            playback: PlaybackState::new(&text, config.scroll_speed),
            voice,
            slides: SlidesState::new(),
            ui: UiState::new(&text),
            log: CommandLog::default(),
            presets: PresetStore::load(&presets_path()),
            mirror,
            script_path,
            config,
        };
        // Slides only exist after an import, so a fresh session starts in text mode.
        app.config.player_mode = PlayerMode::Text;
        app.rebuild_cues();
        app.mirror
            .publish(MirrorEvent::SettingsUpdate(app.mirror_settings()));

        info!(
            words = app.playback.script.word_count(),
            cues = app.playback.cues.len(),
            voice = app.voice.enabled,
            night_mode = matches!(app.config.theme, ThemeMode::Night),
            "Initialized prompter state"
        );
        (app, Task::none())
    }

    /// Path the per-script settings cache is keyed on.
    pub(super) fn settings_key(&self) -> PathBuf {
        self.script_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(UNTITLED_SCRIPT))
    }

    pub(super) fn save_script_config(&self) {
        save_script_config(&self.settings_key(), &self.config);
    }

    pub(super) fn is_slides_mode(&self) -> bool {
        matches!(self.config.player_mode, PlayerMode::Slides)
    }

    pub(super) fn is_notes_mode(&self) -> bool {
        self.is_slides_mode() && matches!(self.config.slide_display, SlideDisplay::Notes)
    }

    /// The scrolling surface is hidden while a slide image is shown.
    pub(super) fn scroll_enabled(&self) -> bool {
        !(self.is_slides_mode() && matches!(self.config.slide_display, SlideDisplay::Slide))
    }

    pub(super) fn cue_countdown(&self) -> Option<u32> {
        match self.playback.clock.phase() {
            crate::clock::ClockPhase::PausedForCue { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    pub(super) fn start_countdown(&self) -> Option<u32> {
        match self.playback.clock.phase() {
            crate::clock::ClockPhase::Delaying { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Play/pause and voice control are unavailable on the slide image view
    /// and while a cue counts down.
    pub(super) fn play_disabled(&self) -> bool {
        !self.scroll_enabled() || self.cue_countdown().is_some()
    }

    pub(super) fn speed_slider_disabled(&self) -> bool {
        self.voice.enabled || self.play_disabled()
    }

    pub(super) fn player_snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            is_playing: self.playback.clock.is_running(),
            mode: self.config.player_mode,
            total_slides: self.slides.deck.len(),
            current_slide: self.slides.deck.current_index(),
        }
    }

    pub(super) fn mirror_settings(&self) -> MirrorSettings {
        MirrorSettings {
            scroll_speed: self.config.scroll_speed,
            font_size: self.config.font_size,
            margin_horizontal: self.config.margin_horizontal,
            margin_vertical: self.config.margin_vertical,
            text: self.playback.script.text().to_string(),
        }
    }

    pub(super) fn preset_values(&self) -> PresetValues {
        PresetValues {
            scroll_speed: self.config.scroll_speed,
            font_size: self.config.font_size,
            margin_horizontal: self.config.margin_horizontal,
            margin_vertical: self.config.margin_vertical,
        }
    }

    /// Recompute cues for the current text and slide. Forgets fired cues.
    pub(super) fn rebuild_cues(&mut self) {
        let videos = if self.is_slides_mode() {
            self.slides
                .deck
                .current()
                .map(|slide| slide.videos.as_slice())
        } else {
            None
        };
        self.playback.cues = extract_cues(self.playback.script.segments(), videos);
        self.playback.cue_tracker.reset();
    }

    pub(super) fn vertical_padding(&self) -> f32 {
        self.config.window_height * f32::from(self.config.margin_vertical) / 100.0
    }

    pub(super) fn horizontal_padding(&self) -> f32 {
        self.config.window_width * f32::from(self.config.margin_horizontal) / 100.0
    }

    /// Offset that puts `word` in the middle of the viewport, estimated from
    /// the word's share of the rendered text.
    pub(super) fn word_scroll_target(&self, word: usize) -> Option<f32> {
        let geometry = self.playback.geometry;
        if !geometry.is_scrollable() {
            return None;
        }
        let fraction = self.playback.script.word_fraction(word)?;
        let padding = self.vertical_padding();
        let text_height = (geometry.content_height - 2.0 * padding).max(0.0);
        let y = padding + fraction * text_height;
        Some((y - geometry.viewport_height / 2.0).clamp(0.0, geometry.max_offset()))
    }

    pub(super) fn show_notice(&mut self, message: impl Into<String>) {
        self.ui.notice = Some(Notice {
            message: message.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    pub(super) fn show_error(&mut self, err: &PrompterError) {
        self.ui.notice = Some(Notice {
            message: format!("{}: {err}", err.title()),
            is_error: true,
            shown_at: Instant::now(),
        });
    }
}

pub(in crate::app) fn clamp_config(config: &mut AppConfig) {
    fn normalize_key_binding(value: &mut String, fallback: &str) {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            *value = fallback.to_string();
        } else {
            *value = normalized;
        }
    }

    config.font_size = config
        .font_size
        .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
    config.margin_horizontal = config.margin_horizontal.min(*MARGIN_HORIZONTAL_RANGE.end());
    config.margin_vertical = config.margin_vertical.min(*MARGIN_VERTICAL_RANGE.end());
    config.scroll_speed = if config.scroll_speed.is_finite() {
        config
            .scroll_speed
            .clamp(*SCROLL_SPEED_RANGE.start(), *SCROLL_SPEED_RANGE.end())
    } else {
        crate::config::default_scroll_speed()
    };
    config.start_delay_secs = config.start_delay_secs.min(*START_DELAY_RANGE.end());
    config.window_width = config.window_width.clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH);
    config.window_height = config
        .window_height
        .clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);
    config.window_pos_x = config.window_pos_x.filter(|v| v.is_finite());
    config.window_pos_y = config.window_pos_y.filter(|v| v.is_finite());
    if !config.clip_interval_secs.is_finite() || config.clip_interval_secs <= 0.0 {
        config.clip_interval_secs = 2.0;
    }
    config.clip_interval_secs = config.clip_interval_secs.clamp(0.5, 10.0);
    normalize_key_binding(&mut config.key_toggle_play_pause, "space");
    normalize_key_binding(&mut config.key_rewind, "r");
    normalize_key_binding(&mut config.key_toggle_voice, "v");
    normalize_key_binding(&mut config.key_toggle_cues, "c");
    normalize_key_binding(&mut config.key_next_slide, "n");
    normalize_key_binding(&mut config.key_prev_slide, "p");
    normalize_key_binding(&mut config.key_toggle_logging, "ctrl+l");
    normalize_key_binding(&mut config.key_safe_quit, "q");
}
