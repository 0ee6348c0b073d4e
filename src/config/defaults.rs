use crate::config::LogLevel;
use std::ops::RangeInclusive;

/// Slider domains shared by settings, presets and the view.
pub(crate) const SCROLL_SPEED_RANGE: RangeInclusive<f32> = 0.0..=100.0;
pub(crate) const FONT_SIZE_RANGE: RangeInclusive<u32> = 12..=120;
pub(crate) const MARGIN_HORIZONTAL_RANGE: RangeInclusive<u16> = 0..=40;
pub(crate) const MARGIN_VERTICAL_RANGE: RangeInclusive<u16> = 0..=50;
pub(crate) const START_DELAY_RANGE: RangeInclusive<u32> = 0..=10;

pub(crate) fn default_font_size() -> u32 {
    40
}

pub(crate) fn default_margin_horizontal() -> u16 {
    20
}

pub(crate) fn default_margin_vertical() -> u16 {
    40
}

pub(crate) fn default_scroll_speed() -> f32 {
    10.0
}

pub(crate) fn default_start_delay_secs() -> u32 {
    3
}

pub(crate) fn default_cues_enabled() -> bool {
    true
}

pub(crate) fn default_window_width() -> f32 {
    1280.0
}

pub(crate) fn default_window_height() -> f32 {
    800.0
}

pub(crate) fn default_input_device() -> String {
    "default".to_string()
}

pub(crate) fn default_clip_interval_secs() -> f32 {
    2.0
}

pub(crate) fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub(crate) fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

pub(crate) fn default_resolver_timeout_secs() -> u64 {
    12
}

pub(crate) fn default_docs_endpoint() -> String {
    "https://docs.googleapis.com".to_string()
}

pub(crate) fn default_slides_endpoint() -> String {
    "https://slides.googleapis.com".to_string()
}

pub(crate) fn default_export_dir() -> String {
    "exports".to_string()
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Debug
}

pub(crate) fn default_key_toggle_play_pause() -> String {
    "space".to_string()
}

pub(crate) fn default_key_rewind() -> String {
    "r".to_string()
}

pub(crate) fn default_key_toggle_voice() -> String {
    "v".to_string()
}

pub(crate) fn default_key_toggle_cues() -> String {
    "c".to_string()
}

pub(crate) fn default_key_next_slide() -> String {
    "n".to_string()
}

pub(crate) fn default_key_prev_slide() -> String {
    "p".to_string()
}

pub(crate) fn default_key_toggle_logging() -> String {
    "ctrl+l".to_string()
}

pub(crate) fn default_key_safe_quit() -> String {
    "q".to_string()
}
