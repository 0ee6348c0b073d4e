//! Configuration loading for the prompter.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so the UI can still launch.

mod defaults;
mod io;
mod models;
mod tables;

pub(crate) use defaults::{
    FONT_SIZE_RANGE, MARGIN_HORIZONTAL_RANGE, MARGIN_VERTICAL_RANGE, SCROLL_SPEED_RANGE,
    START_DELAY_RANGE, default_font_size, default_margin_horizontal, default_margin_vertical,
    default_scroll_speed, default_start_delay_secs,
};
pub use io::{load_config, parse_config, serialize_config};
pub use models::{AppConfig, LogLevel, ThemeMode};
