mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::config::AppConfig;
use crate::mirror::MirrorBus;
use iced::{Point, Size, Theme, window};
use std::path::PathBuf;

/// Launch the prompter with `text` as the initial script.
pub fn run_app(
    text: String,
    config: AppConfig,
    script_path: Option<PathBuf>,
    mirror: MirrorBus,
) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        position: match (config.window_pos_x, config.window_pos_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                window::Position::Specific(Point::new(x, y))
            }
            _ => window::Position::Default,
        },
        min_size: Some(Size::new(
            state::MIN_WINDOW_WIDTH,
            state::MIN_WINDOW_HEIGHT,
        )),
        ..window::Settings::default()
    };

    iced::application("Voice Prompter", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| {
            if matches!(app.config.theme, crate::config::ThemeMode::Night) {
                Theme::Dark
            } else {
                Theme::Light
            }
        })
        .run_with(move || App::bootstrap(text, config, script_path, mirror))
}
