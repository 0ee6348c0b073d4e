use super::super::state::App;
use super::Effect;
use crate::config::{
    FONT_SIZE_RANGE, MARGIN_HORIZONTAL_RANGE, MARGIN_VERTICAL_RANGE, SCROLL_SPEED_RANGE,
    START_DELAY_RANGE, ThemeMode,
};
use crate::mirror::MirrorEvent;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn handle_scroll_speed_changed(&mut self, speed: f32, effects: &mut Vec<Effect>) {
        if self.voice.enabled {
            debug!("Speed is driven by voice tracking; ignoring slider");
            return;
        }
        if !speed.is_finite() || !SCROLL_SPEED_RANGE.contains(&speed) {
            warn!(speed, "Ignoring out-of-range scroll speed");
            return;
        }
        if (self.config.scroll_speed - speed).abs() < f32::EPSILON {
            return;
        }
        self.config.scroll_speed = speed;
        self.playback.clock.set_speed(speed);
        self.settings_changed(effects);
    }

    pub(super) fn handle_font_size_changed(&mut self, size: u32, effects: &mut Vec<Effect>) {
        if !FONT_SIZE_RANGE.contains(&size) {
            warn!(size, "Ignoring out-of-range font size");
            return;
        }
        if self.config.font_size != size {
            self.config.font_size = size;
            self.settings_changed(effects);
        }
    }

    pub(super) fn handle_margin_horizontal_changed(
        &mut self,
        margin: u16,
        effects: &mut Vec<Effect>,
    ) {
        if !MARGIN_HORIZONTAL_RANGE.contains(&margin) {
            warn!(margin, "Ignoring out-of-range horizontal margin");
            return;
        }
        if self.config.margin_horizontal != margin {
            self.config.margin_horizontal = margin;
            self.settings_changed(effects);
        }
    }

    pub(super) fn handle_margin_vertical_changed(&mut self, margin: u16, effects: &mut Vec<Effect>) {
        if !MARGIN_VERTICAL_RANGE.contains(&margin) {
            warn!(margin, "Ignoring out-of-range vertical margin");
            return;
        }
        if self.config.margin_vertical != margin {
            self.config.margin_vertical = margin;
            self.settings_changed(effects);
        }
    }

    pub(super) fn handle_start_delay_changed(&mut self, secs: u32, effects: &mut Vec<Effect>) {
        if !START_DELAY_RANGE.contains(&secs) {
            warn!(secs, "Ignoring out-of-range start delay");
            return;
        }
        if self.config.start_delay_secs != secs {
            self.config.start_delay_secs = secs;
            effects.push(Effect::SaveConfig);
        }
    }

    pub(super) fn handle_toggle_theme(&mut self, effects: &mut Vec<Effect>) {
        self.config.theme = match self.config.theme {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        };
        info!(theme = %self.config.theme, "Switched theme");
        effects.push(Effect::SaveConfig);
    }

    pub(super) fn handle_toggle_cues(&mut self, effects: &mut Vec<Effect>) {
        self.config.cues_enabled = !self.config.cues_enabled;
        info!(enabled = self.config.cues_enabled, "Toggled cues");
        effects.push(Effect::SaveConfig);
    }

    /// Display settings the mirror reproduces.
    pub(super) fn settings_changed(&mut self, effects: &mut Vec<Effect>) {
        effects.push(Effect::SaveConfig);
        effects.push(Effect::Publish(MirrorEvent::SettingsUpdate(
            self.mirror_settings(),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::test_support::{build_test_app, published};
    use super::*;

    #[test]
    fn speed_change_reaches_clock_and_mirror() {
        let mut app = build_test_app("one two");
        let effects = app.reduce(Message::ScrollSpeedChanged(70.0));
        assert_eq!(app.config.scroll_speed, 70.0);
        assert_eq!(app.playback.clock.speed(), 70.0);
        assert!(effects.iter().any(|e| matches!(e, Effect::SaveConfig)));
        assert!(matches!(
            published(&effects)[..],
            [MirrorEvent::SettingsUpdate(settings)] if settings.scroll_speed == 70.0
        ));
    }

    #[test]
    fn speed_slider_is_ignored_under_voice_control() {
        let mut app = build_test_app("one two");
        app.reduce(Message::ToggleVoiceControl);
        let before = app.config.scroll_speed;
        let effects = app.reduce(Message::ScrollSpeedChanged(before + 10.0));
        assert_eq!(app.config.scroll_speed, before);
        assert!(published(&effects).is_empty());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut app = build_test_app("one two");
        let font = app.config.font_size;
        let effects = app.reduce(Message::FontSizeChanged(500));
        assert_eq!(app.config.font_size, font);
        assert!(effects.is_empty());

        app.reduce(Message::MarginVerticalChanged(51));
        assert!(MARGIN_VERTICAL_RANGE.contains(&app.config.margin_vertical));
        app.reduce(Message::ScrollSpeedChanged(f32::NAN));
        assert!(app.config.scroll_speed.is_finite());
    }

    #[test]
    fn margins_and_theme_are_persisted() {
        let mut app = build_test_app("one two");
        let effects = app.reduce(Message::MarginHorizontalChanged(30));
        assert_eq!(app.config.margin_horizontal, 30);
        assert!(effects.iter().any(|e| matches!(e, Effect::SaveConfig)));

        let theme = app.config.theme;
        app.reduce(Message::ToggleTheme);
        assert_ne!(app.config.theme, theme);
    }
}
