use super::super::state::{App, LoadedPreset};
use super::Effect;
use crate::config::{
    default_font_size, default_margin_horizontal, default_margin_vertical, default_scroll_speed,
    default_start_delay_secs,
};
use crate::presets::PresetValues;
use chrono::Utc;
use tracing::{info, warn};

impl App {
    pub(super) fn handle_save_preset(&mut self, effects: &mut Vec<Effect>) {
        let values = self.preset_values();
        match self.presets.create(&self.ui.preset_name, values, Utc::now()) {
            Ok(preset) => {
                let name = preset.name.clone();
                self.ui.loaded_preset = Some(LoadedPreset {
                    name: name.clone(),
                    values,
                });
                self.ui.preset_name.clear();
                self.show_notice(format!("Saved preset \"{name}\""));
                effects.push(Effect::SavePresets);
            }
            Err(err) => {
                warn!("Preset not saved: {err}");
                self.show_error(&err);
            }
        }
    }

    pub(super) fn handle_load_preset(&mut self, id: &str, effects: &mut Vec<Effect>) {
        let Some(preset) = self.presets.get(id).cloned() else {
            warn!(%id, "Unknown preset");
            return;
        };
        if let Err(err) = preset.values.validate() {
            self.show_error(&err);
            return;
        }
        self.apply_display_values(preset.values, effects);
        info!(name = %preset.name, "Loaded preset");
        self.ui.loaded_preset = Some(LoadedPreset {
            name: preset.name,
            values: preset.values,
        });
    }

    pub(super) fn handle_delete_preset(&mut self, id: &str, effects: &mut Vec<Effect>) {
        let name = self.presets.get(id).map(|preset| preset.name.clone());
        if !self.presets.delete(id) {
            return;
        }
        if self
            .ui
            .loaded_preset
            .as_ref()
            .is_some_and(|loaded| Some(&loaded.name) == name.as_ref())
        {
            self.ui.loaded_preset = None;
        }
        effects.push(Effect::SavePresets);
    }

    pub(super) fn handle_reset_settings(&mut self, effects: &mut Vec<Effect>) {
        self.config.start_delay_secs = default_start_delay_secs();
        self.apply_display_values(
            PresetValues {
                scroll_speed: default_scroll_speed(),
                font_size: default_font_size(),
                margin_horizontal: default_margin_horizontal(),
                margin_vertical: default_margin_vertical(),
            },
            effects,
        );
        self.ui.loaded_preset = None;
        self.show_notice("Display settings reset");
    }

    fn apply_display_values(&mut self, values: PresetValues, effects: &mut Vec<Effect>) {
        self.config.font_size = values.font_size;
        self.config.margin_horizontal = values.margin_horizontal;
        self.config.margin_vertical = values.margin_vertical;
        if !self.voice.enabled {
            self.config.scroll_speed = values.scroll_speed;
            self.playback.clock.set_speed(values.scroll_speed);
        }
        self.settings_changed(effects);
    }

    /// Forget the loaded preset once any of its values is edited.
    pub(super) fn refresh_loaded_preset(&mut self) {
        let current = self.preset_values();
        if self
            .ui
            .loaded_preset
            .as_ref()
            .is_some_and(|loaded| loaded.values != current)
        {
            self.ui.loaded_preset = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::test_support::build_test_app;
    use super::*;

    fn saved_id(app: &App, name: &str) -> String {
        app.presets
            .presets()
            .iter()
            .find(|preset| preset.name == name)
            .map(|preset| preset.id.clone())
            .unwrap_or_default()
    }

    #[test]
    fn saving_and_loading_a_preset() {
        let mut app = build_test_app("one two");
        app.reduce(Message::FontSizeChanged(64));
        app.reduce(Message::PresetNameChanged("Studio wide".to_string()));
        let effects = app.reduce(Message::SavePreset);
        assert!(effects.iter().any(|e| matches!(e, Effect::SavePresets)));
        assert_eq!(
            app.ui.loaded_preset.as_ref().map(|p| p.name.as_str()),
            Some("Studio wide")
        );
        let id = saved_id(&app, "Studio wide");

        app.reduce(Message::FontSizeChanged(30));
        assert!(app.ui.loaded_preset.is_none());

        app.reduce(Message::LoadPreset(id));
        assert_eq!(app.config.font_size, 64);
        assert!(app.ui.loaded_preset.is_some());
    }

    #[test]
    fn blank_preset_name_is_rejected() {
        let mut app = build_test_app("one two");
        let before = app.presets.presets().len();
        let effects = app.reduce(Message::SavePreset);
        assert!(effects.is_empty());
        assert_eq!(app.presets.presets().len(), before);
        assert!(app.ui.notice.as_ref().is_some_and(|notice| notice.is_error));
    }

    #[test]
    fn deleting_loaded_preset_clears_it() {
        let mut app = build_test_app("one two");
        app.reduce(Message::PresetNameChanged("Temp preset".to_string()));
        app.reduce(Message::SavePreset);
        let id = saved_id(&app, "Temp preset");
        let effects = app.reduce(Message::DeletePreset(id));
        assert!(effects.iter().any(|e| matches!(e, Effect::SavePresets)));
        assert!(app.ui.loaded_preset.is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut app = build_test_app("one two");
        app.reduce(Message::FontSizeChanged(90));
        app.reduce(Message::ScrollSpeedChanged(80.0));
        app.reduce(Message::StartDelayChanged(7));
        assert_eq!(app.config.start_delay_secs, 7);
        let effects = app.reduce(Message::ResetSettings);
        assert!(effects.iter().any(|e| matches!(e, Effect::SaveConfig)));
        assert_eq!(app.config.font_size, default_font_size());
        assert_eq!(app.playback.clock.speed(), default_scroll_speed());
        assert_eq!(app.config.start_delay_secs, default_start_delay_secs());
    }
}
