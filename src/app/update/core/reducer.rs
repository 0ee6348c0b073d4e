use super::super::super::messages::Message;
use super::super::super::state::{
    App, MAX_WINDOW_HEIGHT, MAX_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    NOTICE_LIFETIME,
};
use super::super::Effect;
use std::time::Instant;
use tracing::{debug, info};

impl App {
    pub(in crate::app) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::TogglePlayPause => self.handle_toggle_play_pause(&mut effects),
            Message::Rewind => self.handle_rewind(&mut effects),
            Message::ScrollSpeedChanged(speed) => {
                self.handle_scroll_speed_changed(speed, &mut effects);
            }
            Message::FontSizeChanged(size) => self.handle_font_size_changed(size, &mut effects),
            Message::MarginHorizontalChanged(margin) => {
                self.handle_margin_horizontal_changed(margin, &mut effects);
            }
            Message::MarginVerticalChanged(margin) => {
                self.handle_margin_vertical_changed(margin, &mut effects);
            }
            Message::StartDelayChanged(secs) => {
                self.handle_start_delay_changed(secs, &mut effects);
            }
            Message::ToggleTheme => self.handle_toggle_theme(&mut effects),
            Message::ToggleSettings => self.ui.settings_open = !self.ui.settings_open,
            Message::ToggleCues => self.handle_toggle_cues(&mut effects),
            Message::ToggleVoiceControl => self.handle_toggle_voice_control(&mut effects),
            Message::ToggleEditor => self.ui.editor_open = !self.ui.editor_open,
            Message::ScriptEdited(action) => self.handle_script_edited(action, &mut effects),
            Message::PlayerModeChanged(mode) => {
                self.handle_player_mode_changed(mode, &mut effects);
            }
            Message::SlideDisplayChanged(display) => {
                self.handle_slide_display_changed(display, &mut effects);
            }
            Message::NextSlide => self.handle_next_slide(&mut effects),
            Message::PreviousSlide => self.handle_previous_slide(&mut effects),
            Message::GoToSlide(index) => self.handle_go_to_slide(index, &mut effects),
            Message::SlideImageLoaded {
                deck_version,
                index,
                bytes,
            } => self.handle_slide_image_loaded(deck_version, index, bytes),
            Message::ImportInputChanged(input) => self.ui.import_input = input,
            Message::ImportDocument => self.handle_import_document(&mut effects),
            Message::ImportPresentation => self.handle_import_presentation(&mut effects),
            Message::DocumentImported(result) => {
                self.handle_document_imported(result, &mut effects);
            }
            Message::PresentationImported(result) => {
                self.handle_presentation_imported(result, &mut effects);
            }
            Message::OpenPathInputChanged(path) => self.ui.open_path_input = path,
            Message::OpenPathRequested => self.handle_open_path_requested(&mut effects),
            Message::ScriptLoaded { path, text, config } => {
                self.handle_script_loaded(path, text, *config, &mut effects);
            }
            Message::Assist(command) => self.handle_assist(command, &mut effects),
            Message::AssistFinished {
                command,
                range,
                original,
                result,
            } => self.handle_assist_finished(command, range, original, result, &mut effects),
            Message::ToggleLogging => self.handle_toggle_logging(),
            Message::ClearLog => self.handle_clear_log(),
            Message::ExportLog(format) => self.handle_export_log(format, &mut effects),
            Message::LogPathInputChanged(path) => self.ui.log_path_input = path,
            Message::LoadLogRequested => self.handle_load_log_requested(&mut effects),
            Message::LogLoaded(result) => self.handle_log_loaded(result),
            Message::PresetNameChanged(name) => self.ui.preset_name = name,
            Message::PresetFilterChanged(filter) => self.ui.preset_filter = filter,
            Message::SavePreset => self.handle_save_preset(&mut effects),
            Message::LoadPreset(id) => self.handle_load_preset(&id, &mut effects),
            Message::DeletePreset(id) => self.handle_delete_preset(&id, &mut effects),
            Message::ResetSettings => self.handle_reset_settings(&mut effects),
            Message::Frame(now) => self.handle_frame(now, &mut effects),
            Message::SecondTick(_) => self.handle_second_tick(&mut effects),
            Message::PollCapture => self.handle_poll_capture(&mut effects),
            Message::CaptureFailed(err) => self.handle_capture_failed(err, &mut effects),
            Message::ResolutionReady {
                request_id,
                generation,
                result,
            } => self.handle_resolution_ready(request_id, generation, result, &mut effects),
            Message::Scrolled {
                offset_y,
                viewport_height,
                content_height,
            } => self.handle_scrolled(offset_y, viewport_height, content_height),
            Message::WindowResized { width, height } => {
                self.handle_window_resized(width, height, &mut effects);
            }
            Message::WindowMoved { x, y } => self.handle_window_moved(x, y, &mut effects),
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::DismissNotice => self.ui.notice = None,
            Message::SafeQuit => effects.push(Effect::QuitSafely),
            Message::PollSystemSignals => self.handle_poll_system_signals(&mut effects),
        }

        self.sync_capture(&mut effects);
        self.refresh_loaded_preset();

        effects
    }

    fn handle_poll_system_signals(&mut self, effects: &mut Vec<Effect>) {
        if crate::take_sigint_requested() {
            info!("Interrupt received; quitting");
            effects.push(Effect::QuitSafely);
        }
        let now = Instant::now();
        if self
            .ui
            .notice
            .as_ref()
            .is_some_and(|notice| now.duration_since(notice.shown_at) >= NOTICE_LIFETIME)
        {
            self.ui.notice = None;
        }
        self.playback.cue_tracker.expire_upcoming(now);
    }

    fn handle_scrolled(&mut self, offset_y: f32, viewport_height: f32, content_height: f32) {
        let sanitize = |value: f32| if value.is_finite() { value.max(0.0) } else { 0.0 };
        self.playback.geometry.viewport_height = sanitize(viewport_height);
        self.playback.geometry.content_height = sanitize(content_height);
        // Manual scrolling moves the reading position; the clock continues from there.
        self.playback.clock.set_offset(sanitize(offset_y));
    }

    fn handle_window_resized(&mut self, width: f32, height: f32, effects: &mut Vec<Effect>) {
        if !width.is_finite() || !height.is_finite() {
            return;
        }
        let width = width.clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH);
        let height = height.clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);
        let changed = (self.config.window_width - width).abs() >= 1.0
            || (self.config.window_height - height).abs() >= 1.0;
        if changed {
            self.config.window_width = width;
            self.config.window_height = height;
            debug!(width, height, "Window size changed");
            effects.push(Effect::SaveConfig);
        }
    }

    fn handle_window_moved(&mut self, x: f32, y: f32, effects: &mut Vec<Effect>) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let changed = self
            .config
            .window_pos_x
            .map(|px| (px - x).abs() >= 1.0)
            .unwrap_or(true)
            || self
                .config
                .window_pos_y
                .map(|py| (py - y).abs() >= 1.0)
                .unwrap_or(true);
        if changed {
            self.config.window_pos_x = Some(x);
            self.config.window_pos_y = Some(y);
            effects.push(Effect::SaveConfig);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::test_support::build_test_app;
    use super::*;

    #[test]
    fn scroll_events_update_geometry_and_offset() {
        let mut app = build_test_app("one two three");
        app.reduce(Message::Scrolled {
            offset_y: 120.0,
            viewport_height: 400.0,
            content_height: 1600.0,
        });
        assert_eq!(app.playback.geometry.viewport_height, 400.0);
        assert_eq!(app.playback.geometry.content_height, 1600.0);
        assert_eq!(app.playback.clock.offset(), 120.0);
    }

    #[test]
    fn window_resize_is_persisted_once() {
        let mut app = build_test_app("one two three");
        let effects = app.reduce(Message::WindowResized {
            width: 1000.0,
            height: 700.0,
        });
        assert!(effects.iter().any(|e| matches!(e, Effect::SaveConfig)));
        let effects = app.reduce(Message::WindowResized {
            width: 1000.4,
            height: 700.0,
        });
        assert!(!effects.iter().any(|e| matches!(e, Effect::SaveConfig)));
    }

    #[test]
    fn stale_notice_is_cleared_on_poll() {
        let mut app = build_test_app("one two three");
        app.show_notice("hello");
        if let Some(notice) = app.ui.notice.as_mut() {
            notice.shown_at = Instant::now() - NOTICE_LIFETIME;
        }
        app.reduce(Message::PollSystemSignals);
        assert!(app.ui.notice.is_none());
    }
}
