use super::super::state::{App, clamp_config};
use super::Effect;
use crate::config::AppConfig;
use crate::error::{ImportError, PrompterError};
use crate::import::document_id_from_input;
use crate::slides::{PlayerMode, Slide};
use std::path::PathBuf;
use tracing::{info, warn};

impl App {
    fn requested_document_id(&mut self) -> Option<String> {
        if self.ui.import_busy {
            return None;
        }
        let id = document_id_from_input(&self.ui.import_input);
        if id.is_none() {
            self.show_error(&PrompterError::Validation(
                "paste a Google document link or id".to_string(),
            ));
        }
        id
    }

    pub(super) fn handle_import_document(&mut self, effects: &mut Vec<Effect>) {
        if let Some(id) = self.requested_document_id() {
            info!(%id, "Importing document");
            self.ui.import_busy = true;
            effects.push(Effect::ImportDocument(id));
        }
    }

    pub(super) fn handle_import_presentation(&mut self, effects: &mut Vec<Effect>) {
        if let Some(id) = self.requested_document_id() {
            info!(%id, "Importing presentation");
            self.ui.import_busy = true;
            effects.push(Effect::ImportPresentation(id));
        }
    }

    pub(super) fn handle_document_imported(
        &mut self,
        result: Result<String, PrompterError>,
        effects: &mut Vec<Effect>,
    ) {
        self.ui.import_busy = false;
        match result {
            Ok(text) => {
                self.halt_for_new_content(effects);
                self.config.player_mode = PlayerMode::Text;
                self.replace_script(&text, effects);
                self.ui.import_input.clear();
                self.show_notice("Document imported");
                effects.push(Effect::SaveConfig);
            }
            Err(err) => {
                warn!("Document import failed: {err}");
                self.show_error(&err);
            }
        }
    }

    pub(super) fn handle_presentation_imported(
        &mut self,
        result: Result<Vec<Slide>, PrompterError>,
        effects: &mut Vec<Effect>,
    ) {
        self.ui.import_busy = false;
        let slides = match result {
            Ok(slides) => slides,
            Err(err) => {
                warn!("Presentation import failed: {err}");
                self.show_error(&err);
                return;
            }
        };
        if slides.is_empty() {
            self.show_error(&PrompterError::Import(ImportError::Failed(
                "the presentation has no slides".to_string(),
            )));
            return;
        }

        self.halt_for_new_content(effects);
        let count = slides.len();
        self.install_deck(slides, effects);
        self.config.player_mode = PlayerMode::Slides;
        self.on_slide_changed(effects);
        self.ui.import_input.clear();
        self.show_notice(format!("Imported {count} slides"));
        effects.push(Effect::SaveConfig);
    }

    pub(super) fn handle_open_path_requested(&mut self, effects: &mut Vec<Effect>) {
        if self.ui.script_loading {
            return;
        }
        let raw = self.ui.open_path_input.trim();
        if raw.is_empty() {
            self.show_error(&PrompterError::Validation(
                "enter the path of a script file".to_string(),
            ));
            return;
        }
        let path = PathBuf::from(raw);
        info!(path = %path.display(), "Opening script");
        self.ui.script_loading = true;
        effects.push(Effect::LoadScript(path));
    }

    pub(super) fn handle_script_loaded(
        &mut self,
        path: PathBuf,
        text: Result<String, String>,
        mut config: AppConfig,
        effects: &mut Vec<Effect>,
    ) {
        self.ui.script_loading = false;
        let text = match text {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), "Failed to open script: {err}");
                self.show_error(&PrompterError::Validation(err));
                return;
            }
        };

        self.halt_for_new_content(effects);
        clamp_config(&mut config);
        config.window_width = self.config.window_width;
        config.window_height = self.config.window_height;
        config.window_pos_x = self.config.window_pos_x;
        config.window_pos_y = self.config.window_pos_y;
        config.voice_control = self.voice.enabled;
        config.player_mode = PlayerMode::Text;
        self.config = config;
        self.playback.clock.set_speed(self.config.scroll_speed);
        self.script_path = Some(path.clone());
        self.replace_script(&text, effects);
        self.ui.open_path_input.clear();
        self.show_notice(format!("Opened {}", path.display()));
        effects.push(Effect::SaveConfig);
    }

    /// New content always starts paused at the top.
    fn halt_for_new_content(&mut self, effects: &mut Vec<Effect>) {
        self.bump_generation();
        if self.playback.clock.is_active() || self.cue_countdown().is_some() {
            self.stop_playback(effects);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::test_support::{build_test_app, published};
    use super::*;
    use crate::mirror::MirrorEvent;

    #[test]
    fn invalid_import_input_is_rejected() {
        let mut app = build_test_app("one");
        app.reduce(Message::ImportInputChanged("not a link".to_string()));
        let effects = app.reduce(Message::ImportDocument);
        assert!(effects.is_empty());
        assert!(!app.ui.import_busy);
        assert!(app.ui.notice.as_ref().is_some_and(|notice| notice.is_error));
    }

    #[test]
    fn document_import_replaces_script() {
        let mut app = build_test_app("one");
        app.reduce(Message::ImportInputChanged(
            "https://docs.google.com/document/d/abc123/edit".to_string(),
        ));
        let effects = app.reduce(Message::ImportDocument);
        assert!(matches!(&effects[..], [Effect::ImportDocument(id)] if id == "abc123"));
        assert!(app.ui.import_busy);

        app.reduce(Message::TogglePlayPause);
        let effects = app.reduce(Message::DocumentImported(Ok("imported words here".to_string())));
        assert!(!app.ui.import_busy);
        assert!(!app.playback.clock.is_active());
        assert_eq!(app.playback.script.word_count(), 3);
        assert!(
            published(&effects)
                .iter()
                .any(|e| matches!(e, MirrorEvent::SettingsUpdate(settings) if settings.text == "imported words here"))
        );
    }

    #[test]
    fn expired_credential_surfaces_as_notice() {
        let mut app = build_test_app("one");
        app.ui.import_busy = true;
        app.reduce(Message::DocumentImported(Err(ImportError::ExpiredCredential.into())));
        assert!(!app.ui.import_busy);
        assert_eq!(app.playback.script.text(), "one");
        let notice = app.ui.notice.as_ref().map(|notice| notice.message.clone());
        assert!(notice.is_some_and(|message| message.starts_with("Import Error")));
    }

    #[test]
    fn presentation_import_enters_slides_mode() {
        let mut app = build_test_app("one");
        let slides = vec![Slide {
            image_url: "https://example.invalid/a.png".to_string(),
            speaker_notes: "hello from the first slide".to_string(),
            videos: Vec::new(),
        }];
        let effects = app.reduce(Message::PresentationImported(Ok(slides)));
        assert_eq!(app.config.player_mode, PlayerMode::Slides);
        assert_eq!(app.playback.script.text(), "hello from the first slide");
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::FetchSlideImage { index: 0, .. }))
        );
    }

    #[test]
    fn loaded_script_takes_its_cached_settings() {
        let mut app = build_test_app("one");
        let mut config = app.config.clone();
        config.font_size = 72;
        config.scroll_speed = 33.0;
        app.ui.script_loading = true;
        app.reduce(Message::ScriptLoaded {
            path: PathBuf::from("talk.txt"),
            text: Ok("loaded script text".to_string()),
            config: Box::new(config),
        });
        assert!(!app.ui.script_loading);
        assert_eq!(app.config.font_size, 72);
        assert_eq!(app.playback.clock.speed(), 33.0);
        assert_eq!(app.script_path, Some(PathBuf::from("talk.txt")));
        assert_eq!(app.playback.script.text(), "loaded script text");
    }
}
