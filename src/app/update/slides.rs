use super::super::state::App;
use super::Effect;
use crate::mirror::MirrorEvent;
use crate::slides::{PlayerMode, Slide, SlideDeck, SlideDisplay};
use iced::widget::image;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_player_mode_changed(&mut self, mode: PlayerMode, effects: &mut Vec<Effect>) {
        if mode == self.config.player_mode {
            return;
        }
        if mode == PlayerMode::Slides && self.slides.deck.is_empty() {
            self.show_notice("Import a presentation to use slides mode");
            return;
        }
        self.bump_generation();
        if self.playback.clock.is_active() {
            self.stop_playback(effects);
        }
        self.config.player_mode = mode;
        info!(%mode, "Switched player mode");
        match mode {
            PlayerMode::Slides => self.on_slide_changed(effects),
            PlayerMode::Text => {
                let text = self.editor_text();
                self.apply_script_text(&text, effects);
            }
        }
        effects.push(Effect::SaveConfig);
    }

    pub(super) fn handle_slide_display_changed(
        &mut self,
        display: SlideDisplay,
        effects: &mut Vec<Effect>,
    ) {
        if display == self.config.slide_display {
            return;
        }
        self.config.slide_display = display;
        if !self.scroll_enabled() {
            self.bump_generation();
            if self.playback.clock.is_active() || self.cue_countdown().is_some() {
                self.stop_playback(effects);
            }
        }
        debug!(display = %self.config.slide_display, "Switched slide display");
        effects.push(Effect::SaveConfig);
    }

    pub(super) fn handle_next_slide(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_slides_mode() {
            return;
        }
        self.bump_generation();
        if self.slides.deck.next() {
            self.on_slide_changed(effects);
        }
    }

    pub(super) fn handle_previous_slide(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_slides_mode() {
            return;
        }
        self.bump_generation();
        if self.slides.deck.previous() {
            self.on_slide_changed(effects);
        }
    }

    pub(super) fn handle_go_to_slide(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if !self.is_slides_mode() {
            return;
        }
        self.bump_generation();
        if self.slides.deck.select(index) {
            self.on_slide_changed(effects);
        }
    }

    pub(super) fn handle_slide_image_loaded(
        &mut self,
        deck_version: u64,
        index: usize,
        bytes: Option<Vec<u8>>,
    ) {
        if deck_version != self.slides.deck_version {
            return;
        }
        if let Some(bytes) = bytes {
            self.slides
                .images
                .insert(index, image::Handle::from_bytes(bytes));
        }
    }

    /// Swap in a freshly imported deck and request every slide image.
    pub(super) fn install_deck(&mut self, slides: Vec<Slide>, effects: &mut Vec<Effect>) {
        self.slides.deck = SlideDeck::new(slides);
        self.slides.deck_version += 1;
        self.slides.images.clear();
        let deck_version = self.slides.deck_version;
        for (index, url) in self
            .slides
            .deck
            .slides()
            .iter()
            .map(|slide| slide.image_url.clone())
            .enumerate()
        {
            if !url.is_empty() {
                effects.push(Effect::FetchSlideImage {
                    deck_version,
                    index,
                    url,
                });
            }
        }
    }

    /// Speaker notes of the active slide become the script.
    pub(super) fn on_slide_changed(&mut self, effects: &mut Vec<Effect>) {
        let index = self.slides.deck.current_index();
        let notes = self
            .slides
            .deck
            .current()
            .map(|slide| slide.speaker_notes.clone())
            .unwrap_or_default();
        self.apply_script_text(&notes, effects);
        info!(slide = index + 1, total = self.slides.deck.len(), "Showing slide");
        effects.push(Effect::Publish(MirrorEvent::SlideChange { new_index: index }));
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::test_support::{build_test_app, published};
    use super::*;
    use crate::slides::SlideVideo;

    fn deck() -> Vec<Slide> {
        vec![
            Slide {
                image_url: "https://example.invalid/1.png".to_string(),
                speaker_notes: "first slide notes".to_string(),
                videos: Vec::new(),
            },
            Slide {
                image_url: String::new(),
                speaker_notes: "watch this [PLAY VIDEO 1] then continue".to_string(),
                videos: vec![SlideVideo { duration_secs: 12 }],
            },
        ]
    }

    fn slides_app() -> App {
        let mut app = build_test_app("text script");
        let mut effects = Vec::new();
        app.install_deck(deck(), &mut effects);
        app.reduce(Message::PlayerModeChanged(PlayerMode::Slides));
        app
    }

    #[test]
    fn slides_mode_requires_a_deck() {
        let mut app = build_test_app("text script");
        app.reduce(Message::PlayerModeChanged(PlayerMode::Slides));
        assert_eq!(app.config.player_mode, PlayerMode::Text);
        assert!(app.ui.notice.is_some());
    }

    #[test]
    fn install_deck_fetches_images_with_urls() {
        let mut app = build_test_app("text script");
        let mut effects = Vec::new();
        app.install_deck(deck(), &mut effects);
        let fetches: Vec<usize> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::FetchSlideImage { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(fetches, [0]);
    }

    #[test]
    fn next_slide_loads_notes_and_video_cues() {
        let mut app = slides_app();
        assert_eq!(app.playback.script.text(), "first slide notes");

        let effects = app.reduce(Message::NextSlide);
        assert_eq!(app.slides.deck.current_index(), 1);
        assert_eq!(app.playback.cues.len(), 1);
        assert_eq!(app.playback.cues[0].duration_secs(), 12);
        assert!(
            published(&effects)
                .iter()
                .any(|e| matches!(e, MirrorEvent::SlideChange { new_index: 1 }))
        );
        assert!(effects.iter().any(|e| matches!(e, Effect::ScrollTo(y) if *y == 0.0)));

        let effects = app.reduce(Message::NextSlide);
        assert!(published(&effects).is_empty());
    }

    #[test]
    fn slide_display_disables_playback() {
        let mut app = slides_app();
        app.reduce(Message::TogglePlayPause);
        assert!(app.playback.clock.is_running());

        app.reduce(Message::SlideDisplayChanged(SlideDisplay::Slide));
        assert!(!app.playback.clock.is_active());
        assert!(app.play_disabled());
        app.reduce(Message::TogglePlayPause);
        assert!(!app.playback.clock.is_active());
    }

    #[test]
    fn notes_end_advances_to_next_slide() {
        let mut app = slides_app();
        app.reduce(Message::TogglePlayPause);
        let start = std::time::Instant::now();
        app.reduce(Message::Frame(start));
        let effects = app.reduce(Message::Frame(start + std::time::Duration::from_secs(600)));
        assert_eq!(app.slides.deck.current_index(), 1);
        assert!(app.playback.clock.is_running());
        assert!(
            published(&effects)
                .iter()
                .any(|e| matches!(e, MirrorEvent::SlideChange { new_index: 1 }))
        );
    }

    #[test]
    fn stale_slide_images_are_ignored() {
        let mut app = slides_app();
        app.reduce(Message::SlideImageLoaded {
            deck_version: app.slides.deck_version - 1,
            index: 0,
            bytes: Some(vec![1, 2, 3]),
        });
        assert!(app.slides.images.is_empty());
        app.reduce(Message::SlideImageLoaded {
            deck_version: app.slides.deck_version,
            index: 0,
            bytes: Some(vec![1, 2, 3]),
        });
        assert!(app.slides.images.contains_key(&0));
    }
}
