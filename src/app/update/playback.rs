use super::super::state::App;
use super::Effect;
use crate::clock::{Advance, ClockPhase, SecondTick};
use crate::mirror::MirrorEvent;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_toggle_play_pause(&mut self, effects: &mut Vec<Effect>) {
        if self.play_disabled() {
            return;
        }
        self.bump_generation();
        if self.playback.clock.is_active() {
            self.stop_playback(effects);
            self.log.record("pause", "Manual", Utc::now());
        } else {
            self.resume_playback(effects);
            self.log.record("play", "Manual", Utc::now());
        }
    }

    /// Start playback as a new take when this session has already played.
    pub(super) fn resume_playback(&mut self, effects: &mut Vec<Effect>) {
        if self.log.has_started_playback() {
            self.log.begin_take("Resumed playback", Utc::now());
        }
        self.start_playback(effects);
    }

    pub(super) fn handle_rewind(&mut self, effects: &mut Vec<Effect>) {
        self.bump_generation();
        self.rewind(effects);
    }

    /// Back to the top as a new take, resuming if the clock was running.
    pub(super) fn rewind(&mut self, effects: &mut Vec<Effect>) {
        let was_playing = self.playback.clock.is_running();
        self.stop_playback(effects);
        self.log.begin_take("Rewind", Utc::now());
        self.playback.clock.reset_offset();
        self.playback.cue_tracker.reset();
        self.playback.tracked_word = None;
        effects.push(Effect::ScrollTo(0.0));
        effects.push(Effect::Publish(MirrorEvent::Reset));
        info!(was_playing, take = self.log.take(), "Rewound script");
        if was_playing {
            self.start_playback(effects);
        }
    }

    pub(super) fn start_playback(&mut self, effects: &mut Vec<Effect>) {
        self.log.mark_playback_started(Utc::now());
        if self
            .playback
            .geometry
            .is_at_end(self.playback.clock.offset())
        {
            self.playback.clock.reset_offset();
            effects.push(Effect::ScrollTo(0.0));
            effects.push(Effect::Publish(MirrorEvent::Reset));
        }
        self.playback.active_cue = None;
        match self.playback.clock.start(self.config.start_delay_secs) {
            ClockPhase::Running => {
                info!(speed = self.playback.clock.speed(), "Playback started");
                effects.push(Effect::Publish(MirrorEvent::Play));
            }
            ClockPhase::Delaying { remaining } => {
                debug!(remaining, "Counting down before playback");
            }
            ClockPhase::Idle | ClockPhase::PausedForCue { .. } => {}
        }
    }

    /// Stop scrolling and cancel any start delay or cue countdown.
    pub(super) fn stop_playback(&mut self, effects: &mut Vec<Effect>) {
        self.playback.clock.stop();
        self.playback.active_cue = None;
        effects.push(Effect::Publish(MirrorEvent::Pause));
    }

    pub(super) fn handle_frame(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if !self.scroll_enabled() {
            return;
        }
        match self.playback.clock.advance(now, self.playback.geometry) {
            Advance::Held => {}
            Advance::Moved(offset) => effects.push(Effect::ScrollTo(offset)),
            Advance::ReachedEnd => self.handle_reached_end(effects),
        }
    }

    fn handle_reached_end(&mut self, effects: &mut Vec<Effect>) {
        effects.push(Effect::ScrollTo(self.playback.geometry.max_offset()));
        if self.is_notes_mode() && self.slides.deck.next() {
            info!(
                slide = self.slides.deck.current_index() + 1,
                "End of notes; advancing slide"
            );
            self.on_slide_changed(effects);
            self.playback.clock.start(0);
        } else {
            info!("Reached end of script");
            effects.push(Effect::Publish(MirrorEvent::Pause));
        }
    }

    pub(super) fn handle_second_tick(&mut self, effects: &mut Vec<Effect>) {
        match self.playback.clock.tick_second() {
            SecondTick::None => {}
            SecondTick::Countdown(remaining) => debug!(remaining, "Start countdown"),
            SecondTick::Started => {
                info!(speed = self.playback.clock.speed(), "Playback started");
                effects.push(Effect::Publish(MirrorEvent::Play));
            }
            SecondTick::CueCountdown(remaining) => debug!(remaining, "Cue countdown"),
            SecondTick::CueFinished { resume } => {
                self.playback.active_cue = None;
                debug!(resume, "Cue finished");
                if resume {
                    self.start_playback(effects);
                }
            }
        }
    }

    /// Centre `word` in the viewport and tell the mirror about it.
    pub(super) fn scroll_to_word(&mut self, word: usize, effects: &mut Vec<Effect>) {
        if let Some(target) = self.word_scroll_target(word) {
            self.playback.clock.set_offset(target);
            effects.push(Effect::ScrollTo(target));
        }
        effects.push(Effect::Publish(MirrorEvent::ScrollToWord { word_index: word }));
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::test_support::{build_test_app, build_test_app_with, published, test_config};
    use super::*;
    use crate::command_log::NEW_TAKE;
    use std::time::Duration;

    #[test]
    fn start_delay_counts_down_before_running() {
        let mut config = test_config();
        config.start_delay_secs = 3;
        let mut app = build_test_app_with("one two three", config);

        let effects = app.reduce(Message::TogglePlayPause);
        assert_eq!(
            app.playback.clock.phase(),
            ClockPhase::Delaying { remaining: 3 }
        );
        assert!(published(&effects).is_empty());

        app.reduce(Message::SecondTick(Instant::now()));
        assert_eq!(
            app.playback.clock.phase(),
            ClockPhase::Delaying { remaining: 2 }
        );
        app.reduce(Message::SecondTick(Instant::now()));
        assert_eq!(
            app.playback.clock.phase(),
            ClockPhase::Delaying { remaining: 1 }
        );
        let effects = app.reduce(Message::SecondTick(Instant::now()));
        assert_eq!(app.playback.clock.phase(), ClockPhase::Running);
        assert!(matches!(published(&effects)[..], [MirrorEvent::Play]));
    }

    #[test]
    fn pausing_during_delay_returns_to_idle() {
        let mut config = test_config();
        config.start_delay_secs = 3;
        let mut app = build_test_app_with("one two three", config);

        app.reduce(Message::TogglePlayPause);
        app.reduce(Message::SecondTick(Instant::now()));
        let effects = app.reduce(Message::TogglePlayPause);
        assert_eq!(app.playback.clock.phase(), ClockPhase::Idle);
        assert!(matches!(published(&effects)[..], [MirrorEvent::Pause]));

        for _ in 0..5 {
            app.reduce(Message::SecondTick(Instant::now()));
        }
        assert_eq!(app.playback.clock.phase(), ClockPhase::Idle);
    }

    #[test]
    fn frames_scroll_and_stop_at_end() {
        let mut app = build_test_app("one two three");
        app.reduce(Message::TogglePlayPause);
        let start = Instant::now();

        assert!(app.reduce(Message::Frame(start)).is_empty());
        let effects = app.reduce(Message::Frame(start + Duration::from_secs(1)));
        let expected = crate::clock::effective_speed(app.config.scroll_speed);
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::ScrollTo(y) if (*y - expected).abs() < 0.01))
        );

        let effects = app.reduce(Message::Frame(start + Duration::from_secs(600)));
        assert_eq!(app.playback.clock.phase(), ClockPhase::Idle);
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::ScrollTo(y) if *y == 1600.0))
        );
        assert!(matches!(published(&effects)[..], [MirrorEvent::Pause]));
    }

    #[test]
    fn script_shorter_than_viewport_stops_on_next_frame() {
        let mut app = build_test_app("one two");
        app.playback.geometry.viewport_height = 400.0;
        app.playback.geometry.content_height = 300.0;
        app.reduce(Message::TogglePlayPause);
        assert_eq!(app.playback.clock.phase(), ClockPhase::Running);

        let start = Instant::now();
        assert!(app.reduce(Message::Frame(start)).is_empty());
        let effects = app.reduce(Message::Frame(start + Duration::from_millis(16)));
        assert_eq!(app.playback.clock.phase(), ClockPhase::Idle);
        assert_eq!(app.playback.clock.offset(), 0.0);
        assert!(matches!(published(&effects)[..], [MirrorEvent::Pause]));
    }

    #[test]
    fn playing_from_the_end_starts_over() {
        let mut app = build_test_app("one two three");
        app.playback.clock.set_offset(1600.0);
        let effects = app.reduce(Message::TogglePlayPause);
        assert_eq!(app.playback.clock.offset(), 0.0);
        assert!(matches!(
            published(&effects)[..],
            [MirrorEvent::Reset, MirrorEvent::Play]
        ));
    }

    #[test]
    fn takes_advance_on_resume_and_rewind() {
        let mut app = build_test_app("one two three");
        app.log.enable();

        app.reduce(Message::TogglePlayPause);
        assert_eq!(app.log.take(), 1);
        app.reduce(Message::TogglePlayPause);
        app.reduce(Message::TogglePlayPause);
        assert_eq!(app.log.take(), 2);
        let effects = app.reduce(Message::Rewind);
        assert_eq!(app.log.take(), 3);
        assert_eq!(app.playback.clock.phase(), ClockPhase::Running);
        assert!(
            published(&effects)
                .iter()
                .any(|e| matches!(e, MirrorEvent::Reset))
        );

        let details: Vec<&str> = app
            .log
            .entries()
            .iter()
            .filter(|entry| entry.command == NEW_TAKE)
            .map(|entry| entry.details.as_str())
            .collect();
        assert_eq!(
            details,
            [
                "Playback started (Take 1)",
                "Resumed playback (Take 2)",
                "Rewind (Take 3)"
            ]
        );
    }

    #[test]
    fn rewind_while_idle_stays_idle() {
        let mut app = build_test_app("one two three");
        app.playback.clock.set_offset(300.0);
        app.reduce(Message::Rewind);
        assert_eq!(app.playback.clock.phase(), ClockPhase::Idle);
        assert_eq!(app.playback.clock.offset(), 0.0);
    }
}
