use super::super::state::{App, InFlight, NOTES_END_SLACK_WORDS, resolver_from_config};
use super::Effect;
use crate::capture::AudioClip;
use crate::error::PrompterError;
use crate::mirror::MirrorEvent;
use crate::resolver::{Resolution, ResolveRequest};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn handle_toggle_voice_control(&mut self, effects: &mut Vec<Effect>) {
        if self.voice.enabled {
            self.disable_voice(effects);
            info!("Voice control disabled");
            return;
        }
        if self.play_disabled() {
            return;
        }
        if self.voice.resolver.is_none() {
            self.voice.resolver = resolver_from_config(&self.config);
        }
        if self.voice.resolver.is_none() {
            self.show_error(&PrompterError::Configuration(
                "set gemini_api_key in conf/config.toml to use voice control".to_string(),
            ));
            return;
        }
        self.voice.enabled = true;
        self.config.voice_control = true;
        effects.push(Effect::SaveConfig);
        info!("Voice control enabled");
    }

    fn disable_voice(&mut self, effects: &mut Vec<Effect>) {
        self.bump_generation();
        self.voice.enabled = false;
        self.config.voice_control = false;
        effects.push(Effect::SaveConfig);
    }

    /// Invalidate every resolver answer requested before now.
    pub(super) fn bump_generation(&mut self) {
        self.voice.generations.advance();
        self.voice.pending_clip = None;
    }

    pub(super) fn handle_poll_capture(&mut self, effects: &mut Vec<Effect>) {
        let clips = match self.voice.capture.as_mut() {
            Some(capture) => capture.drain(),
            None => return,
        };
        for clip in clips {
            self.handle_clip_ready(clip, effects);
        }
    }

    /// One resolver call at a time; a newer clip replaces the queued one.
    pub(super) fn handle_clip_ready(&mut self, clip: AudioClip, effects: &mut Vec<Effect>) {
        if !self.voice.enabled {
            return;
        }
        if self.voice.is_processing() {
            if self.voice.pending_clip.replace(clip).is_some() {
                debug!("Dropped queued clip in favour of a newer one");
            }
            return;
        }
        self.dispatch_clip(clip, effects);
    }

    fn dispatch_clip(&mut self, clip: AudioClip, effects: &mut Vec<Effect>) {
        let Some(resolver) = self.voice.resolver.clone() else {
            self.show_error(&PrompterError::Configuration(
                "no speech resolver is configured".to_string(),
            ));
            self.disable_voice(effects);
            return;
        };

        self.voice.next_request_id += 1;
        let cancel = self.voice.generations.token();
        let request = ResolveRequest {
            request_id: self.voice.next_request_id,
            generation: cancel.generation(),
            clip,
            script_text: self.playback.script.text().to_string(),
            scroll_speed: self.config.scroll_speed,
            player: self.player_snapshot(),
        };
        self.voice.in_flight = Some(InFlight {
            request_id: request.request_id,
        });
        debug!(
            request_id = request.request_id,
            generation = request.generation,
            "Dispatching clip to resolver"
        );
        effects.push(Effect::Resolve {
            resolver,
            request,
            cancel,
        });
    }

    fn dispatch_pending_clip(&mut self, effects: &mut Vec<Effect>) {
        if !self.voice.enabled || self.voice.is_processing() {
            return;
        }
        if let Some(clip) = self.voice.pending_clip.take() {
            self.dispatch_clip(clip, effects);
        }
    }

    pub(super) fn handle_capture_failed(&mut self, err: PrompterError, effects: &mut Vec<Effect>) {
        warn!("Voice control stopped: {err}");
        self.show_error(&err);
        self.voice.capture_requested = false;
        self.disable_voice(effects);
    }

    pub(super) fn handle_resolution_ready(
        &mut self,
        request_id: u64,
        generation: u64,
        result: Result<Resolution, PrompterError>,
        effects: &mut Vec<Effect>,
    ) {
        if self
            .voice
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.request_id == request_id)
        {
            self.voice.in_flight = None;
        }

        let stale = !self.voice.enabled
            || generation != self.voice.generations.current()
            || request_id <= self.voice.last_applied_request;
        if stale {
            debug!(request_id, generation, "Discarded stale resolution");
        } else {
            match result {
                Ok(resolution) => {
                    self.voice.last_applied_request = request_id;
                    self.apply_resolution(resolution, effects);
                }
                Err(err) => {
                    warn!(request_id, "Resolver failed: {err}");
                    self.show_error(&err);
                }
            }
        }

        self.dispatch_pending_clip(effects);
    }

    fn apply_resolution(&mut self, resolution: Resolution, effects: &mut Vec<Effect>) {
        let now = Utc::now();
        let command = resolution.command_name();
        match resolution {
            Resolution::NextSlide => {
                self.log.record(command, "N/A", now);
                if self.is_slides_mode() && self.slides.deck.next() {
                    self.on_slide_changed(effects);
                }
            }
            Resolution::PreviousSlide => {
                self.log.record(command, "N/A", now);
                if self.is_slides_mode() && self.slides.deck.previous() {
                    self.on_slide_changed(effects);
                }
            }
            Resolution::GoToSlide(number) => {
                self.log.record(command, format!("Slide {number}"), now);
                if self.is_slides_mode() && self.slides.deck.select_number(number) {
                    self.on_slide_changed(effects);
                }
            }
            Resolution::StopScrolling => {
                self.log.record(command, "N/A", now);
                if self.playback.clock.is_active() {
                    self.stop_playback(effects);
                }
            }
            Resolution::StartScrolling => {
                self.log.record(command, "N/A", now);
                if !self.play_disabled() && !self.playback.clock.is_active() {
                    self.resume_playback(effects);
                }
            }
            Resolution::Rewind => {
                self.log.record(command, "N/A", now);
                self.rewind(effects);
            }
            Resolution::GoToText(word) => {
                self.log.record(command, format!("Word index {word}"), now);
                self.log.begin_take("Jumped to text", now);
                self.playback.tracked_word = Some(word);
                self.scroll_to_word(word, effects);
            }
            Resolution::Track {
                last_spoken_word,
                speed,
            } => self.apply_tracking(last_spoken_word, speed, effects),
        }
    }

    /// Pace tracking: adopt the speaker's speed, fire cues that were reached
    /// and keep the last spoken word centred.
    fn apply_tracking(
        &mut self,
        last_spoken_word: Option<usize>,
        speed: f32,
        effects: &mut Vec<Effect>,
    ) {
        if !self.voice.enabled || !self.playback.clock.is_running() {
            return;
        }
        let word_label = last_spoken_word.map_or_else(|| "N/A".to_string(), |w| w.to_string());
        self.log.record(
            "no_op",
            format!("Pace tracking. Speed: {speed:.2}, Word Index: {word_label}"),
            Utc::now(),
        );

        if speed.is_finite() && (speed - self.config.scroll_speed).abs() > f32::EPSILON {
            self.playback.clock.set_speed(speed);
            self.config.scroll_speed = self.playback.clock.speed();
            effects.push(Effect::Publish(MirrorEvent::SettingsUpdate(
                self.mirror_settings(),
            )));
        }

        let Some(word) = last_spoken_word else {
            return;
        };
        self.playback.tracked_word = Some(word);

        let word_count = self.playback.script.word_count();
        if self.is_notes_mode() && word_count > 0 && word + NOTES_END_SLACK_WORDS >= word_count {
            if self.slides.deck.next() {
                info!(
                    slide = self.slides.deck.current_index() + 1,
                    "Speaker finished the notes; advancing slide"
                );
                self.on_slide_changed(effects);
            } else {
                info!("Speaker finished the last slide");
                self.stop_playback(effects);
            }
            return;
        }

        if self.config.cues_enabled {
            let evaluation =
                self.playback
                    .cue_tracker
                    .evaluate(&self.playback.cues, word, Instant::now());
            if let Some(cue) = evaluation.fire {
                info!(cue = %cue.label(), word, "Cue reached");
                self.playback.active_cue = Some(cue);
                self.playback.clock.pause_for_cue(cue.duration_secs());
                effects.push(Effect::Publish(MirrorEvent::Pause));
                return;
            }
        }

        self.scroll_to_word(word, effects);
    }

    /// Open the microphone exactly while voice-driven scrolling is live.
    pub(super) fn sync_capture(&mut self, effects: &mut Vec<Effect>) {
        let wants =
            self.voice.enabled && self.playback.clock.is_running() && self.scroll_enabled();
        let open = self.voice.capture.is_some();
        if wants && !open && !self.voice.capture_requested {
            self.voice.capture_requested = true;
            effects.push(Effect::StartCapture);
        } else if !wants && (open || self.voice.capture_requested) {
            self.voice.capture_requested = false;
            effects.push(Effect::StopCapture);
        }
    }
}
