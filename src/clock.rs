//! Playback clock: start delay, per-frame scroll advancement and cue pauses.
//!
//! The clock is a plain state machine driven by the reducer. Frame ticks call
//! [`PlaybackClock::advance`], one-second ticks call
//! [`PlaybackClock::tick_second`]. Nothing here touches the UI.

use std::time::Instant;

pub const MIN_SPEED: f32 = 0.0;
pub const MAX_SPEED: f32 = 100.0;
pub const MAX_START_DELAY_SECS: u32 = 10;
const END_TOLERANCE_PX: f32 = 1.0;

/// Map the 0-100 speed slider to pixels per second (25 to 250).
pub fn effective_speed(slider: f32) -> f32 {
    let slider = if slider.is_finite() {
        slider.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        MIN_SPEED
    };
    2.25 * slider + 25.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    Idle,
    Delaying { remaining: u32 },
    Running,
    PausedForCue { remaining: u32, resume_after: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollGeometry {
    pub viewport_height: f32,
    pub content_height: f32,
}

impl ScrollGeometry {
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn is_known(&self) -> bool {
        self.viewport_height > 0.0 && self.content_height > 0.0
    }

    /// Content that fits entirely in the viewport never scrolls.
    pub fn is_scrollable(&self) -> bool {
        self.is_known() && self.content_height > self.viewport_height
    }

    /// Content that fits in the viewport is always at its end.
    pub fn is_at_end(&self, offset: f32) -> bool {
        self.is_known() && offset + self.viewport_height >= self.content_height - END_TOLERANCE_PX
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Not running, first frame of a run, or layout not measured yet.
    Held,
    Moved(f32),
    ReachedEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondTick {
    None,
    Countdown(u32),
    Started,
    CueCountdown(u32),
    CueFinished { resume: bool },
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    phase: ClockPhase,
    offset: f32,
    speed: f32,
    last_frame: Option<Instant>,
}

impl PlaybackClock {
    pub fn new(speed: f32) -> Self {
        Self {
            phase: ClockPhase::Idle,
            offset: 0.0,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            last_frame: None,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, ClockPhase::Running)
    }

    /// Running or counting down to run.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, ClockPhase::Running | ClockPhase::Delaying { .. })
    }

    pub fn needs_second_ticks(&self) -> bool {
        matches!(
            self.phase,
            ClockPhase::Delaying { .. } | ClockPhase::PausedForCue { .. }
        )
    }

    /// Begin playback. Zero delay goes straight to `Running`.
    pub fn start(&mut self, delay_secs: u32) -> ClockPhase {
        self.last_frame = None;
        let delay = delay_secs.min(MAX_START_DELAY_SECS);
        self.phase = if delay > 0 {
            ClockPhase::Delaying { remaining: delay }
        } else {
            ClockPhase::Running
        };
        self.phase
    }

    /// Return to `Idle`. Reports whether anything was active.
    pub fn stop(&mut self) -> bool {
        let was_active = !matches!(self.phase, ClockPhase::Idle);
        self.phase = ClockPhase::Idle;
        self.last_frame = None;
        was_active
    }

    pub fn pause_for_cue(&mut self, seconds: u32) {
        let resume_after = self.is_active();
        self.phase = ClockPhase::PausedForCue {
            remaining: seconds,
            resume_after,
        };
        self.last_frame = None;
    }

    pub fn tick_second(&mut self) -> SecondTick {
        match self.phase {
            ClockPhase::Delaying { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = ClockPhase::Running;
                    self.last_frame = None;
                    SecondTick::Started
                } else {
                    self.phase = ClockPhase::Delaying { remaining };
                    SecondTick::Countdown(remaining)
                }
            }
            ClockPhase::PausedForCue {
                remaining,
                resume_after,
            } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = ClockPhase::Idle;
                    SecondTick::CueFinished {
                        resume: resume_after,
                    }
                } else {
                    self.phase = ClockPhase::PausedForCue {
                        remaining,
                        resume_after,
                    };
                    SecondTick::CueCountdown(remaining)
                }
            }
            ClockPhase::Idle | ClockPhase::Running => SecondTick::None,
        }
    }

    /// Advance the offset for one display frame.
    ///
    /// The first frame after a (re)start only records its timestamp so a long
    /// gap since the last run never produces a jump.
    pub fn advance(&mut self, now: Instant, geometry: ScrollGeometry) -> Advance {
        if !self.is_running() {
            return Advance::Held;
        }
        let Some(previous) = self.last_frame.replace(now) else {
            return Advance::Held;
        };
        if !geometry.is_known() {
            return Advance::Held;
        }

        if geometry.is_scrollable() {
            let delta = now.saturating_duration_since(previous).as_secs_f32();
            let max = geometry.max_offset();
            self.offset = (self.offset + effective_speed(self.speed) * delta).min(max);
        }

        if geometry.is_at_end(self.offset) {
            self.phase = ClockPhase::Idle;
            self.last_frame = None;
            Advance::ReachedEnd
        } else {
            Advance::Moved(self.offset)
        }
    }

    /// Sync the offset with a scroll that did not come from the clock.
    pub fn set_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.offset = offset.max(0.0);
        }
    }

    pub fn reset_offset(&mut self) {
        self.offset = 0.0;
        self.last_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn geometry() -> ScrollGeometry {
        ScrollGeometry {
            viewport_height: 400.0,
            content_height: 2000.0,
        }
    }

    #[test]
    fn effective_speed_is_monotonic_over_the_slider_range() {
        let speeds: Vec<f32> = (0..=100).map(|s| effective_speed(s as f32)).collect();
        assert!(speeds.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(effective_speed(0.0), 25.0);
        assert_eq!(effective_speed(100.0), 250.0);
        assert_eq!(effective_speed(-5.0), 25.0);
    }

    #[test]
    fn start_delay_counts_down_then_runs() {
        let mut clock = PlaybackClock::new(10.0);
        assert_eq!(clock.start(3), ClockPhase::Delaying { remaining: 3 });
        assert_eq!(clock.tick_second(), SecondTick::Countdown(2));
        assert_eq!(clock.tick_second(), SecondTick::Countdown(1));
        assert_eq!(clock.tick_second(), SecondTick::Started);
        assert!(clock.is_running());
    }

    #[test]
    fn stopping_during_delay_never_runs() {
        let mut clock = PlaybackClock::new(10.0);
        clock.start(3);
        clock.tick_second();
        assert!(clock.stop());
        assert_eq!(clock.phase(), ClockPhase::Idle);
        assert_eq!(clock.tick_second(), SecondTick::None);
        assert_eq!(clock.advance(Instant::now(), geometry()), Advance::Held);
    }

    #[test]
    fn zero_delay_runs_immediately() {
        let mut clock = PlaybackClock::new(0.0);
        assert_eq!(clock.start(0), ClockPhase::Running);
    }

    #[test]
    fn advance_uses_elapsed_time_after_first_frame() {
        let mut clock = PlaybackClock::new(0.0);
        clock.start(0);
        let t0 = Instant::now();
        assert_eq!(clock.advance(t0, geometry()), Advance::Held);
        match clock.advance(t0 + Duration::from_secs(1), geometry()) {
            Advance::Moved(offset) => assert!((offset - 25.0).abs() < 0.01),
            other => panic!("expected movement, got {other:?}"),
        }
    }

    #[test]
    fn short_content_ends_without_scrolling() {
        let mut clock = PlaybackClock::new(50.0);
        clock.start(0);
        let short = ScrollGeometry {
            viewport_height: 400.0,
            content_height: 300.0,
        };
        let t0 = Instant::now();
        assert_eq!(clock.advance(t0, short), Advance::Held);
        assert_eq!(
            clock.advance(t0 + Duration::from_millis(16), short),
            Advance::ReachedEnd
        );
        assert_eq!(clock.offset(), 0.0);
        assert_eq!(clock.phase(), ClockPhase::Idle);
    }

    #[test]
    fn unknown_geometry_holds() {
        let mut clock = PlaybackClock::new(50.0);
        clock.start(0);
        let t0 = Instant::now();
        clock.advance(t0, ScrollGeometry::default());
        assert_eq!(
            clock.advance(t0 + Duration::from_secs(1), ScrollGeometry::default()),
            Advance::Held
        );
        assert!(clock.is_running());
    }

    #[test]
    fn reaching_the_end_stops_the_clock() {
        let mut clock = PlaybackClock::new(100.0);
        clock.start(0);
        clock.set_offset(1590.0);
        let t0 = Instant::now();
        clock.advance(t0, geometry());
        assert_eq!(
            clock.advance(t0 + Duration::from_millis(100), geometry()),
            Advance::ReachedEnd
        );
        assert_eq!(clock.phase(), ClockPhase::Idle);
        assert_eq!(clock.offset(), 1600.0);
    }

    #[test]
    fn cue_pause_remembers_whether_to_resume() {
        let mut clock = PlaybackClock::new(10.0);
        clock.start(0);
        clock.pause_for_cue(2);
        assert!(!clock.is_active());
        assert_eq!(clock.tick_second(), SecondTick::CueCountdown(1));
        assert_eq!(clock.tick_second(), SecondTick::CueFinished { resume: true });

        clock.pause_for_cue(1);
        assert_eq!(clock.tick_second(), SecondTick::CueFinished { resume: false });
    }
}
