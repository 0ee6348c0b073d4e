use crate::clock::{PlaybackClock, ScrollGeometry};
use crate::cues::{Cue, CueTracker};
use crate::script::Script;

/// Scroll clock plus everything derived from the current script text.
pub struct PlaybackState {
    pub(in crate::app) clock: PlaybackClock,
    pub(in crate::app) geometry: ScrollGeometry,
    pub(in crate::app) script: Script,
    pub(in crate::app) cues: Vec<Cue>,
    pub(in crate::app) cue_tracker: CueTracker,
    /// Last word the resolver reported as spoken.
    pub(in crate::app) tracked_word: Option<usize>,
    /// Cue whose countdown is running.
    pub(in crate::app) active_cue: Option<Cue>,
}

impl PlaybackState {
    pub(in crate::app) fn new(text: &str, speed: f32) -> Self {
        Self {
            clock: PlaybackClock::new(speed),
            geometry: ScrollGeometry::default(),
            script: Script::parse(text),
            cues: Vec::new(),
            cue_tracker: CueTracker::default(),
            tracked_word: None,
            active_cue: None,
        }
    }
}
