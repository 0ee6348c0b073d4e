//! Cue extraction and trigger bookkeeping.
//!
//! Cues are positioned by the number of real words that precede them. The
//! tracker remembers which cue positions already fired for the current script
//! and slide; the owner must call [`CueTracker::reset`] when either changes.

use crate::script::Segment;
use crate::slides::SlideVideo;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// How far ahead of the speaker a cue is announced.
pub const CUE_LOOKAHEAD_WORDS: usize = 10;
pub const UPCOMING_INDICATOR_LIFETIME: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Pause { seconds: u32 },
    Video { number: u32, duration_secs: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub word_index: usize,
    pub kind: CueKind,
}

impl Cue {
    pub fn duration_secs(&self) -> u32 {
        match self.kind {
            CueKind::Pause { seconds } => seconds,
            CueKind::Video { duration_secs, .. } => duration_secs,
        }
    }

    pub fn label(&self) -> String {
        match self.kind {
            CueKind::Pause { seconds } => format!("Pause {seconds}s"),
            CueKind::Video { number, duration_secs } => {
                format!("Video {number} ({duration_secs}s)")
            }
        }
    }
}

/// Build the cue list for a tokenized script.
///
/// `videos` is the video list of the active slide; pass `None` outside slides
/// mode. Video directives with no matching video are dropped.
pub fn extract_cues(segments: &[Segment], videos: Option<&[SlideVideo]>) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut words = 0usize;

    for segment in segments {
        match segment {
            Segment::Text(plain) => words += plain.split_whitespace().count(),
            Segment::Pause { seconds } => cues.push(Cue {
                word_index: words,
                kind: CueKind::Pause { seconds: *seconds },
            }),
            Segment::Video { number } => {
                let video = videos.and_then(|videos| {
                    let idx = (*number as usize).checked_sub(1)?;
                    videos.get(idx)
                });
                if let Some(video) = video {
                    cues.push(Cue {
                        word_index: words,
                        kind: CueKind::Video {
                            number: *number,
                            duration_secs: video.duration_secs,
                        },
                    });
                }
            }
        }
    }

    cues
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UpcomingCue {
    word_index: usize,
    shown_at: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CueEvaluation {
    pub upcoming: Option<usize>,
    pub fire: Option<Cue>,
}

#[derive(Debug, Default)]
pub struct CueTracker {
    triggered: BTreeSet<usize>,
    upcoming: Option<UpcomingCue>,
}

impl CueTracker {
    /// Compare the tracked reading position against the cue list.
    ///
    /// At most one cue fires per call; it is recorded as triggered before
    /// returning so it can never fire twice for the same script.
    pub fn evaluate(&mut self, cues: &[Cue], last_spoken: usize, now: Instant) -> CueEvaluation {
        let next = cues
            .iter()
            .find(|cue| cue.word_index > last_spoken && !self.triggered.contains(&cue.word_index));
        if let Some(cue) = next {
            if cue.word_index - last_spoken <= CUE_LOOKAHEAD_WORDS {
                self.upcoming = Some(UpcomingCue {
                    word_index: cue.word_index,
                    shown_at: now,
                });
            }
        }

        let fire = cues
            .iter()
            .find(|cue| cue.word_index <= last_spoken && !self.triggered.contains(&cue.word_index))
            .copied();
        if let Some(cue) = fire {
            self.triggered.insert(cue.word_index);
            if self.upcoming.map(|up| up.word_index) == Some(cue.word_index) {
                self.upcoming = None;
            }
        }

        CueEvaluation {
            upcoming: self.upcoming(),
            fire,
        }
    }

    pub fn upcoming(&self) -> Option<usize> {
        self.upcoming.map(|up| up.word_index)
    }

    /// Drop the upcoming indicator once it has been visible long enough.
    pub fn expire_upcoming(&mut self, now: Instant) -> bool {
        match self.upcoming {
            Some(up) if now.duration_since(up.shown_at) >= UPCOMING_INDICATOR_LIFETIME => {
                self.upcoming = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_triggered(&self, word_index: usize) -> bool {
        self.triggered.contains(&word_index)
    }

    pub fn reset(&mut self) {
        self.triggered.clear();
        self.upcoming = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::tokenize;

    #[test]
    fn pause_cue_is_positioned_after_preceding_words() {
        let cues = extract_cues(&tokenize("one two three [PAUSE 2 SECONDS] four five"), None);
        assert_eq!(
            cues,
            vec![Cue {
                word_index: 3,
                kind: CueKind::Pause { seconds: 2 },
            }]
        );
    }

    #[test]
    fn video_cues_need_a_matching_slide_video() {
        let segments = tokenize("intro [PLAY VIDEO 1] middle [PLAY VIDEO 2] end");
        assert!(extract_cues(&segments, None).is_empty());

        let videos = vec![SlideVideo { duration_secs: 12 }];
        let cues = extract_cues(&segments, Some(&videos));
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].word_index, 1);
        assert_eq!(cues[0].duration_secs(), 12);
    }

    #[test]
    fn cue_indices_are_ordered_and_extraction_is_idempotent() {
        let text = "a [PAUSE 1 SECONDS] [PAUSE 2 SECONDS] b c d [PAUSE 3 SECONDS] e";
        let first = extract_cues(&tokenize(text), None);
        let second = extract_cues(&tokenize(text), None);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|pair| pair[0].word_index <= pair[1].word_index));
        assert_eq!(
            first.iter().map(|cue| cue.word_index).collect::<Vec<_>>(),
            vec![1, 1, 4]
        );
    }

    #[test]
    fn cue_is_announced_then_fires_once() {
        let cues = extract_cues(&tokenize("one two three [PAUSE 2 SECONDS] four five"), None);
        let mut tracker = CueTracker::default();
        let now = Instant::now();

        let early = tracker.evaluate(&cues, 2, now);
        assert_eq!(early.upcoming, Some(3));
        assert!(early.fire.is_none());

        let reached = tracker.evaluate(&cues, 3, now);
        assert_eq!(reached.fire.map(|cue| cue.duration_secs()), Some(2));
        assert_eq!(reached.upcoming, None);

        let again = tracker.evaluate(&cues, 4, now);
        assert!(again.fire.is_none());
        assert!(tracker.is_triggered(3));
    }

    #[test]
    fn reset_allows_cues_to_fire_again() {
        let cues = extract_cues(&tokenize("a b [PAUSE 1 SECONDS] c"), None);
        let mut tracker = CueTracker::default();
        let now = Instant::now();
        assert!(tracker.evaluate(&cues, 2, now).fire.is_some());
        tracker.reset();
        assert!(tracker.evaluate(&cues, 2, now).fire.is_some());
    }

    #[test]
    fn far_cues_are_not_announced_and_indicator_expires() {
        let text = format!("{} [PAUSE 1 SECONDS]", vec!["w"; 20].join(" "));
        let cues = extract_cues(&tokenize(&text), None);
        let mut tracker = CueTracker::default();
        let start = Instant::now();

        assert_eq!(tracker.evaluate(&cues, 5, start).upcoming, None);
        assert_eq!(tracker.evaluate(&cues, 12, start).upcoming, Some(20));
        assert!(!tracker.expire_upcoming(start + Duration::from_millis(500)));
        assert!(tracker.expire_upcoming(start + UPCOMING_INDICATOR_LIFETIME));
        assert_eq!(tracker.upcoming(), None);
    }
}
