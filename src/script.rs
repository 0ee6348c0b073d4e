//! Script text model.
//!
//! The raw buffer is split by a small tokenizer into plain-text runs and cue
//! directives (`[PAUSE n SECONDS]`, `[PLAY VIDEO n]`). Words are whitespace
//! separated runs of the plain text only, numbered from zero; directives never
//! count as words. Everything here is recomputed from scratch whenever the
//! text changes, so indices are deterministic for a given buffer.

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[PLAY VIDEO (\d+)\]|\[PAUSE (\d+) SECONDS\]").expect("valid directive pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Pause { seconds: u32 },
    Video { number: u32 },
}

/// Display unit used by the view and by scroll targeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Word { index: usize, text: String },
    Space(String),
    Cue,
}

#[derive(Debug, Clone, Default)]
pub struct Script {
    text: String,
    segments: Vec<Segment>,
    words: Vec<String>,
    runs: Vec<Run>,
    word_char_starts: Vec<usize>,
    total_chars: usize,
}

/// Split text into plain runs and directives, preserving document order.
///
/// Directives whose number does not fit in `u32` stay in the surrounding text.
pub fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain_start = 0usize;

    for caps in DIRECTIVE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let directive = if let Some(number) = caps.get(1) {
            number
                .as_str()
                .parse()
                .ok()
                .map(|number| Segment::Video { number })
        } else {
            caps.get(2)
                .and_then(|seconds| seconds.as_str().parse().ok())
                .map(|seconds| Segment::Pause { seconds })
        };
        let Some(directive) = directive else {
            continue;
        };

        if whole.start() > plain_start {
            segments.push(Segment::Text(text[plain_start..whole.start()].to_string()));
        }
        segments.push(directive);
        plain_start = whole.end();
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(text[plain_start..].to_string()));
    }

    segments
}

impl Script {
    pub fn parse(text: &str) -> Self {
        let segments = tokenize(text);
        let mut words = Vec::new();
        let mut runs = Vec::new();
        let mut word_char_starts = Vec::new();
        let mut chars = 0usize;

        for segment in &segments {
            match segment {
                Segment::Text(plain) => {
                    for piece in split_keeping_whitespace(plain) {
                        let len = piece.chars().count();
                        if piece.chars().all(char::is_whitespace) {
                            runs.push(Run::Space(piece.to_string()));
                        } else {
                            word_char_starts.push(chars);
                            runs.push(Run::Word {
                                index: words.len(),
                                text: piece.to_string(),
                            });
                            words.push(piece.to_string());
                        }
                        chars += len;
                    }
                }
                Segment::Pause { .. } | Segment::Video { .. } => runs.push(Run::Cue),
            }
        }

        Self {
            text: text.to_string(),
            segments,
            words,
            runs,
            word_char_starts,
            total_chars: chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Fractional position of a word's first character within the rendered
    /// text, used to estimate where the word sits vertically.
    pub fn word_fraction(&self, index: usize) -> Option<f32> {
        let start = *self.word_char_starts.get(index)?;
        if self.total_chars == 0 {
            return Some(0.0);
        }
        Some((start as f32 / self.total_chars as f32).clamp(0.0, 1.0))
    }
}

fn split_keeping_whitespace(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != is_space => {
                pieces.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_separates_directives_from_text() {
        let segments = tokenize("one two [PAUSE 2 SECONDS] three [PLAY VIDEO 1]");
        assert_eq!(
            segments,
            vec![
                Segment::Text("one two ".to_string()),
                Segment::Pause { seconds: 2 },
                Segment::Text(" three ".to_string()),
                Segment::Video { number: 1 },
            ]
        );
    }

    #[test]
    fn malformed_directives_stay_plain_text() {
        let segments = tokenize("wait [PAUSE two SECONDS] and [pause 2 seconds]");
        assert_eq!(
            segments,
            vec![Segment::Text(
                "wait [PAUSE two SECONDS] and [pause 2 seconds]".to_string()
            )]
        );
    }

    #[test]
    fn directives_are_not_counted_as_words() {
        let script = Script::parse("one two three [PAUSE 2 SECONDS] four five");
        assert_eq!(script.word_count(), 5);
        assert_eq!(script.words()[3], "four");
        assert_eq!(
            script.runs().iter().filter(|run| matches!(run, Run::Cue)).count(),
            1
        );
    }

    #[test]
    fn whitespace_runs_are_preserved_for_display() {
        let script = Script::parse("  hello\n\n world ");
        let rebuilt: String = script
            .runs()
            .iter()
            .map(|run| match run {
                Run::Word { text, .. } | Run::Space(text) => text.as_str(),
                Run::Cue => "",
            })
            .collect();
        assert_eq!(rebuilt, "  hello\n\n world ");
        assert_eq!(script.words(), &["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn word_fractions_increase_through_the_text() {
        let script = Script::parse("alpha beta gamma delta");
        let fractions: Vec<f32> = (0..4)
            .map(|idx| script.word_fraction(idx).expect("word exists"))
            .collect();
        assert_eq!(fractions[0], 0.0);
        assert!(fractions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(script.word_fraction(4).is_none());
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "a [PAUSE 1 SECONDS] b c [PLAY VIDEO 2] d";
        let first = Script::parse(text);
        let second = Script::parse(text);
        assert_eq!(first.segments(), second.segments());
        assert_eq!(first.words(), second.words());
    }
}
