//! Slide deck model shared by the importer, the cue scheduler and the view.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerMode {
    #[default]
    Text,
    Slides,
}

/// How the active slide is presented while in slides mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideDisplay {
    /// Slide image only; playback is disabled.
    Slide,
    /// Speaker notes scroll like a text script.
    #[default]
    Notes,
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerMode::Text => "Text",
            PlayerMode::Slides => "Slides",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for SlideDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SlideDisplay::Slide => "Slide",
            SlideDisplay::Notes => "Notes",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideVideo {
    pub duration_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub image_url: String,
    pub speaker_notes: String,
    pub videos: Vec<SlideVideo>,
}

#[derive(Debug, Clone, Default)]
pub struct SlideDeck {
    slides: Vec<Slide>,
    current: usize,
}

impl SlideDeck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides, current: 0 }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.slides.len()
    }

    /// Select a slide by zero-based index. Returns `false` (and leaves the
    /// deck untouched) when the index is out of range or already current.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.slides.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    /// Select a slide by its 1-based number as spoken by the presenter.
    pub fn select_number(&mut self, number: i64) -> bool {
        if number < 1 || number as usize > self.slides.len() {
            return false;
        }
        self.select(number as usize - 1)
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.select(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.select(self.current - 1)
    }
}
