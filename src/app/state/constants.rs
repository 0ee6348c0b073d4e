use crate::slides::{PlayerMode, SlideDisplay};
use iced::widget::scrollable::Id as ScrollId;
use once_cell::sync::Lazy;
use std::time::Duration;

pub(crate) static SCRIPT_SCROLL_ID: Lazy<ScrollId> = Lazy::new(|| ScrollId::new("script-scroll"));

/// How long a notification line stays up.
pub(crate) const NOTICE_LIFETIME: Duration = Duration::from_secs(6);
pub(crate) const CAPTURE_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub(crate) const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub(crate) const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) const MIN_WINDOW_WIDTH: f32 = 480.0;
pub(crate) const MIN_WINDOW_HEIGHT: f32 = 320.0;
pub(crate) const MAX_WINDOW_WIDTH: f32 = 7680.0;
pub(crate) const MAX_WINDOW_HEIGHT: f32 = 4320.0;

/// Words within this distance of the end of the notes count as "finished".
pub(crate) const NOTES_END_SLACK_WORDS: usize = 2;

pub(crate) const PLAYER_MODES: [PlayerMode; 2] = [PlayerMode::Text, PlayerMode::Slides];
pub(crate) const SLIDE_DISPLAYS: [SlideDisplay; 2] = [SlideDisplay::Notes, SlideDisplay::Slide];
