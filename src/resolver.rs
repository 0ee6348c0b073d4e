//! Turns one audio clip plus player context into a command or a position.
//!
//! [`SpeechResolver`] is the seam the reducer talks to; [`GeminiResolver`] is
//! the production implementation.

use crate::cancellation::CancellationToken;
use crate::capture::AudioClip;
use crate::config::AppConfig;
use crate::error::PrompterError;
use crate::gemini::{GeminiClient, InlineData, Part, strip_code_fence};
use crate::slides::PlayerMode;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub is_playing: bool,
    pub mode: PlayerMode,
    pub total_slides: usize,
    pub current_slide: usize,
}

#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub request_id: u64,
    pub generation: u64,
    pub clip: AudioClip,
    pub script_text: String,
    pub scroll_speed: f32,
    pub player: PlayerSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NextSlide,
    PreviousSlide,
    /// 1-based slide number as spoken.
    GoToSlide(i64),
    StopScrolling,
    StartScrolling,
    Rewind,
    GoToText(usize),
    Track {
        last_spoken_word: Option<usize>,
        speed: f32,
    },
}

impl Resolution {
    pub fn command_name(&self) -> &'static str {
        match self {
            Resolution::NextSlide => "next_slide",
            Resolution::PreviousSlide => "previous_slide",
            Resolution::GoToSlide(_) => "go_to_slide",
            Resolution::StopScrolling => "stop_scrolling",
            Resolution::StartScrolling => "start_scrolling",
            Resolution::Rewind => "rewind",
            Resolution::GoToText(_) => "go_to_text",
            Resolution::Track { .. } => "no_op",
        }
    }
}

pub trait SpeechResolver: Send + Sync {
    fn resolve(
        &self,
        request: &ResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<Resolution, PrompterError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireCommand {
    NextSlide,
    PreviousSlide,
    GoToSlide,
    StopScrolling,
    StartScrolling,
    Rewind,
    GoToText,
    NoOp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResolution {
    command: WireCommand,
    #[serde(default)]
    slide_number: Option<f64>,
    #[serde(default)]
    target_word_index: Option<f64>,
    #[serde(default)]
    last_spoken_word_index: Option<f64>,
    #[serde(default)]
    adjusted_scroll_speed: Option<f64>,
}

fn as_index(value: Option<f64>) -> Option<usize> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as usize)
}

/// Parse the model's JSON answer.
///
/// Commands missing their argument degrade to a tracking result that keeps
/// the current speed and position.
pub fn parse_resolution(raw: &str, current_speed: f32) -> Result<Resolution, PrompterError> {
    let wire: WireResolution = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| PrompterError::Inference(format!("unexpected resolver output: {err}")))?;
    let hold = Resolution::Track {
        last_spoken_word: None,
        speed: current_speed,
    };

    let resolution = match wire.command {
        WireCommand::NextSlide => Resolution::NextSlide,
        WireCommand::PreviousSlide => Resolution::PreviousSlide,
        WireCommand::GoToSlide => match wire.slide_number.filter(|n| n.is_finite()) {
            Some(number) => Resolution::GoToSlide(number.round() as i64),
            None => hold,
        },
        WireCommand::StopScrolling => Resolution::StopScrolling,
        WireCommand::StartScrolling => Resolution::StartScrolling,
        WireCommand::Rewind => Resolution::Rewind,
        WireCommand::GoToText => match as_index(wire.target_word_index) {
            Some(index) => Resolution::GoToText(index),
            None => hold,
        },
        WireCommand::NoOp => Resolution::Track {
            last_spoken_word: as_index(wire.last_spoken_word_index),
            speed: wire
                .adjusted_scroll_speed
                .filter(|s| s.is_finite())
                .map(|s| (s as f32).clamp(0.0, 100.0))
                .unwrap_or(current_speed),
        },
    };
    Ok(resolution)
}

pub struct GeminiResolver {
    client: GeminiClient,
}

impl GeminiResolver {
    pub fn from_config(config: &AppConfig) -> Result<Self, PrompterError> {
        Ok(Self {
            client: GeminiClient::from_config(config)?,
        })
    }
}

impl SpeechResolver for GeminiResolver {
    fn resolve(
        &self,
        request: &ResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<Resolution, PrompterError> {
        let audio = InlineData::from_data_uri(&request.clip.data_uri)
            .ok_or_else(|| PrompterError::Inference("clip is not a base64 data URI".into()))?;
        let parts = [
            Part::Text(build_prompt(request)),
            Part::InlineData(audio),
        ];
        let raw = self.client.generate(&parts, true, cancel)?;
        let resolution = parse_resolution(&raw, request.scroll_speed)?;
        debug!(
            request_id = request.request_id,
            command = resolution.command_name(),
            "Resolver answered"
        );
        Ok(resolution)
    }
}

fn build_prompt(request: &ResolveRequest) -> String {
    let mode = match request.player.mode {
        PlayerMode::Text => "text",
        PlayerMode::Slides => "slides",
    };
    format!(
        r#"You control a teleprompter by listening to a short audio clip of the presenter.
Commands take precedence over reading.

1. Commands. Map what you hear to exactly one of:
- "next slide" -> next_slide
- "previous slide" -> previous_slide
- "go to slide N" -> go_to_slide with slideNumber N
- "stop" / "pause" -> stop_scrolling
- "start" / "play" / "go" -> start_scrolling
- "rewind" / "go to the top" / "start over" -> rewind
- "go to <phrase>" / "find <phrase>" -> go_to_text with targetWordIndex set to the
  zero-based index of the first word of the first occurrence of the phrase in the script

2. Otherwise the presenter is reading. Use command no_op, transcribe the clip, align it to
the script, set lastSpokenWordIndex to the zero-based index of the last spoken script word,
and set adjustedScrollSpeed (0-100, same scale as the current speed) to match their pace.
Words are whitespace separated; bracketed directives like [PAUSE 2 SECONDS] are not words.

Answer with JSON only:
{{"command": "...", "slideNumber": number|null, "targetWordIndex": number|null,
 "lastSpokenWordIndex": number|null, "adjustedScrollSpeed": number|null}}

Current state:
- Scroll speed: {speed}
- Playing: {playing}
- Mode: {mode}
- Total slides: {total}
- Current slide: {current}

Script:
"""{script}""""#,
        speed = request.scroll_speed,
        playing = request.player.is_playing,
        total = request.player.total_slides,
        current = request.player.current_slide + 1,
        script = request.script_text,
    )
}
