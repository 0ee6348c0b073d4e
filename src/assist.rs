//! AI-assisted script edits scoped to a selection or the whole script.

use crate::cancellation::CancellationToken;
use crate::error::PrompterError;
use crate::gemini::{GeminiClient, Part, strip_code_fence};
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistCommand {
    Rewrite,
    FixGrammar,
    Shorten,
    Cleanup,
}

impl AssistCommand {
    pub const ALL: [AssistCommand; 4] = [
        AssistCommand::Rewrite,
        AssistCommand::FixGrammar,
        AssistCommand::Shorten,
        AssistCommand::Cleanup,
    ];

    /// `Cleanup` always applies to the whole script.
    pub fn is_whole_script(self) -> bool {
        matches!(self, AssistCommand::Cleanup)
    }

    fn instruction(self) -> &'static str {
        match self {
            AssistCommand::Rewrite => {
                "Rewrite the text to be clear, concise and engaging when read aloud."
            }
            AssistCommand::FixGrammar => "Correct any spelling and grammar mistakes in the text.",
            AssistCommand::Shorten => "Shorten the text while keeping its meaning and tone.",
            AssistCommand::Cleanup => {
                "Format the script for reading on a teleprompter: fix line breaks, punctuation \
                 and spacing without changing the wording. Keep bracketed directives such as \
                 [PAUSE 2 SECONDS] and [PLAY VIDEO 1] exactly as they are."
            }
        }
    }
}

impl fmt::Display for AssistCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssistCommand::Rewrite => "Rewrite",
            AssistCommand::FixGrammar => "Fix grammar",
            AssistCommand::Shorten => "Shorten",
            AssistCommand::Cleanup => "Clean up script",
        };
        write!(f, "{label}")
    }
}

/// The text an assist command operates on, as a byte range of the script.
pub fn target_range(
    command: AssistCommand,
    script: &str,
    selection: Option<Range<usize>>,
) -> Result<Range<usize>, PrompterError> {
    if script.trim().is_empty() {
        return Err(PrompterError::Validation("the script is empty".to_string()));
    }
    if command.is_whole_script() {
        return Ok(0..script.len());
    }
    match selection {
        Some(range)
            if range.start < range.end
                && range.end <= script.len()
                && script.is_char_boundary(range.start)
                && script.is_char_boundary(range.end)
                && !script[range.clone()].trim().is_empty() =>
        {
            Ok(range)
        }
        _ => Err(PrompterError::Validation(
            "select some text first".to_string(),
        )),
    }
}

/// Locate selected text in the script. The editor reports the selection as
/// text plus a cursor, so prefer the occurrence touching the cursor.
pub fn selection_range(script: &str, selected: &str, cursor: usize) -> Option<Range<usize>> {
    if selected.is_empty() {
        return None;
    }
    let mut first = None;
    for (start, _) in script.match_indices(selected) {
        let range = start..start + selected.len();
        if range.start == cursor || range.end == cursor {
            return Some(range);
        }
        first.get_or_insert(range);
    }
    first
}

/// Replace `range` of `script` with `replacement`.
pub fn splice(script: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(script.len() + replacement.len());
    out.push_str(&script[..range.start]);
    out.push_str(replacement);
    out.push_str(&script[range.end..]);
    out
}

pub fn run(
    client: &GeminiClient,
    command: AssistCommand,
    text: &str,
    cancel: &CancellationToken,
) -> Result<String, PrompterError> {
    let prompt = format!(
        "You are an expert script writing assistant. {}\n\
         Return only the modified text with no commentary or quotation marks.\n\n\
         Text:\n{text}",
        command.instruction()
    );
    let output = client.generate(&[Part::Text(prompt)], false, cancel)?;
    Ok(strip_code_fence(&output).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_commands_need_a_selection() {
        let script = "Hello there everyone";
        let err = target_range(AssistCommand::Rewrite, script, None).expect_err("no selection");
        assert!(matches!(err, PrompterError::Validation(_)));
        assert_eq!(
            target_range(AssistCommand::Shorten, script, Some(6..11)).expect("valid"),
            6..11
        );
        assert!(target_range(AssistCommand::Shorten, script, Some(5..6)).is_err());
    }

    #[test]
    fn cleanup_targets_whole_script_but_not_an_empty_one() {
        assert_eq!(
            target_range(AssistCommand::Cleanup, "abc", None).expect("valid"),
            0..3
        );
        assert!(target_range(AssistCommand::Cleanup, "  \n", None).is_err());
    }

    #[test]
    fn selection_prefers_occurrence_at_cursor() {
        let script = "go team, go team";
        assert_eq!(selection_range(script, "go team", 16), Some(9..16));
        assert_eq!(selection_range(script, "go team", 3), Some(0..7));
        assert_eq!(selection_range(script, "absent", 0), None);
    }

    #[test]
    fn splice_replaces_only_the_selection() {
        assert_eq!(
            splice("Hello there everyone", 6..11, "to"),
            "Hello to everyone"
        );
    }
}
