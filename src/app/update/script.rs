use super::super::state::App;
use super::Effect;
use crate::assist::{self, AssistCommand};
use crate::error::PrompterError;
use crate::mirror::MirrorEvent;
use crate::script::Script;
use iced::widget::text_editor;
use std::ops::Range;
use tracing::{debug, info, warn};

impl App {
    /// Editor contents without the trailing newline the widget appends.
    pub(super) fn editor_text(&self) -> String {
        let mut text = self.ui.editor.text();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    pub(super) fn handle_script_edited(
        &mut self,
        action: text_editor::Action,
        effects: &mut Vec<Effect>,
    ) {
        let is_edit = action.is_edit();
        self.ui.editor.perform(action);
        if is_edit && !self.is_slides_mode() {
            self.bump_generation();
            let text = self.editor_text();
            self.apply_script_text(&text, effects);
        }
    }

    /// Replace the editable script, e.g. after an import or an assist edit.
    pub(super) fn replace_script(&mut self, text: &str, effects: &mut Vec<Effect>) {
        self.ui.editor = text_editor::Content::with_text(text);
        if !self.is_slides_mode() {
            self.bump_generation();
            self.apply_script_text(text, effects);
        }
    }

    /// Make `text` the script being prompted. Scrolling restarts from the top
    /// and every cue becomes eligible again.
    pub(super) fn apply_script_text(&mut self, text: &str, effects: &mut Vec<Effect>) {
        self.playback.script = Script::parse(text);
        self.rebuild_cues();
        self.playback.tracked_word = None;
        self.playback.clock.reset_offset();
        effects.push(Effect::ScrollTo(0.0));
        effects.push(Effect::Publish(MirrorEvent::SettingsUpdate(
            self.mirror_settings(),
        )));
        debug!(
            words = self.playback.script.word_count(),
            cues = self.playback.cues.len(),
            "Script updated"
        );
    }

    /// Byte offset of the editor cursor within `text`.
    fn cursor_byte_offset(&self, text: &str) -> usize {
        let (line, column) = self.ui.editor.cursor_position();
        let mut offset = 0;
        for (index, content) in text.split('\n').enumerate() {
            if index == line {
                return offset
                    + content
                        .char_indices()
                        .nth(column)
                        .map_or(content.len(), |(byte, _)| byte);
            }
            offset += content.len() + 1;
        }
        text.len()
    }

    pub(super) fn handle_assist(&mut self, command: AssistCommand, effects: &mut Vec<Effect>) {
        if self.ui.assist_busy {
            return;
        }
        let script = self.editor_text();
        let selection = self.ui.editor.selection().and_then(|selected| {
            assist::selection_range(&script, &selected, self.cursor_byte_offset(&script))
        });
        let range = match assist::target_range(command, &script, selection) {
            Ok(range) => range,
            Err(err) => {
                self.show_error(&err);
                return;
            }
        };
        info!(%command, bytes = range.len(), "Running script assist");
        self.ui.assist_busy = true;
        effects.push(Effect::RunAssist {
            command,
            original: script[range.clone()].to_string(),
            range,
        });
    }

    pub(super) fn handle_assist_finished(
        &mut self,
        command: AssistCommand,
        range: Range<usize>,
        original: String,
        result: Result<String, PrompterError>,
        effects: &mut Vec<Effect>,
    ) {
        self.ui.assist_busy = false;
        let replacement = match result {
            Ok(replacement) => replacement,
            Err(err) => {
                warn!(%command, "Script assist failed: {err}");
                self.show_error(&err);
                return;
            }
        };
        let script = self.editor_text();
        if script.get(range.clone()) != Some(original.as_str()) {
            self.show_notice("The script changed while the assistant was working");
            return;
        }
        let updated = assist::splice(&script, range, &replacement);
        self.replace_script(&updated, effects);
        self.show_notice(format!("{command} applied"));
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::test_support::{build_test_app, published};
    use super::*;
    use iced::widget::text_editor::{Action, Edit};

    #[test]
    fn editing_reparses_and_restarts_from_top() {
        let mut app = build_test_app("one two");
        app.playback.clock.set_offset(200.0);
        let effects = app.reduce(Message::ScriptEdited(Action::Edit(Edit::Insert('x'))));
        assert!(app.playback.script.text().contains('x'));
        assert_eq!(app.playback.clock.offset(), 0.0);
        assert!(effects.iter().any(|e| matches!(e, Effect::ScrollTo(y) if *y == 0.0)));
        assert!(matches!(
            published(&effects)[..],
            [MirrorEvent::SettingsUpdate(_)]
        ));
    }

    #[test]
    fn cursor_moves_do_not_touch_the_script() {
        let mut app = build_test_app("one two");
        app.playback.clock.set_offset(200.0);
        let effects = app.reduce(Message::ScriptEdited(Action::Move(
            text_editor::Motion::Right,
        )));
        assert_eq!(app.playback.clock.offset(), 200.0);
        assert!(published(&effects).is_empty());
    }

    #[test]
    fn text_change_rearms_cues() {
        let mut app = build_test_app("one [PAUSE 1 SECONDS] two");
        app.playback
            .cue_tracker
            .evaluate(&app.playback.cues.clone(), 1, std::time::Instant::now());
        assert!(app.playback.cue_tracker.is_triggered(1));
        let mut effects = Vec::new();
        app.replace_script("one [PAUSE 1 SECONDS] two three", &mut effects);
        assert!(!app.playback.cue_tracker.is_triggered(1));
    }

    #[test]
    fn cleanup_targets_whole_script() {
        let mut app = build_test_app("one two three");
        let effects = app.reduce(Message::Assist(AssistCommand::Cleanup));
        assert!(app.ui.assist_busy);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::RunAssist { range, original, .. } if *range == (0..13) && original == "one two three"
        )));
    }

    #[test]
    fn rewrite_without_selection_is_rejected() {
        let mut app = build_test_app("one two three");
        let effects = app.reduce(Message::Assist(AssistCommand::Rewrite));
        assert!(!app.ui.assist_busy);
        assert!(effects.is_empty());
        assert!(app.ui.notice.as_ref().is_some_and(|notice| notice.is_error));
    }

    #[test]
    fn assist_result_is_spliced_in() {
        let mut app = build_test_app("one two three");
        app.ui.assist_busy = true;
        app.reduce(Message::AssistFinished {
            command: AssistCommand::Shorten,
            range: 4..7,
            original: "two".to_string(),
            result: Ok("2".to_string()),
        });
        assert!(!app.ui.assist_busy);
        assert_eq!(app.playback.script.text(), "one 2 three");
    }

    #[test]
    fn assist_result_for_outdated_text_is_dropped() {
        let mut app = build_test_app("one two three");
        app.reduce(Message::AssistFinished {
            command: AssistCommand::Shorten,
            range: 4..7,
            original: "six".to_string(),
            result: Ok("6".to_string()),
        });
        assert_eq!(app.playback.script.text(), "one two three");
        assert!(app.ui.notice.is_some());
    }
}
