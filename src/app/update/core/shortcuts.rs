use super::super::super::messages::Message;
use super::super::super::state::App;
use iced::keyboard::{Key, Modifiers, key};

impl App {
    pub(super) fn shortcut_message_for_key(
        &self,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Message> {
        let pressed = match key.as_ref() {
            Key::Named(key::Named::Space) => "space".to_string(),
            Key::Character(ch) => ch.to_ascii_lowercase(),
            _ => return None,
        };

        let bindings = [
            (&self.config.key_toggle_play_pause, "space", Message::TogglePlayPause),
            (&self.config.key_rewind, "r", Message::Rewind),
            (&self.config.key_toggle_voice, "v", Message::ToggleVoiceControl),
            (&self.config.key_toggle_cues, "c", Message::ToggleCues),
            (&self.config.key_next_slide, "n", Message::NextSlide),
            (&self.config.key_prev_slide, "p", Message::PreviousSlide),
            (&self.config.key_toggle_logging, "ctrl+l", Message::ToggleLogging),
            (&self.config.key_safe_quit, "q", Message::SafeQuit),
        ];

        bindings
            .into_iter()
            .find(|(raw, fallback, _)| Self::shortcut_matches(raw, fallback, &pressed, modifiers))
            .map(|(_, _, message)| message)
    }

    pub(super) fn shortcut_matches(
        raw: &str,
        fallback: &str,
        pressed: &str,
        modifiers: Modifiers,
    ) -> bool {
        let normalized = Self::normalize_shortcut_token(raw, fallback);

        let mut required_ctrl = false;
        let mut required_alt = false;
        let mut required_logo = false;
        let mut required_shift = false;
        let mut required_key: Option<&str> = None;

        for token in normalized
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match token {
                "ctrl" | "control" => required_ctrl = true,
                "alt" => required_alt = true,
                "logo" | "meta" | "super" | "cmd" | "command" => required_logo = true,
                "shift" => required_shift = true,
                key => required_key = Some(key),
            }
        }

        let Some(required_key) = required_key else {
            return false;
        };
        if pressed != required_key {
            return false;
        }

        modifiers.control() == required_ctrl
            && modifiers.alt() == required_alt
            && modifiers.logo() == required_logo
            && modifiers.shift() == required_shift
    }

    pub(super) fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            fallback.to_string()
        } else {
            normalized.replace("spacebar", "space")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::test_support::build_test_app;
    use super::*;
    use iced::keyboard::Modifiers;

    #[test]
    fn normalizes_spacebar_alias() {
        assert_eq!(App::normalize_shortcut_token(" SpaceBar ", "x"), "space");
    }

    #[test]
    fn matches_ctrl_l_shortcut() {
        assert!(App::shortcut_matches("ctrl+l", "x", "l", Modifiers::CTRL));
    }

    #[test]
    fn rejects_unexpected_extra_modifier() {
        assert!(!App::shortcut_matches(
            "ctrl+l",
            "x",
            "l",
            Modifiers::CTRL | Modifiers::SHIFT,
        ));
    }

    #[test]
    fn default_bindings_map_to_prompter_actions() {
        let app = build_test_app("one two");
        assert!(matches!(
            app.shortcut_message_for_key(Key::Named(key::Named::Space), Modifiers::empty()),
            Some(Message::TogglePlayPause)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(Key::Character("R".into()), Modifiers::empty()),
            Some(Message::Rewind)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(Key::Character("l".into()), Modifiers::CTRL),
            Some(Message::ToggleLogging)
        ));
        assert!(
            app.shortcut_message_for_key(Key::Character("l".into()), Modifiers::empty())
                .is_none()
        );
    }
}
