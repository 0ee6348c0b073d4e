use super::messages::Message;
use super::state::{App, PLAYER_MODES, SCRIPT_SCROLL_ID, SLIDE_DISPLAYS};
use crate::assist::AssistCommand;
use crate::command_log::ExportFormat;
use crate::config::{
    FONT_SIZE_RANGE, MARGIN_HORIZONTAL_RANGE, MARGIN_VERTICAL_RANGE, SCROLL_SPEED_RANGE,
    START_DELAY_RANGE,
};
use crate::script::{Run, Segment};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::text::{LineHeight, Span, Wrapping};
use iced::widget::{
    Column, Row, button, column, container, horizontal_space, image, pick_list, row, scrollable,
    slider, text, text_editor, text_input,
};
use iced::{Background, Color, Element, Length, Padding};

const TRACKED_WORD_BACKGROUND: Color = Color::from_rgba(1.0, 0.82, 0.2, 0.45);
const UPCOMING_CUE_COLOR: Color = Color::from_rgb(0.95, 0.55, 0.1);
const CUE_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.5);
const ERROR_COLOR: Color = Color::from_rgb(0.85, 0.25, 0.25);

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let play_label = if self.playback.clock.is_active() {
            "Pause"
        } else {
            "Play"
        };
        let play_button =
            button(play_label).on_press_maybe((!self.play_disabled()).then_some(Message::TogglePlayPause));
        let voice_label = if self.voice.enabled {
            "Voice: On"
        } else {
            "Voice: Off"
        };
        let voice_toggle = button(voice_label).on_press_maybe(
            (self.voice.enabled || !self.play_disabled()).then_some(Message::ToggleVoiceControl),
        );
        let cues_toggle = button(if self.config.cues_enabled {
            "Cues: On"
        } else {
            "Cues: Off"
        })
        .on_press(Message::ToggleCues);
        let theme_label = if matches!(self.config.theme, crate::config::ThemeMode::Night) {
            "Day Mode"
        } else {
            "Night Mode"
        };
        let settings_toggle = button(if self.ui.settings_open {
            "Hide Settings"
        } else {
            "Show Settings"
        })
        .on_press(Message::ToggleSettings);
        let editor_toggle = button(if self.ui.editor_open {
            "Hide Editor"
        } else {
            "Edit Script"
        })
        .on_press(Message::ToggleEditor);

        let mode_picker = pick_list(
            PLAYER_MODES,
            Some(self.config.player_mode),
            Message::PlayerModeChanged,
        );

        let mut controls: Row<'_, Message> = row![
            play_button,
            button("Rewind").on_press(Message::Rewind),
            voice_toggle,
            cues_toggle,
            mode_picker,
        ]
        .spacing(10)
        .align_y(Vertical::Center)
        .width(Length::Fill);

        if self.is_slides_mode() {
            controls = controls.push(pick_list(
                SLIDE_DISPLAYS,
                Some(self.config.slide_display),
                Message::SlideDisplayChanged,
            ));
        }

        controls = controls
            .push(horizontal_space())
            .push(text(self.status_label()))
            .push(editor_toggle)
            .push(button(theme_label).on_press(Message::ToggleTheme))
            .push(settings_toggle);

        let mut content: Column<'_, Message> = column![controls].padding(16).spacing(12);

        if let Some(notice) = &self.ui.notice {
            let mut message = text(notice.message.as_str());
            if notice.is_error {
                message = message.color(ERROR_COLOR);
            }
            content = content.push(
                row![
                    message,
                    horizontal_space(),
                    button("Dismiss").on_press(Message::DismissNotice)
                ]
                .spacing(8)
                .align_y(Vertical::Center),
            );
        }

        if let Some(banner) = self.countdown_banner() {
            content = content.push(
                container(text(banner).size(28.0))
                    .width(Length::Fill)
                    .align_x(Horizontal::Center),
            );
        }

        if self.is_slides_mode() {
            content = content.push(self.slide_navigation());
        }

        if self.ui.editor_open {
            content = content.push(
                text_editor(&self.ui.editor)
                    .on_action(Message::ScriptEdited)
                    .height(Length::Fixed(180.0)),
            );
        }

        let stage = if self.scroll_enabled() {
            self.script_view()
        } else {
            self.slide_image_view()
        };
        content = content.push(stage);

        let mut layout: Row<'_, Message> =
            row![container(content.height(Length::Fill)).width(Length::Fill)].spacing(16);

        if self.ui.settings_open {
            layout = layout.push(scrollable(self.settings_panel()).width(Length::Fixed(320.0)));
        }

        layout.into()
    }
}

impl App {
    fn status_label(&self) -> String {
        let mut status = format!("Take {}", self.log.take());
        if self.log.is_enabled() {
            status.push_str(&format!(" | Logging ({})", self.log.entries().len()));
        }
        if self.voice.is_processing() {
            status.push_str(" | Listening...");
        }
        status
    }

    fn countdown_banner(&self) -> Option<String> {
        if let Some(remaining) = self.start_countdown() {
            return Some(format!("Starting in {remaining}"));
        }
        let remaining = self.cue_countdown()?;
        let label = self
            .playback
            .active_cue
            .map(|cue| cue.label())
            .unwrap_or_else(|| "Cue".to_string());
        Some(format!("{label}: resuming in {remaining}s"))
    }

    fn slide_navigation(&self) -> Element<'_, Message> {
        let deck = &self.slides.deck;
        let label = if deck.is_empty() {
            "No slides".to_string()
        } else {
            format!("Slide {} of {}", deck.current_index() + 1, deck.len())
        };
        let numbers: Vec<usize> = (1..=deck.len()).collect();
        let selected = (!deck.is_empty()).then(|| deck.current_index() + 1);
        row![
            button("Previous Slide")
                .on_press_maybe((deck.current_index() > 0).then_some(Message::PreviousSlide)),
            text(label),
            button("Next Slide").on_press_maybe(deck.has_next().then_some(Message::NextSlide)),
            text("Go to"),
            pick_list(numbers, selected, |number| Message::GoToSlide(number - 1)),
        ]
        .spacing(10)
        .align_y(Vertical::Center)
        .into()
    }

    fn slide_image_view(&self) -> Element<'_, Message> {
        let index = self.slides.deck.current_index();
        let body: Element<'_, Message> = match self.slides.images.get(&index) {
            Some(handle) => image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text("Loading slide image...").into(),
        };
        container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .into()
    }

    fn script_view(&self) -> Element<'_, Message> {
        let size = self.config.font_size as f32;
        let tracked = self.playback.tracked_word;
        let upcoming = if self.config.cues_enabled {
            self.playback.cue_tracker.upcoming()
        } else {
            None
        };
        let mut directives = self
            .playback
            .script
            .segments()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Pause { seconds } => Some(format!("[PAUSE {seconds} SECONDS]")),
                Segment::Video { number } => Some(format!("[PLAY VIDEO {number}]")),
                Segment::Text(_) => None,
            });

        let mut words_seen = 0usize;
        let spans: Vec<Span<'_, Message>> = self
            .playback
            .script
            .runs()
            .iter()
            .map(|run| {
                let span: Span<'_, Message> = match run {
                    Run::Word { index, text } => {
                        words_seen = index + 1;
                        let span = Span::new(text.as_str());
                        if Some(*index) == tracked {
                            span.background(Background::Color(TRACKED_WORD_BACKGROUND))
                        } else {
                            span
                        }
                    }
                    Run::Space(space) => Span::new(space.as_str()),
                    Run::Cue => {
                        let label = directives.next().unwrap_or_default();
                        let color = if Some(words_seen) == upcoming {
                            UPCOMING_CUE_COLOR
                        } else {
                            CUE_COLOR
                        };
                        Span::new(label).color(color)
                    }
                };
                span.size(size).line_height(LineHeight::Relative(1.4))
            })
            .collect();

        let rich: iced::widget::text::Rich<'_, Message> =
            iced::widget::text::Rich::with_spans(spans);

        scrollable(
            container(
                rich.width(Length::Fill)
                    .wrapping(Wrapping::WordOrGlyph)
                    .align_x(Horizontal::Center),
            )
            .width(Length::Fill)
            .padding(Padding::from([
                self.vertical_padding(),
                self.horizontal_padding(),
            ])),
        )
        .on_scroll(|viewport| Message::Scrolled {
            offset_y: viewport.absolute_offset().y,
            viewport_height: viewport.bounds().height,
            content_height: viewport.content_bounds().height,
        })
        .id(SCRIPT_SCROLL_ID.clone())
        .height(Length::Fill)
        .into()
    }

    pub(super) fn settings_panel(&self) -> Element<'_, Message> {
        let speed_row: Element<'_, Message> = if self.speed_slider_disabled() {
            text(format!(
                "Scroll speed: {:.0} (set by voice)",
                self.config.scroll_speed
            ))
            .into()
        } else {
            row![
                text(format!("Scroll speed: {:.0}", self.config.scroll_speed)),
                slider(
                    SCROLL_SPEED_RANGE,
                    self.config.scroll_speed,
                    Message::ScrollSpeedChanged
                )
                .step(1.0)
            ]
            .spacing(8)
            .align_y(Vertical::Center)
            .into()
        };

        let display = column![
            text("Display").size(20.0),
            speed_row,
            row![
                text(format!("Font size: {}", self.config.font_size)),
                slider(
                    *FONT_SIZE_RANGE.start() as f32..=*FONT_SIZE_RANGE.end() as f32,
                    self.config.font_size as f32,
                    |value| Message::FontSizeChanged(value.round() as u32),
                )
            ]
            .spacing(8)
            .align_y(Vertical::Center),
            row![
                text(format!(
                    "Horizontal margin: {}%",
                    self.config.margin_horizontal
                )),
                slider(
                    f32::from(*MARGIN_HORIZONTAL_RANGE.start())
                        ..=f32::from(*MARGIN_HORIZONTAL_RANGE.end()),
                    f32::from(self.config.margin_horizontal),
                    |value| Message::MarginHorizontalChanged(value.round() as u16),
                )
            ]
            .spacing(8)
            .align_y(Vertical::Center),
            row![
                text(format!("Vertical margin: {}%", self.config.margin_vertical)),
                slider(
                    f32::from(*MARGIN_VERTICAL_RANGE.start())
                        ..=f32::from(*MARGIN_VERTICAL_RANGE.end()),
                    f32::from(self.config.margin_vertical),
                    |value| Message::MarginVerticalChanged(value.round() as u16),
                )
            ]
            .spacing(8)
            .align_y(Vertical::Center),
            row![
                text(format!("Start delay: {} s", self.config.start_delay_secs)),
                slider(
                    *START_DELAY_RANGE.start() as f32..=*START_DELAY_RANGE.end() as f32,
                    self.config.start_delay_secs as f32,
                    |value| Message::StartDelayChanged(value.round() as u32),
                )
            ]
            .spacing(8)
            .align_y(Vertical::Center),
        ]
        .spacing(10);

        let panel = column![
            display,
            self.presets_section(),
            self.script_section(),
            self.logging_section(),
        ]
        .spacing(18)
        .width(Length::Fixed(300.0));

        container(panel).padding(12).into()
    }

    fn presets_section(&self) -> Element<'_, Message> {
        let loaded = self
            .ui
            .loaded_preset
            .as_ref()
            .map(|preset| format!("Current: {}", preset.name))
            .unwrap_or_else(|| "Current: custom".to_string());

        let mut list: Column<'_, Message> = column![].spacing(4);
        for preset in self.presets.filter(&self.ui.preset_filter) {
            list = list.push(
                row![
                    text(preset.name.as_str()).width(Length::Fill),
                    button("Load").on_press(Message::LoadPreset(preset.id.clone())),
                    button("Delete").on_press(Message::DeletePreset(preset.id.clone())),
                ]
                .spacing(6)
                .align_y(Vertical::Center),
            );
        }

        column![
            text("Presets").size(20.0),
            text(loaded),
            row![
                text_input("Preset name", &self.ui.preset_name)
                    .on_input(Message::PresetNameChanged)
                    .on_submit(Message::SavePreset),
                button("Save").on_press(Message::SavePreset),
            ]
            .spacing(6),
            text_input("Filter presets", &self.ui.preset_filter)
                .on_input(Message::PresetFilterChanged),
            list,
            button("Reset display settings").on_press(Message::ResetSettings),
        ]
        .spacing(8)
        .into()
    }

    fn script_section(&self) -> Element<'_, Message> {
        let import_ready = !self.ui.import_busy;
        let mut assist_buttons: Column<'_, Message> = column![].spacing(6);
        for command in AssistCommand::ALL {
            assist_buttons = assist_buttons.push(
                button(text(command.to_string()).size(13.0))
                    .on_press_maybe((!self.ui.assist_busy).then_some(Message::Assist(command))),
            );
        }

        column![
            text("Script").size(20.0),
            row![
                text_input("Script file path", &self.ui.open_path_input)
                    .on_input(Message::OpenPathInputChanged)
                    .on_submit(Message::OpenPathRequested),
                button("Open")
                    .on_press_maybe((!self.ui.script_loading).then_some(Message::OpenPathRequested)),
            ]
            .spacing(6),
            text_input("Google Docs or Slides link", &self.ui.import_input)
                .on_input(Message::ImportInputChanged),
            row![
                button("Import Doc").on_press_maybe(import_ready.then_some(Message::ImportDocument)),
                button("Import Slides")
                    .on_press_maybe(import_ready.then_some(Message::ImportPresentation)),
            ]
            .spacing(6),
            text(if self.ui.assist_busy {
                "Assistant working..."
            } else {
                "Assistant"
            }),
            assist_buttons,
        ]
        .spacing(8)
        .into()
    }

    fn logging_section(&self) -> Element<'_, Message> {
        let has_entries = !self.log.entries().is_empty();
        column![
            text("Command Log").size(20.0),
            text(format!(
                "{} entries, take {}",
                self.log.entries().len(),
                self.log.take()
            )),
            row![
                button(if self.log.is_enabled() {
                    "Stop Logging"
                } else {
                    "Start Logging"
                })
                .on_press(Message::ToggleLogging),
                button("Clear").on_press_maybe(has_entries.then_some(Message::ClearLog)),
            ]
            .spacing(6),
            row![
                button("Export CSV")
                    .on_press_maybe(has_entries.then_some(Message::ExportLog(ExportFormat::Csv))),
                button("Export SRT")
                    .on_press_maybe(has_entries.then_some(Message::ExportLog(ExportFormat::Srt))),
            ]
            .spacing(6),
            row![
                text_input("Exported CSV log path", &self.ui.log_path_input)
                    .on_input(Message::LogPathInputChanged)
                    .on_submit(Message::LoadLogRequested),
                button("Continue Log")
                    .on_press_maybe((!self.ui.log_loading).then_some(Message::LoadLogRequested)),
            ]
            .spacing(6),
        ]
        .spacing(8)
        .into()
    }
}
