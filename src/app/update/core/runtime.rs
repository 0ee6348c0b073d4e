use super::super::super::messages::Message;
use super::super::super::state::{App, SCRIPT_SCROLL_ID};
use super::super::Effect;
use crate::cache::{load_script_config, presets_path};
use crate::capture::SpeechCapture;
use crate::command_log::{export_to_dir, load_csv_file};
use crate::config::load_config;
use crate::error::{ImportError, PrompterError};
use crate::gemini::GeminiClient;
use crate::import::{GoogleSource, fetch_image, load_script_file};
use chrono::Utc;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::window;
use std::future::Future;
use std::path::Path;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Run blocking work (HTTP, file IO) on its own thread and hand the result
/// back to the executor. `None` means the worker panicked.
fn run_blocking<T, F>(work: F) -> impl Future<Output = Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    std::thread::spawn(move || {
        let _ = sender.send(work());
    });
    async move { receiver.await.ok() }
}

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::SaveConfig => {
                self.save_script_config();
                Task::none()
            }
            Effect::SavePresets => {
                if let Err(err) = self.presets.save(&presets_path()) {
                    warn!("Failed to save presets: {err:#}");
                }
                Task::none()
            }
            Effect::ScrollTo(offset) => scrollable::scroll_to(
                SCRIPT_SCROLL_ID.clone(),
                AbsoluteOffset { x: 0.0, y: offset },
            ),
            Effect::Publish(event) => {
                self.mirror.publish(event);
                Task::none()
            }
            Effect::StartCapture => {
                if !self.voice.capture_requested || self.voice.capture.is_some() {
                    return Task::none();
                }
                match SpeechCapture::start(&self.config.input_device, self.config.clip_interval_secs)
                {
                    Ok(capture) => {
                        self.voice.capture = Some(capture);
                        Task::none()
                    }
                    Err(err) => {
                        warn!("Failed to start microphone capture: {err}");
                        Task::done(Message::CaptureFailed(err))
                    }
                }
            }
            Effect::StopCapture => {
                if let Some(capture) = self.voice.capture.take() {
                    capture.stop();
                }
                Task::none()
            }
            Effect::Resolve {
                resolver,
                request,
                cancel,
            } => {
                let request_id = request.request_id;
                let generation = request.generation;
                Task::perform(
                    run_blocking(move || resolver.resolve(&request, &cancel)),
                    move |result| Message::ResolutionReady {
                        request_id,
                        generation,
                        result: result.unwrap_or_else(|| {
                            Err(PrompterError::Inference("resolver worker stopped".to_string()))
                        }),
                    },
                )
            }
            Effect::FetchSlideImage {
                deck_version,
                index,
                url,
            } => Task::perform(
                run_blocking(move || match fetch_image(&url) {
                    Ok(bytes) => Some(bytes),
                    Err(err) => {
                        warn!(index, "Failed to fetch slide image: {err:#}");
                        None
                    }
                }),
                move |bytes| Message::SlideImageLoaded {
                    deck_version,
                    index,
                    bytes: bytes.flatten(),
                },
            ),
            Effect::ImportDocument(document_id) => {
                let config = self.config.clone();
                Task::perform(
                    run_blocking(move || {
                        GoogleSource::from_config(&config)?.fetch_document(&document_id)
                    }),
                    |result| {
                        Message::DocumentImported(
                            result
                                .unwrap_or_else(|| {
                                    Err(ImportError::Failed("import worker stopped".to_string()))
                                })
                                .map_err(PrompterError::from),
                        )
                    },
                )
            }
            Effect::ImportPresentation(presentation_id) => {
                let config = self.config.clone();
                Task::perform(
                    run_blocking(move || {
                        GoogleSource::from_config(&config)?.fetch_presentation(&presentation_id)
                    }),
                    |result| {
                        Message::PresentationImported(
                            result
                                .unwrap_or_else(|| {
                                    Err(ImportError::Failed("import worker stopped".to_string()))
                                })
                                .map_err(PrompterError::from),
                        )
                    },
                )
            }
            Effect::LoadScript(path) => {
                let requested_path = path.clone();
                Task::perform(
                    run_blocking(move || {
                        let base_config = load_config(Path::new("conf/config.toml"));
                        let config = load_script_config(&requested_path)
                            .map(|overrides| overrides.with_base_overrides(&base_config))
                            .unwrap_or(base_config);
                        let text =
                            load_script_file(&requested_path).map_err(|err| format!("{err:#}"));
                        (text, config)
                    }),
                    move |loaded| {
                        let (text, config) = loaded.unwrap_or_else(|| {
                            (
                                Err("script loader stopped".to_string()),
                                load_config(Path::new("conf/config.toml")),
                            )
                        });
                        Message::ScriptLoaded {
                            path: path.clone(),
                            text,
                            config: Box::new(config),
                        }
                    },
                )
            }
            Effect::RunAssist {
                command,
                range,
                original,
            } => {
                let config = self.config.clone();
                let cancel = crate::cancellation::CancellationToken::detached();
                let input = original.clone();
                Task::perform(
                    run_blocking(move || {
                        let client = GeminiClient::from_config(&config)?;
                        crate::assist::run(&client, command, &input, &cancel)
                    }),
                    move |result| Message::AssistFinished {
                        command,
                        range: range.clone(),
                        original: original.clone(),
                        result: result.unwrap_or_else(|| {
                            Err(PrompterError::Inference("assist worker stopped".to_string()))
                        }),
                    },
                )
            }
            Effect::ExportLog(format) => {
                let dir = Path::new(&self.config.export_dir).to_path_buf();
                match export_to_dir(self.log.entries(), format, &dir, Utc::now()) {
                    Ok(Some(path)) => self.show_notice(format!("Exported {}", path.display())),
                    Ok(None) => self.show_notice("The command log is empty"),
                    Err(err) => {
                        warn!("Export failed: {err:#}");
                        self.show_notice(format!("Export failed: {err:#}"));
                    }
                }
                Task::none()
            }
            Effect::LoadLog(path) => Task::perform(
                run_blocking(move || load_csv_file(&path).map_err(|err| format!("{err:#}"))),
                |result| {
                    Message::LogLoaded(
                        result.unwrap_or_else(|| Err("log reader stopped".to_string())),
                    )
                },
            ),
            Effect::QuitSafely => {
                info!("Saving state before exit");
                self.save_script_config();
                self.voice.generations.advance();
                self.voice.in_flight = None;
                if let Some(capture) = self.voice.capture.take() {
                    capture.stop();
                }
                iced::exit()
            }
        }
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(iced::window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Window(iced::window::Event::Moved(position)) => Some(Message::WindowMoved {
            x: position.x,
            y: position.y,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}
