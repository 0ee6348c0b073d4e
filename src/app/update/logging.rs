use super::super::state::App;
use super::Effect;
use crate::command_log::{ExportFormat, LogEntry};
use crate::error::PrompterError;
use std::path::PathBuf;
use tracing::{info, warn};

impl App {
    pub(super) fn handle_toggle_logging(&mut self) {
        if self.log.is_enabled() {
            self.log.disable();
            info!(entries = self.log.entries().len(), "Command logging stopped");
            self.show_notice("Command logging stopped");
        } else {
            self.log.enable();
            info!("Command logging started");
            self.show_notice("Command logging started");
        }
    }

    pub(super) fn handle_clear_log(&mut self) {
        self.log.clear();
        self.show_notice("Command log cleared");
    }

    pub(super) fn handle_export_log(&mut self, format: ExportFormat, effects: &mut Vec<Effect>) {
        if self.log.entries().is_empty() {
            self.show_notice("The command log is empty");
            return;
        }
        effects.push(Effect::ExportLog(format));
    }

    pub(super) fn handle_load_log_requested(&mut self, effects: &mut Vec<Effect>) {
        if self.ui.log_loading {
            return;
        }
        let raw = self.ui.log_path_input.trim();
        if raw.is_empty() {
            self.show_error(&PrompterError::Validation(
                "enter the path of an exported CSV log".to_string(),
            ));
            return;
        }
        self.ui.log_loading = true;
        effects.push(Effect::LoadLog(PathBuf::from(raw)));
    }

    pub(super) fn handle_log_loaded(&mut self, result: Result<Vec<LogEntry>, String>) {
        self.ui.log_loading = false;
        match result {
            Ok(entries) => {
                let count = entries.len();
                self.log.restore(entries);
                self.ui.log_path_input.clear();
                info!(entries = count, take = self.log.take(), "Continuing command log");
                self.show_notice(format!("Loaded {count} log entries"));
            }
            Err(err) => {
                warn!("Failed to load command log: {err}");
                self.show_error(&PrompterError::Validation(err));
            }
        }
    }
}
