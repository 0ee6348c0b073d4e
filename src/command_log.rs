//! In-memory command log with take numbering and CSV/SRT export.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: &str = "Take,Timestamp,Command,Details";
pub const NEW_TAKE: &str = "NEW_TAKE";
const SRT_CUE_SECS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub take: u32,
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Srt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Srt => "srt",
        }
    }
}

/// Append-only log of resolved commands.
///
/// The take counter advances whether or not logging is enabled so numbering
/// stays consistent when logging is switched on mid-session.
#[derive(Debug, Clone)]
pub struct CommandLog {
    enabled: bool,
    entries: Vec<LogEntry>,
    take: u32,
    playback_started: bool,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self {
            enabled: false,
            entries: Vec::new(),
            take: 1,
            playback_started: false,
        }
    }
}

impl CommandLog {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn take(&self) -> u32 {
        self.take
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn has_started_playback(&self) -> bool {
        self.playback_started
    }

    /// Start a fresh logging session.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.entries.clear();
        self.take = 1;
        self.playback_started = false;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Continue a session from a previously exported log. Logging is switched
    /// on and the next take follows the highest one in `entries`.
    pub fn restore(&mut self, entries: Vec<LogEntry>) {
        self.enabled = true;
        self.take = entries.iter().map(|entry| entry.take).max().unwrap_or(1);
        self.playback_started = entries.iter().any(|entry| entry.command == NEW_TAKE);
        self.entries = entries;
    }

    pub fn record(&mut self, command: &str, details: impl Into<String>, now: DateTime<Utc>) {
        if !self.enabled {
            return;
        }
        self.entries.push(LogEntry {
            take: self.take,
            timestamp: now,
            command: command.to_string(),
            details: details.into(),
        });
    }

    /// Note the first play of the session. Later calls are no-ops.
    pub fn mark_playback_started(&mut self, now: DateTime<Utc>) {
        if self.playback_started {
            return;
        }
        self.playback_started = true;
        let details = format!("Playback started (Take {})", self.take);
        self.record(NEW_TAKE, details, now);
    }

    /// Increment the take for a new recording attempt (resume, rewind, jump).
    pub fn begin_take(&mut self, reason: &str, now: DateTime<Utc>) -> u32 {
        self.take += 1;
        let details = format!("{reason} (Take {})", self.take);
        self.record(NEW_TAKE, details, now);
        self.take
    }
}

pub fn render(entries: &[LogEntry], format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => to_csv(entries),
        ExportFormat::Srt => to_srt(entries),
    }
}

pub fn to_csv(entries: &[LogEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    for entry in entries {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},\"{}\"",
            entry.take,
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.command,
            entry.details.replace('"', "\"\"")
        ));
    }
    out
}

pub fn to_srt(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let end = entry.timestamp + chrono::Duration::seconds(SRT_CUE_SECS);
            format!(
                "{}\n{} --> {}\nTake {} | {}: {}\n",
                idx + 1,
                srt_time(&entry.timestamp),
                srt_time(&end),
                entry.take,
                entry.command,
                entry.details
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn srt_time(time: &DateTime<Utc>) -> String {
    format!(
        "{:02}:{:02}:{:02},{:03}",
        time.hour(),
        time.minute(),
        time.second(),
        time.timestamp_subsec_millis().min(999)
    )
}

/// Parse a CSV export back into entries.
pub fn parse_csv(input: &str) -> Result<Vec<LogEntry>> {
    let mut records = split_csv_records(input)?.into_iter();
    match records.next() {
        Some(header) if header.join(",") == CSV_HEADER => {}
        Some(header) => return Err(anyhow!("unexpected header: {}", header.join(","))),
        None => return Ok(Vec::new()),
    }

    records
        .filter(|fields| !(fields.len() == 1 && fields[0].is_empty()))
        .enumerate()
        .map(|(row, fields)| {
            let [take, timestamp, command, details]: [String; 4] = fields
                .try_into()
                .map_err(|fields: Vec<String>| {
                    anyhow!("row {} has {} fields, expected 4", row + 1, fields.len())
                })?;
            Ok(LogEntry {
                take: take
                    .parse()
                    .with_context(|| format!("row {}: invalid take {take:?}", row + 1))?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)
                    .with_context(|| format!("row {}: invalid timestamp", row + 1))?
                    .with_timezone(&Utc),
                command,
                details,
            })
        })
        .collect()
}

fn split_csv_records(input: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            (other, _) => field.push(other),
        }
    }
    if in_quotes {
        return Err(anyhow!("unterminated quoted field"));
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }
    Ok(records)
}

pub fn load_csv_file(path: &Path) -> Result<Vec<LogEntry>> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read log {}", path.display()))?;
    let entries = parse_csv(&input).with_context(|| format!("Invalid log {}", path.display()))?;
    info!(path = %path.display(), entries = entries.len(), "Loaded command log");
    Ok(entries)
}

/// Write the log under `dir`. Returns `None` without touching disk when the
/// log is empty.
pub fn export_to_dir(
    entries: &[LogEntry],
    format: ExportFormat,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<Option<PathBuf>> {
    if entries.is_empty() {
        return Ok(None);
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export dir {}", dir.display()))?;
    let path = dir.join(format!(
        "prompter_log_{}.{}",
        now.format("%Y%m%dT%H%M%S%.3fZ"),
        format.extension()
    ));
    fs::write(&path, render(entries, format))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), entries = entries.len(), "Exported command log");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 250_000_000)
            .single()
            .expect("valid timestamp")
    }

    fn sample_log() -> CommandLog {
        let mut log = CommandLog::default();
        log.enable();
        log.mark_playback_started(at(0));
        log.record("no_op", "Tracked to word 4, speed 12", at(1));
        log.record("go_to_text", "Said \"hello, world\"\nthen jumped", at(2));
        log.begin_take("Rewind", at(3));
        log
    }

    #[test]
    fn takes_advance_on_new_attempts_only() {
        let log = sample_log();
        let takes: Vec<u32> = log.entries().iter().map(|e| e.take).collect();
        assert_eq!(takes, vec![1, 1, 1, 2]);
        assert_eq!(log.entries()[0].details, "Playback started (Take 1)");
        assert_eq!(log.entries()[3].details, "Rewind (Take 2)");
    }

    #[test]
    fn enabling_resets_log_and_take() {
        let mut log = sample_log();
        log.enable();
        assert!(log.entries().is_empty());
        assert_eq!(log.take(), 1);
        assert!(!log.has_started_playback());
    }

    #[test]
    fn disabled_log_counts_takes_without_recording() {
        let mut log = CommandLog::default();
        log.record("pause", "", at(0));
        assert_eq!(log.begin_take("Resumed playback", at(1)), 2);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn csv_export_parses_back_to_same_entries() {
        let log = sample_log();
        let csv = to_csv(log.entries());
        assert!(csv.starts_with("Take,Timestamp,Command,Details\n"));
        let parsed = parse_csv(&csv).expect("parse exported csv");
        let original: Vec<(u32, &str, &str)> = log
            .entries()
            .iter()
            .map(|e| (e.take, e.command.as_str(), e.details.as_str()))
            .collect();
        let round: Vec<(u32, &str, &str)> = parsed
            .iter()
            .map(|e| (e.take, e.command.as_str(), e.details.as_str()))
            .collect();
        assert_eq!(original, round);
        assert_eq!(parsed[1].timestamp, log.entries()[1].timestamp);
    }

    #[test]
    fn export_does_not_mutate_the_log() {
        let log = sample_log();
        let before = log.entries().to_vec();
        let _ = render(log.entries(), ExportFormat::Csv);
        let _ = render(log.entries(), ExportFormat::Srt);
        assert_eq!(log.entries(), before.as_slice());
    }

    #[test]
    fn srt_cues_span_two_seconds() {
        let log = sample_log();
        let srt = to_srt(&log.entries()[..1]);
        assert_eq!(
            srt,
            "1\n22:13:20,250 --> 22:13:22,250\nTake 1 | NEW_TAKE: Playback started (Take 1)\n"
        );
    }

    #[test]
    fn csv_file_restores_a_session() {
        let dir = std::env::temp_dir().join(format!("prompter-restore-{}", std::process::id()));
        let path = export_to_dir(sample_log().entries(), ExportFormat::Csv, &dir, at(4))
            .expect("export")
            .expect("non-empty log is written");

        let mut log = CommandLog::default();
        log.restore(load_csv_file(&path).expect("read export"));
        assert!(log.is_enabled());
        assert!(log.has_started_playback());
        assert_eq!(log.entries().len(), 4);
        assert_eq!(log.begin_take("Resumed playback", at(5)), 3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_wrong_header() {
        assert!(parse_csv("a,b,c,d\n1,x,y,\"z\"").is_err());
    }

    #[test]
    fn empty_log_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("prompter-export-{}", std::process::id()));
        let written = export_to_dir(&[], ExportFormat::Csv, &dir, at(0)).expect("export");
        assert!(written.is_none());
    }
}
