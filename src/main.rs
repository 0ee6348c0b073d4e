//! Entry point for the voice prompter.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse the optional script path argument.
//! - Load user configuration from `conf/config.toml` plus cached per-script settings.
//! - Start the mirror sink when one is configured.
//! - Launch the GUI application with the loaded script and config.

mod app;
mod assist;
mod cache;
mod cancellation;
mod capture;
mod clock;
mod command_log;
mod config;
mod cues;
mod error;
mod gemini;
mod import;
mod mirror;
mod presets;
mod resolver;
mod script;
mod slides;

use crate::app::run_app;
use crate::cache::{UNTITLED_SCRIPT, load_script_config};
use crate::config::load_config;
use crate::import::load_script_file;
use crate::mirror::MirrorBus;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Consume a pending Ctrl-C so the UI can save and exit on its own thread.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::AcqRel)
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = ctrlc::set_handler(|| SIGINT_REQUESTED.store(true, Ordering::Release)) {
        warn!("Failed to install Ctrl-C handler: {err}");
    }
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let script_path = parse_args()?;
    let base_config = load_config(Path::new("conf/config.toml"));
    let cache_key = script_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(UNTITLED_SCRIPT));
    let config = match load_script_config(&cache_key) {
        Some(overrides) => {
            info!("Loaded per-script overrides from cache");
            overrides.with_base_overrides(&base_config)
        }
        None => base_config,
    };
    set_log_level(reload_handle, config.log_level.as_filter_str());

    let text = match &script_path {
        Some(path) => {
            info!(path = %path.display(), "Opening script");
            load_script_file(path)?
        }
        None => String::new(),
    };
    info!(
        level = %config.log_level,
        words = text.split_whitespace().count(),
        voice = config.voice_control,
        model = %config.gemini_model,
        "Starting voice prompter"
    );

    let mirror = MirrorBus::new();
    if let Some(path) = config
        .mirror_jsonl_path
        .as_deref()
        .filter(|path| !path.trim().is_empty())
    {
        // Detached; the thread ends when the bus is dropped at exit.
        mirror.spawn_jsonl_sink(PathBuf::from(path));
    }

    run_app(text, config, script_path, mirror).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args() -> Result<Option<PathBuf>> {
    let Some(path) = env::args().nth(1) else {
        return Ok(None);
    };
    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!(
            "File not found: {}\nUsage: voice-prompter [path-to-script]",
            path.display()
        ));
    }
    Ok(Some(path))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
