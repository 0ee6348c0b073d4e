//! On-disk cache for per-script settings and saved presets.
//!
//! Files are stored under `.cache/` using a hash of the script path as the
//! directory name to avoid filesystem issues. Write errors are logged and
//! otherwise ignored to keep the UI responsive.

use crate::config::{AppConfig, parse_config, serialize_config};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CACHE_DIR: &str = ".cache";
const PRESETS_FILE: &str = "presets.toml";
/// Cache key for sessions that were not opened from a file.
pub const UNTITLED_SCRIPT: &str = "untitled";

pub fn hash_dir(script_path: &Path) -> PathBuf {
    hash_dir_in(Path::new(CACHE_DIR), script_path)
}

fn hash_dir_in(root: &Path, script_path: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(script_path.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    root.join(hash)
}

pub fn presets_path() -> PathBuf {
    Path::new(CACHE_DIR).join(PRESETS_FILE)
}

pub fn load_script_config(script_path: &Path) -> Option<AppConfig> {
    let path = hash_dir(script_path).join("config.toml");
    let data = fs::read_to_string(path).ok()?;
    parse_config(&data).ok()
}

/// Persist settings for one script. Secrets are never written to the cache.
pub fn save_script_config(script_path: &Path, config: &AppConfig) {
    let path = hash_dir(script_path).join("config.toml");
    write_cached_config(&path, config);
}

fn write_cached_config(path: &Path, config: &AppConfig) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let mut scrubbed = config.clone();
    scrubbed.gemini_api_key = None;
    scrubbed.google_access_token = None;
    match serialize_config(&scrubbed) {
        Ok(contents) => {
            if let Err(err) = fs::write(path, contents) {
                warn!(path = %path.display(), "Failed to write cached config: {err}");
            }
        }
        Err(err) => warn!("Failed to serialize cached config: {err:#}"),
    }
}
