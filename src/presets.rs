//! Named display presets persisted in `.cache/presets.toml`.

use crate::config::{
    FONT_SIZE_RANGE, MARGIN_HORIZONTAL_RANGE, MARGIN_VERTICAL_RANGE, SCROLL_SPEED_RANGE,
};
use crate::error::PrompterError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The values a preset captures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetValues {
    pub scroll_speed: f32,
    pub font_size: u32,
    pub margin_horizontal: u16,
    pub margin_vertical: u16,
}

impl PresetValues {
    pub fn validate(&self) -> Result<(), PrompterError> {
        if !self.scroll_speed.is_finite() || !SCROLL_SPEED_RANGE.contains(&self.scroll_speed) {
            return Err(PrompterError::Validation(format!(
                "scroll speed {} is outside 0-100",
                self.scroll_speed
            )));
        }
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            return Err(PrompterError::Validation(format!(
                "font size {} is outside 12-120",
                self.font_size
            )));
        }
        if !MARGIN_HORIZONTAL_RANGE.contains(&self.margin_horizontal) {
            return Err(PrompterError::Validation(format!(
                "horizontal margin {}% is outside 0-40%",
                self.margin_horizontal
            )));
        }
        if !MARGIN_VERTICAL_RANGE.contains(&self.margin_vertical) {
            return Err(PrompterError::Validation(format!(
                "vertical margin {}% is outside 0-50%",
                self.margin_vertical
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPreset {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub values: PresetValues,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetStore {
    #[serde(default)]
    presets: Vec<SavedPreset>,
}

impl PresetStore {
    /// Missing or unreadable files yield an empty store.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&data) {
            Ok(store) => store,
            Err(err) => {
                warn!(path = %path.display(), "Ignoring unreadable presets file: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string(self).context("Failed to serialize presets")?;
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn presets(&self) -> &[SavedPreset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&SavedPreset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn create(
        &mut self,
        name: &str,
        values: PresetValues,
        now: DateTime<Utc>,
    ) -> Result<&SavedPreset, PrompterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PrompterError::Validation(
                "preset name must not be empty".to_string(),
            ));
        }
        values.validate()?;

        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(now.to_rfc3339().as_bytes());
        hasher.update(self.presets.len().to_le_bytes());
        let id = format!("{:x}", hasher.finalize())[..16].to_string();

        info!(%id, name, "Saved preset");
        self.presets.push(SavedPreset {
            id,
            name: name.to_string(),
            values,
        });
        Ok(&self.presets[self.presets.len() - 1])
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|preset| preset.id != id);
        before != self.presets.len()
    }

    /// Case-insensitive substring match on the preset name.
    pub fn filter(&self, query: &str) -> Vec<&SavedPreset> {
        let query = query.trim().to_lowercase();
        self.presets
            .iter()
            .filter(|preset| query.is_empty() || preset.name.to_lowercase().contains(&query))
            .collect()
    }
}
