//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::placement::PlacementOptions;

/// Errors raised while reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Axis-aligned box every entity position must stay inside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Default for WorkspaceBounds {
    fn default() -> Self {
        Self {
            min: [-50.0, 0.0, -50.0],
            max: [50.0, 50.0, 50.0],
        }
    }
}

/// Per-axis scale limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 10.0 }
    }
}

/// Rotation limits in degrees, applied after normalization to [0, 360)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationLimits {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            min_deg: 0.0,
            max_deg: 360.0,
        }
    }
}

/// Undo/redo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum entries kept on each of the undo and redo stacks
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

/// Click-vs-drag thresholds for pointer interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerSettings {
    /// A press shorter than this (ms) may count as a click
    pub click_max_ms: f64,
    /// A press moving less than this (px) may count as a click
    pub click_max_px: f64,
}

impl Default for PointerSettings {
    fn default() -> Self {
        Self {
            click_max_ms: 200.0,
            click_max_px: 5.0,
        }
    }
}

/// Save/load settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// Documents larger than this are rejected before parsing
    pub max_document_bytes: usize,
    /// Write the scene to the autosave file after every recorded action
    pub autosave: bool,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            max_document_bytes: 10 * 1024 * 1024,
            autosave: false,
        }
    }
}

/// Animation durations in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub spawn_ms: f64,
    pub framing_ms: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            spawn_ms: 300.0,
            framing_ms: 500.0,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub workspace: WorkspaceBounds,
    #[serde(default)]
    pub scale: ScaleLimits,
    #[serde(default)]
    pub rotation: RotationLimits,
    #[serde(default)]
    pub history: HistorySettings,
    /// Defaults used by `add_object` when the caller passes none
    #[serde(default)]
    pub placement: PlacementOptions,
    #[serde(default)]
    pub pointer: PointerSettings,
    #[serde(default)]
    pub persistence: PersistenceSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
}

impl EditorSettings {
    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
    }

    /// Path of the settings file in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Path of the autosave file in the platform data directory
    pub fn autosave_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Load settings from the config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
