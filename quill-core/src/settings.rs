use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::keybindings::Platform;

/// Application settings, persisted to `<config dir>/quill/settings.json`.
///
/// The `#[serde(default)]` on the struct fills any fields missing from an
/// existing settings file with their `Default` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Window ───────────────────────────────────────────────────────────
    pub window_width: i32,
    pub window_height: i32,
    pub last_directory: String,

    // ── Session ──────────────────────────────────────────────────────────
    /// Ask before Open replaces unsaved changes. Off by default: Open has
    /// always replaced the document without asking.
    pub confirm_discard_on_open: bool,

    // ── Keyboard ─────────────────────────────────────────────────────────
    /// `"mac"` or `"other"`; detected from the build target when unset.
    pub platform: Option<String>,
    /// Keybinding id → display string, e.g. `"save_file": "Ctrl+Shift+S"`.
    pub keybinding_overrides: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window_width: 800,
            window_height: 600,
            last_directory: String::new(),
            confirm_discard_on_open: false,
            platform: None,
            keybinding_overrides: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn platform(&self) -> Platform {
        match self.platform.as_deref() {
            Some(name) => Platform::from_name(name).unwrap_or_else(|| {
                log::warn!("Unknown platform override '{}', detecting instead", name);
                Platform::current()
            }),
            None => Platform::current(),
        }
    }

    pub fn last_directory_path(&self) -> Option<PathBuf> {
        if self.last_directory.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.last_directory))
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quill").join("settings.json"))
}

pub fn load() -> Settings {
    match settings_path() {
        Some(path) => load_from(&path),
        None => {
            log::warn!("Cannot determine config directory; using default settings");
            Settings::default()
        }
    }
}

pub fn save(settings: &Settings) -> Result<(), String> {
    let path = settings_path().ok_or_else(|| "Cannot determine config directory".to_string())?;
    save_to(settings, &path)
}

pub fn load_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings at {:?}: {}", path, e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save_to(settings: &Settings, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory: {}", e))?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))
}
