use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::session::Intent;

/// A built-in keyboard shortcut with its default accelerator.
///
/// Accelerators use GTK syntax; `<Primary>` is the platform's command
/// modifier (Cmd on macOS, Ctrl elsewhere).
pub struct BuiltinKeybinding {
    pub id: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub default_accel: &'static str,
    pub intent: Intent,
}

pub const BUILTIN_KEYBINDINGS: &[BuiltinKeybinding] = &[
    BuiltinKeybinding {
        id: "new_file",
        description: "New File",
        category: "File",
        default_accel: "<Primary>n",
        intent: Intent::New,
    },
    BuiltinKeybinding {
        id: "open_file",
        description: "Open File",
        category: "File",
        default_accel: "<Primary>o",
        intent: Intent::Open,
    },
    BuiltinKeybinding {
        id: "save_file",
        description: "Save File",
        category: "File",
        default_accel: "<Primary>s",
        intent: Intent::Save,
    },
    BuiltinKeybinding {
        id: "quit",
        description: "Quit",
        category: "App",
        default_accel: "<Primary>q",
        intent: Intent::Quit,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Mac,
    #[default]
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }

    /// Parse the `platform` settings override.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mac" | "macos" | "darwin" => Some(Platform::Mac),
            "other" | "linux" | "windows" => Some(Platform::Other),
            _ => None,
        }
    }
}

/// Returns the accel string for a given keybinding ID, using the override
/// if present, otherwise the built-in default.
///
/// An override must hold Ctrl, Cmd or `Primary`; the page only intercepts
/// chords with one of those.
pub fn get_accel(id: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(display_str) = overrides.get(id) {
        let accel = parse_keybinding_to_accel(display_str);
        if has_command_modifier(&accel) {
            return accel;
        }
        log::warn!("Ignoring invalid keybinding override for {}: {}", id, display_str);
    }
    BUILTIN_KEYBINDINGS
        .iter()
        .find(|kb| kb.id == id)
        .map(|kb| kb.default_accel.to_string())
        .unwrap_or_default()
}

fn has_command_modifier(accel: &str) -> bool {
    // Platform::Other resolves <Primary> to ctrl.
    parse_accel(accel, Platform::Other).is_some_and(|p| p.ctrl || p.meta)
}

/// Converts an accel string like `"<Primary><Shift>s"` to a human-readable
/// display string like `"Ctrl+Shift+S"` (or `"Cmd+Shift+S"` on macOS).
pub fn accel_to_display(accel: &str, platform: Platform) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut remaining = accel;

    while remaining.starts_with('<') {
        if let Some(end) = remaining.find('>') {
            let modifier = &remaining[1..end];
            let label = match modifier.to_lowercase().as_str() {
                "primary" if platform == Platform::Mac => "Cmd",
                "primary" | "ctrl" | "control" => "Ctrl",
                "meta" | "super" => "Cmd",
                "shift" => "Shift",
                "alt" => "Alt",
                _ => modifier,
            };
            parts.push(label.to_string());
            remaining = &remaining[end + 1..];
        } else {
            break;
        }
    }

    if !remaining.is_empty() {
        parts.push(remaining.to_uppercase());
    }

    parts.join("+")
}

/// Converts a human-readable keybinding string like `"Ctrl+Shift+S"` into an
/// accel string like `"<Ctrl><Shift>s"`. Returns an empty string when the
/// input names an unknown modifier.
pub fn parse_keybinding_to_accel(key: &str) -> String {
    let parts: Vec<&str> = key.split('+').collect();
    let Some((last, modifiers)) = parts.split_last() else {
        return String::new();
    };
    let mut accel = String::new();
    for part in modifiers {
        match part.trim().to_lowercase().as_str() {
            "primary" | "cmdorctrl" => accel.push_str("<Primary>"),
            "ctrl" | "control" => accel.push_str("<Ctrl>"),
            "cmd" | "meta" | "super" => accel.push_str("<Meta>"),
            "shift" => accel.push_str("<Shift>"),
            "alt" => accel.push_str("<Alt>"),
            _ => return String::new(),
        }
    }
    let key = last.trim();
    if key.is_empty() {
        return String::new();
    }
    accel.push_str(&key.to_lowercase());
    accel
}

/// Parsed representation of a keybinding for matching against key events.
///
/// Also sent to the editor page so it can suppress the browser default for
/// intercepted chords without a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAccel {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
    /// The lowercase key name (e.g. "s")
    pub key_lower: String,
}

/// Parse an accel string like `"<Primary>s"` into a `ParsedAccel`, resolving
/// `<Primary>` for the given platform.
pub fn parse_accel(accel: &str, platform: Platform) -> Option<ParsedAccel> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut meta = false;
    let mut remaining = accel;

    while remaining.starts_with('<') {
        if let Some(end) = remaining.find('>') {
            let modifier = &remaining[1..end];
            match modifier.to_lowercase().as_str() {
                "primary" => match platform {
                    Platform::Mac => meta = true,
                    Platform::Other => ctrl = true,
                },
                "ctrl" | "control" => ctrl = true,
                "meta" | "super" => meta = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => {}
            }
            remaining = &remaining[end + 1..];
        } else {
            break;
        }
    }

    if remaining.is_empty() {
        return None;
    }

    Some(ParsedAccel {
        ctrl,
        shift,
        alt,
        meta,
        key_lower: remaining.to_lowercase(),
    })
}

/// A key press as reported by the editor page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

/// Check if a key press matches a `ParsedAccel`. Modifiers must match exactly.
pub fn matches_key(parsed: &ParsedAccel, chord: &KeyChord) -> bool {
    if chord.ctrl != parsed.ctrl
        || chord.shift != parsed.shift
        || chord.alt != parsed.alt
        || chord.meta != parsed.meta
    {
        return false;
    }
    chord.key.to_lowercase() == parsed.key_lower
}

/// Result of resolving a chord: the intent to run, and whether the page must
/// suppress its default handling of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub intent: Intent,
    pub prevent_default: bool,
}

/// Display label for an intent's shortcut, shown as a tooltip on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutLabel {
    pub intent: Intent,
    pub label: String,
}

struct Binding {
    intent: Intent,
    accel: String,
    parsed: ParsedAccel,
}

/// The resolved chord table for one session.
pub struct Keymap {
    platform: Platform,
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn new(platform: Platform, overrides: &HashMap<String, String>) -> Self {
        let bindings = BUILTIN_KEYBINDINGS
            .iter()
            .filter_map(|kb| {
                let accel = get_accel(kb.id, overrides);
                let parsed = parse_accel(&accel, platform)?;
                Some(Binding {
                    intent: kb.intent,
                    accel,
                    parsed,
                })
            })
            .collect();
        Self { platform, bindings }
    }

    pub fn dispatch(&self, chord: &KeyChord) -> Option<Dispatch> {
        self.bindings
            .iter()
            .find(|b| matches_key(&b.parsed, chord))
            .map(|b| Dispatch {
                intent: b.intent,
                prevent_default: true,
            })
    }

    pub fn chord_specs(&self) -> Vec<ParsedAccel> {
        self.bindings.iter().map(|b| b.parsed.clone()).collect()
    }

    pub fn shortcut_labels(&self) -> Vec<ShortcutLabel> {
        self.bindings
            .iter()
            .map(|b| ShortcutLabel {
                intent: b.intent,
                label: accel_to_display(&b.accel, self.platform),
            })
            .collect()
    }
}
