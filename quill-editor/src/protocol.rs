use serde::{Deserialize, Serialize};

use quill_core::format::FormatCommand;
use quill_core::keybindings::{KeyChord, ParsedAccel, ShortcutLabel};
use quill_core::session::Intent;
use quill_core::surface::Notice;

/// Name of the script message handler the page posts events to.
pub const MESSAGE_HANDLER: &str = "quill";

// ---------------------------------------------------------------------------
// Commands: Rust → page (sent via evaluate_javascript)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiCommand {
    SetContent { content: String },
    ExecFormat { command: FormatCommand },
    SetPlaceholderVisible { visible: bool },
    SetBusy { busy: bool },
    ShowNotice { notice: Notice },
    InstallKeymap {
        chords: Vec<ParsedAccel>,
        shortcuts: Vec<ShortcutLabel>,
    },
}

// ---------------------------------------------------------------------------
// Events: page → Rust (sent via postMessage)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    Ready,
    Input { content: String },
    /// The editor gained or lost focus.
    FocusChanged,
    Format { command: FormatCommand },
    Action { intent: Intent },
    KeyDown(KeyChord),
}

pub fn parse_event(json: &str) -> Result<UiEvent, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse UiEvent: {} (json: {})", e, json))
}

/// Build the script that delivers `cmd` to the page's `quillReceiveCommand`.
pub fn command_script(cmd: &UiCommand) -> Result<String, String> {
    let json =
        serde_json::to_string(cmd).map_err(|e| format!("Failed to serialize UiCommand: {}", e))?;
    // Escape for embedding in a JS string literal
    let escaped = json.replace('\\', "\\\\").replace('\'', "\\'");
    Ok(format!("quillReceiveCommand('{}')", escaped))
}
