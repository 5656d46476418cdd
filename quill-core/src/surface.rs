use serde::{Deserialize, Serialize};

use crate::format::FormatCommand;
use crate::keybindings::{ParsedAccel, ShortcutLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-modal message for the user, e.g. a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Capabilities of the rendering surface that displays the document.
///
/// Every call is fire-and-forget; the surface owns the editing engine and
/// reports edits back as events.
pub trait Surface {
    fn set_content(&self, content: &str);
    fn exec_format(&self, command: FormatCommand);
    fn set_placeholder_visible(&self, visible: bool);
    /// Disable or re-enable the New/Open/Save controls.
    fn set_busy(&self, busy: bool);
    fn show_notice(&self, notice: &Notice);
    /// Chords the page must intercept, and labels for its controls.
    fn install_keymap(&self, chords: &[ParsedAccel], shortcuts: &[ShortcutLabel]);
}

/// The questions the session may ask before discarding work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt {
    DiscardForNew,
    DiscardForOpen,
    QuitUnsaved,
}

impl ConfirmPrompt {
    pub fn heading(self) -> &'static str {
        match self {
            ConfirmPrompt::DiscardForNew | ConfirmPrompt::DiscardForOpen => "Unsaved Changes",
            ConfirmPrompt::QuitUnsaved => "Quit Quill?",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            ConfirmPrompt::DiscardForNew => "You have unsaved changes. Create a new file anyway?",
            ConfirmPrompt::DiscardForOpen => "You have unsaved changes. Open another file anyway?",
            ConfirmPrompt::QuitUnsaved => "You have unsaved changes. Quit anyway?",
        }
    }

    pub fn accept_label(self) -> &'static str {
        match self {
            ConfirmPrompt::DiscardForNew | ConfirmPrompt::DiscardForOpen => "Discard",
            ConfirmPrompt::QuitUnsaved => "Quit",
        }
    }
}

/// Asks the user a yes/no question and resolves once they answer.
#[allow(async_fn_in_trait)]
pub trait Confirm {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}
