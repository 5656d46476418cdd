use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formatting operations the toolbar may forward to the rendering surface.
///
/// Serialized with the surface's native command names (`"bold"`,
/// `"justifyCenter"`, ...). Anything outside this set is rejected before it
/// reaches the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    InsertOrderedList,
    InsertUnorderedList,
    Indent,
    Outdent,
    RemoveFormat,
}

impl FormatCommand {
    /// Toolbar order.
    pub const ALL: &'static [FormatCommand] = &[
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::StrikeThrough,
        FormatCommand::JustifyLeft,
        FormatCommand::JustifyCenter,
        FormatCommand::JustifyRight,
        FormatCommand::JustifyFull,
        FormatCommand::InsertOrderedList,
        FormatCommand::InsertUnorderedList,
        FormatCommand::Indent,
        FormatCommand::Outdent,
        FormatCommand::RemoveFormat,
    ];

    pub fn command_name(self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::StrikeThrough => "strikeThrough",
            FormatCommand::JustifyLeft => "justifyLeft",
            FormatCommand::JustifyCenter => "justifyCenter",
            FormatCommand::JustifyRight => "justifyRight",
            FormatCommand::JustifyFull => "justifyFull",
            FormatCommand::InsertOrderedList => "insertOrderedList",
            FormatCommand::InsertUnorderedList => "insertUnorderedList",
            FormatCommand::Indent => "indent",
            FormatCommand::Outdent => "outdent",
            FormatCommand::RemoveFormat => "removeFormat",
        }
    }

    /// Tooltip shown on the toolbar button.
    pub fn label(self) -> &'static str {
        match self {
            FormatCommand::Bold => "Bold",
            FormatCommand::Italic => "Italic",
            FormatCommand::Underline => "Underline",
            FormatCommand::StrikeThrough => "Strikethrough",
            FormatCommand::JustifyLeft => "Align Left",
            FormatCommand::JustifyCenter => "Align Center",
            FormatCommand::JustifyRight => "Align Right",
            FormatCommand::JustifyFull => "Justify",
            FormatCommand::InsertOrderedList => "Numbered List",
            FormatCommand::InsertUnorderedList => "Bulleted List",
            FormatCommand::Indent => "Indent",
            FormatCommand::Outdent => "Outdent",
            FormatCommand::RemoveFormat => "Clear Formatting",
        }
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

impl FromStr for FormatCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatCommand::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.command_name() == s)
            .ok_or_else(|| format!("Unsupported format command: {}", s))
    }
}
