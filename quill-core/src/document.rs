/// The one document of a running session.
///
/// `content` is an opaque markup blob handed back and forth with the
/// rendering surface; it is never parsed except to decide whether the
/// placeholder should show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    content: String,
    dirty: bool,
    /// Bumped by every edit since the content was last replaced.
    revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the content may differ from what was last opened or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True when the raw markup is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Whether the "start typing" placeholder should be visible.
    ///
    /// Derived from the text content, so `<p></p>` still counts as empty.
    pub fn placeholder_visible(&self) -> bool {
        text_content(&self.content).trim().is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record an edit reported by the surface.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.mark_dirty();
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Clear the dirty flag if nothing changed since `revision` was taken.
    /// Returns whether the document is now clean.
    pub fn mark_saved(&mut self, revision: u64) -> bool {
        if self.revision == revision {
            self.dirty = false;
        }
        !self.dirty
    }

    /// Replace the content with freshly opened text.
    pub fn replace(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = false;
        self.revision = 0;
    }

    pub fn clear(&mut self) {
        self.replace(String::new());
    }
}

/// Strip markup tags and decode `&nbsp;`, approximating the DOM's
/// `textContent` closely enough for an emptiness check.
pub fn text_content(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
}
