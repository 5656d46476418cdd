use std::cell::Cell;

use quill_core::format::FormatCommand;
use quill_core::keybindings::{ParsedAccel, ShortcutLabel};
use quill_core::surface::{Notice, Surface};

use crate::protocol::{self, UiCommand};

/// [`Surface`] implementation that drives the editor page by evaluating
/// scripts in its WebView.
///
/// `evaluate` receives a ready-to-run script; the frontend passes it to the
/// WebView. Commands sent before the page reports `Ready` are dropped, since
/// the page's `quillReceiveCommand` does not exist yet.
pub struct ScriptSurface<F> {
    evaluate: F,
    is_ready: Cell<bool>,
}

impl<F: Fn(&str)> ScriptSurface<F> {
    pub fn new(evaluate: F) -> Self {
        Self {
            evaluate,
            is_ready: Cell::new(false),
        }
    }

    pub fn mark_ready(&self) {
        self.is_ready.set(true);
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready.get()
    }

    fn send_command(&self, cmd: &UiCommand) {
        if !self.is_ready.get() {
            log::warn!("Editor page not ready yet, dropping {:?}", cmd);
            return;
        }
        match protocol::command_script(cmd) {
            Ok(script) => (self.evaluate)(&script),
            Err(e) => log::error!("{}", e),
        }
    }
}

impl<F: Fn(&str)> Surface for ScriptSurface<F> {
    fn set_content(&self, content: &str) {
        self.send_command(&UiCommand::SetContent {
            content: content.to_string(),
        });
    }

    fn exec_format(&self, command: FormatCommand) {
        self.send_command(&UiCommand::ExecFormat { command });
    }

    fn set_placeholder_visible(&self, visible: bool) {
        self.send_command(&UiCommand::SetPlaceholderVisible { visible });
    }

    fn set_busy(&self, busy: bool) {
        self.send_command(&UiCommand::SetBusy { busy });
    }

    fn show_notice(&self, notice: &Notice) {
        self.send_command(&UiCommand::ShowNotice {
            notice: notice.clone(),
        });
    }

    fn install_keymap(&self, chords: &[ParsedAccel], shortcuts: &[ShortcutLabel]) {
        self.send_command(&UiCommand::InstallKeymap {
            chords: chords.to_vec(),
            shortcuts: shortcuts.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (ScriptSurface<impl Fn(&str)>, Rc<RefCell<Vec<String>>>) {
        let scripts = Rc::new(RefCell::new(Vec::new()));
        let sink = scripts.clone();
        let surface = ScriptSurface::new(move |script: &str| sink.borrow_mut().push(script.to_string()));
        (surface, scripts)
    }

    #[test]
    fn drops_commands_before_ready() {
        let (surface, scripts) = recording();
        surface.set_content("early");
        assert!(scripts.borrow().is_empty());

        surface.mark_ready();
        surface.set_content("late");
        assert_eq!(scripts.borrow().len(), 1);
        assert!(scripts.borrow()[0].contains("late"));
    }

    #[test]
    fn notices_carry_level_and_message() {
        let (surface, scripts) = recording();
        surface.mark_ready();
        surface.show_notice(&Notice::error("disk full"));
        assert_eq!(
            scripts.borrow()[0],
            r#"quillReceiveCommand('{"type":"ShowNotice","notice":{"level":"error","message":"disk full"}}')"#
        );
    }
}
