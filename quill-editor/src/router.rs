use quill_core::bridge::FileBridge;
use quill_core::keybindings::Keymap;
use quill_core::session::{Outcome, SessionController};
use quill_core::surface::{Confirm, Surface};

use crate::protocol::{self, UiEvent};
use crate::surface::ScriptSurface;

/// Routes events posted by the editor page to the session controller.
pub struct EventRouter<B, C, F> {
    session: SessionController<B, C, ScriptSurface<F>>,
    keymap: Keymap,
}

impl<B, C, F> EventRouter<B, C, F>
where
    B: FileBridge,
    C: Confirm,
    F: Fn(&str),
{
    pub fn new(session: SessionController<B, C, ScriptSurface<F>>, keymap: Keymap) -> Self {
        Self { session, keymap }
    }

    pub fn session(&self) -> &SessionController<B, C, ScriptSurface<F>> {
        &self.session
    }

    /// Parse and handle a raw message from the page. Malformed messages are
    /// logged and dropped.
    pub async fn handle_json(&self, json: &str) -> Option<Outcome> {
        match protocol::parse_event(json) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    /// Handle one page event. Returns the outcome when the event ran a
    /// New/Open/Save/Quit action.
    pub async fn handle(&self, event: UiEvent) -> Option<Outcome> {
        match event {
            UiEvent::Ready => {
                let surface = self.session.surface();
                surface.mark_ready();
                surface.install_keymap(
                    &self.keymap.chord_specs(),
                    &self.keymap.shortcut_labels(),
                );
                self.session.ready();
                None
            }
            UiEvent::Input { content } => {
                self.session.content_changed(content);
                None
            }
            UiEvent::FocusChanged => {
                self.session.refresh_placeholder();
                None
            }
            UiEvent::Format { command } => {
                self.session.apply_format(command);
                None
            }
            UiEvent::Action { intent } => Some(self.session.run(intent).await),
            UiEvent::KeyDown(chord) => {
                let dispatch = self.keymap.dispatch(&chord)?;
                log::debug!("{:?} → {:?}", chord, dispatch.intent);
                Some(self.session.run(dispatch.intent).await)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::error::HostError;
    use quill_core::keybindings::Platform;
    use quill_core::session::Intent;
    use quill_core::surface::ConfirmPrompt;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct StubBridge {
        saved: RefCell<Vec<String>>,
        quit_calls: Cell<usize>,
    }

    impl FileBridge for StubBridge {
        async fn open_file(&self) -> Result<Option<String>, HostError> {
            Ok(Some("<p>opened</p>".to_string()))
        }

        async fn save_file(&self, content: &str) -> Result<(), HostError> {
            self.saved.borrow_mut().push(content.to_string());
            Ok(())
        }

        async fn quit_app(&self) -> Result<(), HostError> {
            self.quit_calls.set(self.quit_calls.get() + 1);
            Ok(())
        }
    }

    struct Decline;

    impl Confirm for Decline {
        async fn confirm(&self, _prompt: ConfirmPrompt) -> bool {
            false
        }
    }

    type Scripts = Rc<RefCell<Vec<String>>>;

    fn router(platform: Platform) -> (EventRouter<StubBridge, Decline, impl Fn(&str)>, Scripts) {
        let scripts: Scripts = Rc::new(RefCell::new(Vec::new()));
        let sink = scripts.clone();
        let surface = ScriptSurface::new(move |script: &str| sink.borrow_mut().push(script.to_string()));
        let session = SessionController::new(StubBridge::default(), Decline, surface);
        let keymap = Keymap::new(platform, &HashMap::new());
        (EventRouter::new(session, keymap), scripts)
    }

    #[tokio::test]
    async fn ready_installs_keymap_and_pushes_document() {
        let (router, scripts) = router(Platform::Other);
        assert_eq!(router.handle_json(r#"{"type":"Ready"}"#).await, None);

        let scripts = scripts.borrow();
        assert!(scripts[0].contains("InstallKeymap"));
        assert!(scripts[0].contains(r#"{"intent":"save","label":"Ctrl+S"}"#));
        assert!(scripts.iter().any(|s| s.contains("SetContent")));
        assert!(scripts
            .iter()
            .any(|s| s.contains(r#""type":"SetPlaceholderVisible","visible":true"#)));
    }

    #[tokio::test]
    async fn input_marks_dirty() {
        let (router, _) = router(Platform::Other);
        router
            .handle_json(r#"{"type":"Input","content":"<p>hi</p>"}"#)
            .await;
        assert!(router.session().is_dirty());
        assert_eq!(router.session().document().content(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn focus_change_refreshes_placeholder() {
        let (router, scripts) = router(Platform::Other);
        router.handle_json(r#"{"type":"Ready"}"#).await;
        router
            .handle_json(r#"{"type":"Input","content":"<p>hi</p>"}"#)
            .await;
        scripts.borrow_mut().clear();

        router.handle_json(r#"{"type":"FocusChanged"}"#).await;
        assert_eq!(
            *scripts.borrow(),
            vec![r#"quillReceiveCommand('{"type":"SetPlaceholderVisible","visible":false}')"#]
        );
    }

    #[tokio::test]
    async fn format_event_forwards_command() {
        let (router, scripts) = router(Platform::Other);
        router.handle_json(r#"{"type":"Ready"}"#).await;
        router
            .handle_json(r#"{"type":"Format","command":"italic"}"#)
            .await;
        assert!(router.session().is_dirty());
        assert!(scripts
            .borrow()
            .iter()
            .any(|s| s.contains(r#""type":"ExecFormat","command":"italic""#)));
    }

    #[tokio::test]
    async fn ctrl_s_saves_off_mac() {
        let (router, _) = router(Platform::Other);
        router
            .handle_json(r#"{"type":"Input","content":"body"}"#)
            .await;
        let outcome = router
            .handle_json(r#"{"type":"KeyDown","key":"s","ctrl":true}"#)
            .await;
        assert_eq!(outcome, Some(Outcome::Executed));
        assert_eq!(*router.session().bridge().saved.borrow(), vec!["body"]);
        assert!(!router.session().is_dirty());
    }

    #[tokio::test]
    async fn meta_s_does_nothing_off_mac() {
        let (router, _) = router(Platform::Other);
        let outcome = router
            .handle_json(r#"{"type":"KeyDown","key":"s","meta":true}"#)
            .await;
        assert_eq!(outcome, None);
        assert!(router.session().bridge().saved.borrow().is_empty());
    }

    #[tokio::test]
    async fn meta_o_opens_on_mac() {
        let (router, _) = router(Platform::Mac);
        let outcome = router
            .handle_json(r#"{"type":"KeyDown","key":"o","meta":true}"#)
            .await;
        assert_eq!(outcome, Some(Outcome::Executed));
        assert_eq!(router.session().document().content(), "<p>opened</p>");
    }

    #[tokio::test]
    async fn plain_key_is_ignored() {
        let (router, _) = router(Platform::Other);
        let outcome = router
            .handle_json(r#"{"type":"KeyDown","key":"q"}"#)
            .await;
        assert_eq!(outcome, None);
        assert_eq!(router.session().bridge().quit_calls.get(), 0);
    }

    #[tokio::test]
    async fn quit_action_with_unsaved_changes_is_declined() {
        let (router, _) = router(Platform::Other);
        router
            .handle_json(r#"{"type":"Input","content":"x"}"#)
            .await;
        let outcome = router
            .handle(UiEvent::Action {
                intent: Intent::Quit,
            })
            .await;
        assert_eq!(outcome, Some(Outcome::Aborted));
        assert_eq!(router.session().bridge().quit_calls.get(), 0);
    }

    #[tokio::test]
    async fn malformed_message_is_dropped() {
        let (router, _) = router(Platform::Other);
        assert_eq!(router.handle_json(r#"{"type":"Eval","code":"x"}"#).await, None);
        assert!(!router.session().is_dirty());
    }
}
