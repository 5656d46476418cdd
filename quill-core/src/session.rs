//! The session controller: owns the document, gates destructive actions
//! behind confirmation and drives the file bridge.
//!
//! All operations run on one logical thread. They take `&self` and keep
//! their state in `Cell`/`RefCell`, so a UI callback that fires while a
//! dialog is open sees [`SessionState`] and gets [`Outcome::Busy`] instead of
//! a borrow panic.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};

use crate::bridge::FileBridge;
use crate::document::Document;
use crate::error::HostError;
use crate::format::FormatCommand;
use crate::surface::{Confirm, ConfirmPrompt, Notice, Surface};

/// A user-requested file/session action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    New,
    Open,
    Save,
    Quit,
}

impl Intent {
    fn verb(self) -> &'static str {
        match self {
            Intent::New => "create a new file",
            Intent::Open => "open the file",
            Intent::Save => "save the file",
            Intent::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Waiting for the user to answer a confirmation prompt.
    PromptingConfirmation(Intent),
    /// Waiting for the host to finish a bridge call.
    AwaitingHost(Intent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed,
    /// Confirmation declined or picker canceled; the document is untouched.
    Aborted,
    /// Another action was still pending.
    Busy,
    /// The host failed; the user was notified and the document is untouched.
    Failed(HostError),
}

pub struct SessionController<B, C, S> {
    document: RefCell<Document>,
    state: Cell<SessionState>,
    bridge: B,
    confirm: C,
    surface: S,
    confirm_discard_on_open: bool,
}

/// Returns the session to `Idle` when a pending step ends, even if the
/// awaiting future is dropped.
struct Pending<'a, B, C, S: Surface> {
    session: &'a SessionController<B, C, S>,
    busy: bool,
}

impl<B, C, S: Surface> Drop for Pending<'_, B, C, S> {
    fn drop(&mut self) {
        self.session.state.set(SessionState::Idle);
        if self.busy {
            self.session.surface.set_busy(false);
        }
    }
}

impl<B, C, S> SessionController<B, C, S>
where
    B: FileBridge,
    C: Confirm,
    S: Surface,
{
    pub fn new(bridge: B, confirm: C, surface: S) -> Self {
        Self {
            document: RefCell::new(Document::new()),
            state: Cell::new(SessionState::Idle),
            bridge,
            confirm,
            surface,
            confirm_discard_on_open: false,
        }
    }

    /// Ask before Open replaces unsaved changes. Off by default.
    pub fn with_open_confirmation(mut self, enabled: bool) -> Self {
        self.confirm_discard_on_open = enabled;
        self
    }

    pub fn document(&self) -> Document {
        self.document.borrow().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.borrow().is_dirty()
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn confirmer(&self) -> &C {
        &self.confirm
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Push the current document to a freshly loaded surface.
    pub fn ready(&self) {
        self.sync_surface();
    }

    pub async fn run(&self, intent: Intent) -> Outcome {
        match intent {
            Intent::New => self.new_document().await,
            Intent::Open => self.open().await,
            Intent::Save => self.save().await,
            Intent::Quit => self.quit().await,
        }
    }

    /// Start over with an empty document, asking first if there is unsaved
    /// non-empty content.
    pub async fn new_document(&self) -> Outcome {
        if !self.is_idle(Intent::New) {
            return Outcome::Busy;
        }
        if self.has_unsaved_content() && !self.ask(Intent::New, ConfirmPrompt::DiscardForNew).await
        {
            log::info!("New file canceled; keeping unsaved changes");
            return Outcome::Aborted;
        }
        self.document.borrow_mut().clear();
        self.sync_surface();
        log::info!("Started a new document");
        Outcome::Executed
    }

    /// Replace the document with a file picked by the user.
    ///
    /// Unsaved changes are not guarded unless open confirmation is enabled.
    pub async fn open(&self) -> Outcome {
        if !self.is_idle(Intent::Open) {
            return Outcome::Busy;
        }
        if self.confirm_discard_on_open
            && self.has_unsaved_content()
            && !self.ask(Intent::Open, ConfirmPrompt::DiscardForOpen).await
        {
            log::info!("Open canceled; keeping unsaved changes");
            return Outcome::Aborted;
        }

        let result = {
            let _pending = self.enter_host_call(Intent::Open);
            self.bridge.open_file().await
        };

        match result {
            Ok(Some(content)) => {
                self.document.borrow_mut().replace(content);
                self.sync_surface();
                Outcome::Executed
            }
            Ok(None) => Outcome::Aborted,
            Err(error) => self.fail(Intent::Open, error),
        }
    }

    /// Hand the current content to the host's save dialog.
    ///
    /// The bridge does not say whether anything was written, so a resolved
    /// call leaves the document clean, including a canceled dialog. Edits
    /// made while the dialog was open keep it dirty.
    pub async fn save(&self) -> Outcome {
        if !self.is_idle(Intent::Save) {
            return Outcome::Busy;
        }
        let (content, revision) = {
            let doc = self.document.borrow();
            (doc.content().to_string(), doc.revision())
        };

        let result = {
            let _pending = self.enter_host_call(Intent::Save);
            self.bridge.save_file(&content).await
        };

        match result {
            Ok(()) => {
                if !self.document.borrow_mut().mark_saved(revision) {
                    log::info!("Document changed while saving; keeping it dirty");
                }
                Outcome::Executed
            }
            Err(error) => self.fail(Intent::Save, error),
        }
    }

    /// Ask the host to terminate, confirming first if the document is dirty.
    pub async fn quit(&self) -> Outcome {
        if !self.is_idle(Intent::Quit) {
            return Outcome::Busy;
        }
        if self.is_dirty() && !self.ask(Intent::Quit, ConfirmPrompt::QuitUnsaved).await {
            log::info!("Quit canceled; keeping unsaved changes");
            return Outcome::Aborted;
        }

        let result = {
            let _pending = self.enter_host_call(Intent::Quit);
            self.bridge.quit_app().await
        };

        match result {
            Ok(()) => Outcome::Executed,
            Err(error) => self.fail(Intent::Quit, error),
        }
    }

    pub fn apply_format(&self, command: FormatCommand) {
        self.surface.exec_format(command);
        self.document.borrow_mut().mark_dirty();
    }

    /// Record an edit reported by the surface.
    pub fn content_changed(&self, content: impl Into<String>) {
        let placeholder = {
            let mut doc = self.document.borrow_mut();
            doc.edit(content);
            doc.placeholder_visible()
        };
        self.surface.set_placeholder_visible(placeholder);
    }

    /// Re-push placeholder visibility, e.g. when the editor gains or loses
    /// focus.
    pub fn refresh_placeholder(&self) {
        let visible = self.document.borrow().placeholder_visible();
        self.surface.set_placeholder_visible(visible);
    }

    fn is_idle(&self, intent: Intent) -> bool {
        match self.state.get() {
            SessionState::Idle => true,
            pending => {
                log::warn!("Ignoring {:?} while {:?}", intent, pending);
                false
            }
        }
    }

    fn has_unsaved_content(&self) -> bool {
        let doc = self.document.borrow();
        doc.is_dirty() && !doc.is_blank()
    }

    async fn ask(&self, intent: Intent, prompt: ConfirmPrompt) -> bool {
        self.state.set(SessionState::PromptingConfirmation(intent));
        let _pending = Pending {
            session: self,
            busy: false,
        };
        self.confirm.confirm(prompt).await
    }

    fn enter_host_call(&self, intent: Intent) -> Pending<'_, B, C, S> {
        self.state.set(SessionState::AwaitingHost(intent));
        self.surface.set_busy(true);
        Pending {
            session: self,
            busy: true,
        }
    }

    fn fail(&self, intent: Intent, error: HostError) -> Outcome {
        log::error!("Could not {}: {}", intent.verb(), error);
        self.surface
            .show_notice(&Notice::error(format!("Could not {}: {}", intent.verb(), error)));
        Outcome::Failed(error)
    }

    fn sync_surface(&self) {
        let (content, placeholder) = {
            let doc = self.document.borrow();
            (doc.content().to_string(), doc.placeholder_visible())
        };
        self.surface.set_content(&content);
        self.surface.set_placeholder_visible(placeholder);
    }
}
