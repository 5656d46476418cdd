use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use libadwaita::prelude::*;

use quill_core::error::HostError;
use quill_core::host::NativeShell;
use quill_core::surface::{Confirm, ConfirmPrompt};

/// Native file dialogs and window lifetime for the privileged host.
pub struct GtkShell {
    window: adw::ApplicationWindow,
    quitting: Rc<Cell<bool>>,
}

impl GtkShell {
    pub fn new(window: &adw::ApplicationWindow, quitting: Rc<Cell<bool>>) -> Self {
        Self {
            window: window.clone(),
            quitting,
        }
    }
}

impl NativeShell for GtkShell {
    async fn pick_open_path(&self, start_dir: Option<&Path>) -> Result<Option<PathBuf>, HostError> {
        let dialog = gtk4::FileDialog::builder()
            .title("Open File")
            .modal(true)
            .build();
        if let Some(dir) = start_dir {
            dialog.set_initial_folder(Some(&gio::File::for_path(dir)));
        }
        picked_path(dialog.open_future(Some(&self.window)).await)
    }

    async fn pick_save_path(&self, start_dir: Option<&Path>) -> Result<Option<PathBuf>, HostError> {
        let dialog = gtk4::FileDialog::builder()
            .title("Save File")
            .modal(true)
            .initial_name("Untitled.html")
            .build();
        if let Some(dir) = start_dir {
            dialog.set_initial_folder(Some(&gio::File::for_path(dir)));
        }
        picked_path(dialog.save_future(Some(&self.window)).await)
    }

    fn terminate(&self) {
        // Closing the last window ends the application; the flag lets the
        // close handler skip its unsaved-changes check.
        self.quitting.set(true);
        self.window.close();
    }
}

fn picked_path(result: Result<gio::File, glib::Error>) -> Result<Option<PathBuf>, HostError> {
    match result {
        Ok(file) => file.path().map(Some).ok_or_else(|| HostError::DialogUnavailable {
            message: format!("{} is not a local file", file.uri()),
        }),
        Err(e)
            if e.matches(gtk4::DialogError::Dismissed)
                || e.matches(gtk4::DialogError::Cancelled) =>
        {
            Ok(None)
        }
        Err(e) => Err(HostError::DialogUnavailable {
            message: e.to_string(),
        }),
    }
}

/// Confirmation prompts shown as libadwaita alert dialogs.
pub struct AlertConfirm {
    window: adw::ApplicationWindow,
}

impl AlertConfirm {
    pub fn new(window: &adw::ApplicationWindow) -> Self {
        Self {
            window: window.clone(),
        }
    }
}

impl Confirm for AlertConfirm {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        let dialog = adw::AlertDialog::builder()
            .heading(prompt.heading())
            .body(prompt.body())
            .build();
        dialog.add_response("cancel", "Cancel");
        dialog.add_response("accept", prompt.accept_label());
        dialog.set_response_appearance("accept", adw::ResponseAppearance::Destructive);
        dialog.set_default_response(Some("cancel"));
        dialog.set_close_response("cancel");

        let (tx, rx) = tokio::sync::oneshot::channel();
        let tx = RefCell::new(Some(tx));
        dialog.connect_response(None, move |_dialog, response| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(response == "accept");
            }
        });
        dialog.present(Some(&self.window));

        rx.await.unwrap_or(false)
    }
}
