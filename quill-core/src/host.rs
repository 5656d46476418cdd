//! The privileged side of the file bridge: native dialogs and disk I/O.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::bridge::{BridgeReply, BridgeRequest, HostEndpoint};
use crate::error::HostError;

/// Platform services the host needs from the windowing toolkit.
#[allow(async_fn_in_trait)]
pub trait NativeShell {
    /// Show a single-file picker. `Ok(None)` when the user cancels.
    async fn pick_open_path(&self, start_dir: Option<&Path>) -> Result<Option<PathBuf>, HostError>;
    /// Show a save-destination picker. `Ok(None)` when the user cancels.
    async fn pick_save_path(&self, start_dir: Option<&Path>) -> Result<Option<PathBuf>, HostError>;
    /// End the application.
    fn terminate(&self);
}

/// Serves bridge requests one at a time on behalf of the session.
pub struct PrivilegedHost<S> {
    shell: S,
    last_directory: RefCell<Option<PathBuf>>,
}

impl<S: NativeShell> PrivilegedHost<S> {
    pub fn new(shell: S) -> Self {
        Self {
            shell,
            last_directory: RefCell::new(None),
        }
    }

    pub fn with_last_directory(self, dir: Option<PathBuf>) -> Self {
        *self.last_directory.borrow_mut() = dir;
        self
    }

    /// Directory of the most recently opened or saved file.
    pub fn last_directory(&self) -> Option<PathBuf> {
        self.last_directory.borrow().clone()
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub async fn handle(&self, request: BridgeRequest) -> BridgeReply {
        let channel = request.channel();
        let result = match request {
            BridgeRequest::OpenFile => self
                .open_file()
                .await
                .map(|content| BridgeReply::Opened { content }),
            BridgeRequest::SaveFile { content } => {
                self.save_file(&content).await.map(|()| BridgeReply::Saved)
            }
            BridgeRequest::QuitApp => {
                log::info!("Quit requested");
                self.shell.terminate();
                Ok(BridgeReply::Quitting)
            }
        };
        result.unwrap_or_else(|error| {
            log::error!("Bridge request on {} failed: {}", channel, error);
            BridgeReply::Failed { error }
        })
    }

    /// Process requests until every bridge handle has been dropped.
    pub async fn serve(&self, mut endpoint: HostEndpoint) {
        while let Some((request, reply)) = endpoint.recv().await {
            let channel = request.channel();
            let response = self.handle(request).await;
            if reply.send(response).is_err() {
                log::warn!("Caller on {} went away before the reply", channel);
            }
        }
        log::debug!("File bridge closed");
    }

    async fn open_file(&self) -> Result<Option<String>, HostError> {
        let start = self.last_directory();
        let Some(path) = self.shell.pick_open_path(start.as_deref()).await? else {
            log::debug!("Open dialog canceled");
            return Ok(None);
        };
        let content = std::fs::read_to_string(&path).map_err(|e| HostError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::info!("Opened {} ({} bytes)", path.display(), content.len());
        self.remember_directory(&path);
        Ok(Some(content))
    }

    async fn save_file(&self, content: &str) -> Result<(), HostError> {
        let start = self.last_directory();
        let Some(path) = self.shell.pick_save_path(start.as_deref()).await? else {
            log::debug!("Save dialog canceled");
            return Ok(());
        };
        std::fs::write(&path, content).map_err(|e| HostError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::info!("Saved {} ({} bytes)", path.display(), content.len());
        self.remember_directory(&path);
        Ok(())
    }

    fn remember_directory(&self, file: &Path) {
        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            *self.last_directory.borrow_mut() = Some(parent.to_path_buf());
        }
    }
}
