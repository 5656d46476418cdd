//! The file bridge: the only way the session reaches the privileged host.
//!
//! The capability set is closed. `openFile` and `saveFile` show a native
//! dialog and touch the disk; `quitApp` ends the process. Requests travel as
//! serde-tagged [`BridgeRequest`] values and each gets exactly one
//! [`BridgeReply`].

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::HostError;

pub const OPEN_FILE_CHANNEL: &str = "dialog:openFile";
pub const SAVE_FILE_CHANNEL: &str = "dialog:saveFile";
pub const QUIT_APP_CHANNEL: &str = "app:quit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeRequest {
    OpenFile,
    SaveFile { content: String },
    QuitApp,
}

impl BridgeRequest {
    pub fn channel(&self) -> &'static str {
        match self {
            BridgeRequest::OpenFile => OPEN_FILE_CHANNEL,
            BridgeRequest::SaveFile { .. } => SAVE_FILE_CHANNEL,
            BridgeRequest::QuitApp => QUIT_APP_CHANNEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeReply {
    /// `content` is `None` when the user canceled the picker.
    Opened { content: Option<String> },
    /// Sent whether or not a file was written.
    Saved,
    Quitting,
    Failed { error: HostError },
}

/// The session-side view of the host's capabilities.
///
/// Calls may suspend for as long as a dialog is open; there is no timeout.
#[allow(async_fn_in_trait)]
pub trait FileBridge {
    /// `Ok(None)` means the user canceled the picker.
    async fn open_file(&self) -> Result<Option<String>, HostError>;
    /// Resolves the same way whether the file was written or the dialog was
    /// canceled.
    async fn save_file(&self, content: &str) -> Result<(), HostError>;
    async fn quit_app(&self) -> Result<(), HostError>;
}

type Envelope = (BridgeRequest, oneshot::Sender<BridgeReply>);

/// Bridge handle that forwards requests to a [`HostEndpoint`].
#[derive(Clone)]
pub struct ChannelBridge {
    tx: mpsc::UnboundedSender<Envelope>,
}

/// Receiving half, served by the privileged host.
pub struct HostEndpoint {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

pub fn channel() -> (ChannelBridge, HostEndpoint) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelBridge { tx }, HostEndpoint { rx })
}

impl HostEndpoint {
    /// Wait for the next request. Returns `None` once every bridge handle is
    /// dropped.
    pub async fn recv(&mut self) -> Option<(BridgeRequest, oneshot::Sender<BridgeReply>)> {
        self.rx.recv().await
    }
}

impl ChannelBridge {
    async fn call(&self, request: BridgeRequest) -> Result<BridgeReply, HostError> {
        let channel = request.channel();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send((request, reply_tx)).map_err(|_| {
            log::error!("Bridge request on {} dropped: host is gone", channel);
            HostError::Disconnected
        })?;
        reply_rx.await.map_err(|_| HostError::Disconnected)
    }
}

fn unexpected(channel: &str, reply: BridgeReply) -> HostError {
    log::warn!("Unexpected reply on {}: {:?}", channel, reply);
    HostError::UnexpectedReply {
        channel: channel.to_string(),
    }
}

impl FileBridge for ChannelBridge {
    async fn open_file(&self) -> Result<Option<String>, HostError> {
        match self.call(BridgeRequest::OpenFile).await? {
            BridgeReply::Opened { content } => Ok(content),
            BridgeReply::Failed { error } => Err(error),
            other => Err(unexpected(OPEN_FILE_CHANNEL, other)),
        }
    }

    async fn save_file(&self, content: &str) -> Result<(), HostError> {
        let request = BridgeRequest::SaveFile {
            content: content.to_string(),
        };
        match self.call(request).await? {
            BridgeReply::Saved => Ok(()),
            BridgeReply::Failed { error } => Err(error),
            other => Err(unexpected(SAVE_FILE_CHANNEL, other)),
        }
    }

    async fn quit_app(&self) -> Result<(), HostError> {
        match self.call(BridgeRequest::QuitApp).await? {
            BridgeReply::Quitting => Ok(()),
            BridgeReply::Failed { error } => Err(error),
            other => Err(unexpected(QUIT_APP_CHANNEL, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_format() {
        let json = serde_json::to_string(&BridgeRequest::SaveFile {
            content: "<p>x</p>".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"SaveFile","content":"<p>x</p>"}"#);
        assert_eq!(
            serde_json::to_string(&BridgeRequest::OpenFile).unwrap(),
            r#"{"type":"OpenFile"}"#
        );
    }

    #[test]
    fn canceled_open_reply_has_null_content() {
        let json = serde_json::to_string(&BridgeReply::Opened { content: None }).unwrap();
        assert_eq!(json, r#"{"type":"Opened","content":null}"#);
    }

    #[test]
    fn channels_are_fixed() {
        assert_eq!(BridgeRequest::OpenFile.channel(), "dialog:openFile");
        assert_eq!(
            BridgeRequest::SaveFile {
                content: String::new()
            }
            .channel(),
            "dialog:saveFile"
        );
        assert_eq!(BridgeRequest::QuitApp.channel(), "app:quit");
    }

    #[tokio::test]
    async fn open_round_trips_through_endpoint() {
        let (bridge, mut endpoint) = channel();
        let host = async move {
            let (request, reply) = endpoint.recv().await.unwrap();
            assert_eq!(request, BridgeRequest::OpenFile);
            reply
                .send(BridgeReply::Opened {
                    content: Some("hello".to_string()),
                })
                .unwrap();
        };
        let (opened, ()) = tokio::join!(bridge.open_file(), host);
        assert_eq!(opened, Ok(Some("hello".to_string())));
    }

    #[tokio::test]
    async fn failure_reply_becomes_error() {
        let (bridge, mut endpoint) = channel();
        let error = HostError::Write {
            path: "/ro/file".to_string(),
            message: "read-only file system".to_string(),
        };
        let expected = error.clone();
        let host = async move {
            let (request, reply) = endpoint.recv().await.unwrap();
            assert_eq!(
                request,
                BridgeRequest::SaveFile {
                    content: "body".to_string()
                }
            );
            reply.send(BridgeReply::Failed { error }).unwrap();
        };
        let (saved, ()) = tokio::join!(bridge.save_file("body"), host);
        assert_eq!(saved, Err(expected));
    }

    #[tokio::test]
    async fn mismatched_reply_is_rejected() {
        let (bridge, mut endpoint) = channel();
        let host = async move {
            let (_request, reply) = endpoint.recv().await.unwrap();
            reply.send(BridgeReply::Saved).unwrap();
        };
        let (opened, ()) = tokio::join!(bridge.open_file(), host);
        assert_eq!(
            opened,
            Err(HostError::UnexpectedReply {
                channel: OPEN_FILE_CHANNEL.to_string()
            })
        );
    }

    #[tokio::test]
    async fn dropped_host_is_disconnected() {
        let (bridge, endpoint) = channel();
        drop(endpoint);
        assert_eq!(bridge.quit_app().await, Err(HostError::Disconnected));
    }

    #[tokio::test]
    async fn host_dropping_reply_is_disconnected() {
        let (bridge, mut endpoint) = channel();
        let host = async move {
            let (_request, reply) = endpoint.recv().await.unwrap();
            drop(reply);
        };
        let (opened, ()) = tokio::join!(bridge.open_file(), host);
        assert_eq!(opened, Err(HostError::Disconnected));
    }
}
