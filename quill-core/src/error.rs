use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure on the privileged side of the file bridge.
///
/// A canceled dialog is never a `HostError`; it comes back as an absent
/// result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostError {
    #[error("file dialog unavailable: {message}")]
    DialogUnavailable { message: String },

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("unexpected reply on {channel}")]
    UnexpectedReply { channel: String },

    #[error("the host is no longer running")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_and_cause() {
        let err = HostError::Read {
            path: "/tmp/notes.html".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read /tmp/notes.html: permission denied"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&HostError::Disconnected).unwrap();
        assert_eq!(json, r#"{"kind":"disconnected"}"#);

        let parsed: HostError =
            serde_json::from_str(r#"{"kind":"dialog_unavailable","message":"no portal"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            HostError::DialogUnavailable {
                message: "no portal".to_string()
            }
        );
    }
}
