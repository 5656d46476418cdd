pub mod bridge;
pub mod document;
pub mod error;
pub mod format;
pub mod host;
pub mod keybindings;
pub mod session;
pub mod settings;
pub mod surface;

pub use document::Document;
pub use error::HostError;
pub use session::{Intent, Outcome, SessionController, SessionState};
