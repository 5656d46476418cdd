pub mod assets;
pub mod protocol;
pub mod router;
pub mod surface;

pub use router::EventRouter;
pub use surface::ScriptSurface;
