// One error type for the whole crate.
// Every variant states *where* things went wrong. Nothing here is fatal for the
// frame loop: the session logs these and carries on with the next step.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),   // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed

    #[error("Config read error ({path}): {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: usize, height: usize },

    #[error("Palette slot {index} out of range (palette has {len} colors)")]
    PaletteSlotOutOfRange { index: usize, len: usize },

    #[error("Collaborator not wired: {0}")]
    MissingCollaborator(&'static str),

    #[error("No active round")]
    NoActiveRound,
}
