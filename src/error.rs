//! Error types for scrollscape.
//!
//! Only the outer surfaces can fail at runtime: reading configuration, creating the
//! window and GPU context, and restoring a transform snapshot. Misuse of the scene
//! graph (for example a node handle from another scene) is a programmer error and
//! panics instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration or snapshot file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON configuration or snapshot could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Window or event loop creation errors
    #[error("Window error: {0}")]
    Window(String),

    /// Adapter, device or surface errors
    #[error("Graphics error: {0}")]
    Graphics(String),

    /// A snapshot does not describe the scene it is applied to
    #[error("Snapshot mismatch: scene has {expected} nodes, snapshot has {found}")]
    SnapshotMismatch { expected: usize, found: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
