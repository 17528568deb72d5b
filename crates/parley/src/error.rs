use std::io;
use std::path::PathBuf;

use parley_core::{ControllerError, TranscriptError};

/// Errors returned by [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The uploaded file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The session was configured with a blank system prompt or greeting.
    #[error("invalid session setup: {0}")]
    Setup(#[from] TranscriptError),
    /// The submission failed.
    #[error(transparent)]
    Conversation(#[from] ControllerError),
}
