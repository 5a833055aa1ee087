//! Engine error type. Sampling paths never return these; only the
//! user-driven operations (package ops, speed test, trash) do.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Another long-running operation of the same kind is in flight.
    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("command `{cmd}` failed with exit status {status}")]
    CommandFailed { cmd: String, status: i32 },

    #[error("could not move {path:?} to trash")]
    Trash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
