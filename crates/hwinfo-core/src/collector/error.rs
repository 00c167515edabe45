use std::io;
use std::path::PathBuf;

use crate::size;

/// Error type for collection failures.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The tool could not be started (usually not installed).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The tool ran but reported failure. `code` is -1 when killed by a signal.
    #[error("{program} exited with status {code}: {stderr}")]
    Command {
        program: String,
        code: i32,
        stderr: String,
    },
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Tool output did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Size(#[from] size::ParseError),
}

impl CollectError {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        CollectError::Parse(msg.into())
    }
}
