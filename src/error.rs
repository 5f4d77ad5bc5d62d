//! Error types for the biclique wrapper

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to launch '{program}': {source}")]
    ProcedureLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' terminated unsuccessfully ({status}): {stderr}")]
    ProcedureFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Parse error in line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The enumerator output names an id the codec never assigned
    #[error("{side}-side node id {id} out of range (0..{num_nodes})")]
    UnknownId {
        side: &'static str,
        id: u32,
        num_nodes: u32,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
