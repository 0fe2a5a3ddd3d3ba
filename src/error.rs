use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that abort a whole command.
///
/// Per-branch deletion failures are not represented here; they are collected
/// into a [`crate::report::DeletionReport`] instead.
#[derive(Error, Debug)]
pub enum GbmError {
    /// The external tool could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external tool ran but exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    Execution {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GbmError>;
