use std::{fmt::Debug, process::ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write to stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("could not read output: {0}")]
    Output(#[source] std::io::Error),

    #[error("{status}")]
    ExitStatus {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}

impl CommandError {
    /// Standard error captured before the failure, empty if the program never produced any.
    pub fn stderr(&self) -> &str {
        match self {
            CommandError::ExitStatus { stderr, .. } => stderr,
            _ => "",
        }
    }

    /// Standard output captured before the failure, empty if the program never produced any.
    pub fn stdout(&self) -> &str {
        match self {
            CommandError::ExitStatus { stdout, .. } => stdout,
            _ => "",
        }
    }
}
