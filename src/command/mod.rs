//! Execution of external programs with captured output.
mod error;
mod processrunner;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub use error::CommandError;
pub use processrunner::ProcessRunner;

/// A single request to run an external program. It is consumed by [CommandRunner::run].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    stdin: String,
}

impl Invocation {
    pub fn new<P: AsRef<OsStr>>(program: P) -> Self {
        Self {
            program: PathBuf::from(program.as_ref()),
            args: Vec::new(),
            stdin: String::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Content written to the program's standard input. Defaults to empty.
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }
}

/// Output captured from a program that exited successfully.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait that specifies the interface for running a program to completion.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs the program synchronously, returning its output once it has exited. A non-zero exit
    /// status is reported as [CommandError::ExitStatus] carrying whatever was captured.
    fn run(&self, invocation: Invocation) -> Result<CommandOutput, CommandError>;
}
