use std::{
    io::{ErrorKind, Write},
    process::{Child, ChildStdin, Command, Stdio},
    thread::{self, JoinHandle},
};

use tracing::debug;

use super::{CommandError, CommandOutput, CommandRunner, Invocation};

/// [CommandRunner] spawning one OS process per invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: Invocation) -> Result<CommandOutput, CommandError> {
        let Invocation {
            program,
            args,
            stdin,
        } = invocation;

        debug!(program = %program.display(), ?args, "running command");

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        // Empty input closes the pipe right away so the child sees EOF.
        let writer = match child.stdin.take() {
            Some(pipe) if !stdin.is_empty() => match write_stdin(pipe, stdin) {
                Ok(writer) => Some(writer),
                Err(err) => {
                    kill_and_reap(&mut child);
                    return Err(err);
                }
            },
            _ => None,
        };

        let output = child.wait_with_output().map_err(CommandError::Output)?;

        if let Some(writer) = writer {
            writer.join().map_err(|_| {
                CommandError::Stdin(std::io::Error::other("stdin writer panicked"))
            })??;
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            debug!(program = %program.display(), status = %output.status, %stderr, "command failed");
            return Err(CommandError::ExitStatus {
                status: output.status,
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Feeds `input` to the child from its own thread, so a child producing output before consuming
/// its input cannot dead-lock against us.
fn write_stdin(
    mut pipe: ChildStdin,
    input: String,
) -> Result<JoinHandle<Result<(), CommandError>>, CommandError> {
    thread::Builder::new()
        .name("stdin-writer".to_string())
        .spawn(move || match pipe.write_all(input.as_bytes()) {
            // the child is allowed to exit without reading its input
            Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
            result => result.map_err(CommandError::Stdin),
        })
        .map_err(CommandError::Stdin)
}

/// Stops a child that can no longer be driven to completion, so it is not left as a zombie.
fn kill_and_reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(pid = child.id(), %err, "could not kill command");
    }
    if let Err(err) = child.wait() {
        debug!(pid = child.id(), %err, "could not wait for killed command");
    }
}
