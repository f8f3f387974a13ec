use crate::errors::{ShellError, ShellResult};
use std::io;
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// Stream bindings for one spawned stage.
pub struct StageIo {
    pub stdin: Stdio,
    pub stdout: Stdio,
    pub stderr: Stdio,
}

/// Start an external command described by a whitespace-normalized stage.
///
/// The program is the first word; `PATH` lookup is left to the OS.
pub fn spawn_stage(stage: &str, io: StageIo) -> ShellResult<Child> {
    let mut words = stage.split_whitespace();
    let program = words.next().ok_or(ShellError::EmptyStage)?;

    let child = Command::new(program)
        .args(words)
        .stdin(io.stdin)
        .stdout(io.stdout)
        .stderr(io.stderr)
        .spawn()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ShellError::CommandNotFound(program.to_string()),
            _ => ShellError::Spawn {
                command: program.to_string(),
                source,
            },
        })?;

    debug!(pid = child.id(), stage, "spawned stage");
    Ok(child)
}
