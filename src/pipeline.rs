use crate::commands::external::{spawn_stage, StageIo};
use crate::errors::{ShellError, ShellResult};
use crate::redirection::Redirection;
use std::collections::VecDeque;
use std::fs::File;
use std::process::{Child, ChildStdout, Stdio};
use tracing::{debug, warn};

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split one input line into pipeline stages.
///
/// Blank input yields no stages. Every `|` divides stages; there is no escaping.
pub fn tokenize(line: &str) -> Vec<String> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split('|').map(normalize_whitespace).collect()
}

/// One started stage.
struct StageProcess {
    stage: String,
    child: Child,
}

/// Started stages that have not been waited yet.
///
/// Dropping it waits on whatever is left, so no child outlives the
/// pipeline unreaped. Stages are never killed: once started they run to
/// completion or natural failure.
struct RunningPipeline {
    processes: VecDeque<StageProcess>,
}

impl RunningPipeline {
    /// Start every stage in order. The last stage writes stdout and stderr
    /// to `sink` when there is one.
    fn start(stages: &[String], mut sink: Option<File>) -> ShellResult<Self> {
        let mut pipeline = RunningPipeline {
            processes: VecDeque::with_capacity(stages.len()),
        };
        let mut previous_stdout: Option<ChildStdout> = None;

        for (i, stage) in stages.iter().enumerate() {
            let is_last = i == stages.len() - 1;

            let stdin = match previous_stdout.take() {
                Some(out) => Stdio::from(out),
                None => Stdio::inherit(),
            };
            let target = if is_last { sink.take() } else { None };
            let (stdout, stderr) = match target {
                Some(file) => {
                    let err = file.try_clone()?;
                    (Stdio::from(file), Stdio::from(err))
                }
                None if is_last => (Stdio::inherit(), Stdio::inherit()),
                None => (Stdio::piped(), Stdio::inherit()),
            };

            // A failed spawn drops its stdin here, so the upstream stage sees
            // a closed pipe and winds down while the dropped pipeline waits on it.
            let mut child = spawn_stage(
                stage,
                StageIo {
                    stdin,
                    stdout,
                    stderr,
                },
            )?;

            if !is_last {
                previous_stdout = child.stdout.take();
            }
            pipeline.processes.push_back(StageProcess {
                stage: stage.clone(),
                child,
            });
        }

        Ok(pipeline)
    }

    /// Wait in start order; stop at the first failure.
    fn wait(mut self) -> ShellResult<()> {
        while let Some(mut process) = self.processes.pop_front() {
            let status = process.child.wait().map_err(|source| ShellError::Wait {
                command: process.stage.clone(),
                source,
            })?;
            debug!(stage = %process.stage, %status, "stage finished");
            if !status.success() {
                return Err(ShellError::ExitStatus {
                    command: process.stage,
                    status,
                });
            }
        }
        Ok(())
    }
}

impl Drop for RunningPipeline {
    fn drop(&mut self) {
        for mut process in self.processes.drain(..) {
            if let Err(e) = process.child.wait() {
                warn!(stage = %process.stage, error = %e, "failed to reap stage");
            }
        }
    }
}

/// Execute a pipeline of commands
///
/// Stage `i` feeds stage `i + 1` through an anonymous pipe; the last stage
/// writes to the redirection target if there is one, the terminal otherwise.
/// Standard error of the last stage follows its stdout into the target;
/// every other stage keeps the terminal.
pub fn execute_pipeline(stages: &[String], redirection: Option<&Redirection>) -> ShellResult<()> {
    if stages.is_empty() {
        return Ok(());
    }

    let sink = redirection.map(Redirection::open).transpose()?;

    RunningPipeline::start(stages, sink)?.wait()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_have_no_stages() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn stages_are_whitespace_normalized() {
        assert_eq!(
            tokenize("  ls   -la |  grep   foo\t| wc -l "),
            vec!["ls -la", "grep foo", "wc -l"]
        );
    }

    #[test]
    fn every_pipe_divides_stages() {
        assert_eq!(tokenize("a||b"), vec!["a", "", "b"]);
        assert_eq!(tokenize("echo 'x|y'"), vec!["echo 'x", "y'"]);
    }

    #[test]
    fn empty_pipeline_is_a_no_op() {
        assert!(execute_pipeline(&[], None).is_ok());
    }

    #[test]
    fn non_zero_exit_is_reported() {
        let err = execute_pipeline(&["false".to_string()], None).unwrap_err();
        assert!(matches!(err, ShellError::ExitStatus { ref command, .. } if command == "false"));
    }
}
