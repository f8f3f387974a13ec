use crate::errors::{ShellError, ShellResult};
use crate::pipeline::normalize_whitespace;
use std::fs::{File, OpenOptions};

/// Redirection mode (truncate or append)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectionMode {
    /// `>`: create if absent, truncate existing content
    Truncate,
    /// `>>`: create if absent, append
    Append,
}

impl RedirectionMode {
    pub fn token(self) -> &'static str {
        match self {
            RedirectionMode::Truncate => ">",
            RedirectionMode::Append => ">>",
        }
    }
}

/// Represents a redirection specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub file: String,
    pub mode: RedirectionMode,
}

impl Redirection {
    /// Open the target with create-if-absent semantics.
    pub fn open(&self) -> ShellResult<File> {
        if self.file.is_empty() {
            return Err(ShellError::MissingRedirectTarget);
        }
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(self.mode == RedirectionMode::Truncate)
            .append(self.mode == RedirectionMode::Append)
            .open(&self.file)
            .map_err(|source| ShellError::Redirection {
                path: self.file.clone(),
                source,
            })
    }

    /// Handle a stage that carries nothing but the redirection:
    /// `> f` empties the file, `>> f` only makes sure it exists.
    pub fn touch(&self) -> ShellResult<()> {
        self.open().map(drop)
    }
}

/// A stage split around its redirection operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStage {
    /// Command text left of the operator; empty for a redirection-only stage.
    pub command: String,
    pub redirection: Redirection,
}

impl ResolvedStage {
    pub fn is_redirection_only(&self) -> bool {
        self.command.is_empty()
    }
}

/// Detect `>>` or `>` in a stage and split it around the first occurrence.
/// `>>` is scanned for before `>`, so it is never read as two `>` tokens.
pub fn resolve_redirection(stage: &str) -> Option<ResolvedStage> {
    [RedirectionMode::Append, RedirectionMode::Truncate]
        .into_iter()
        .find_map(|mode| {
            let token = mode.token();
            stage.find(token).map(|at| ResolvedStage {
                command: normalize_whitespace(&stage[..at]),
                redirection: Redirection {
                    file: normalize_whitespace(&stage[at + token.len()..]),
                    mode,
                },
            })
        })
}
