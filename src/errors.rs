use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Comprehensive error type for shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command}: failed to wait: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command}: {status}")]
    ExitStatus { command: String, status: ExitStatus },

    #[error("cd: {path}: {source}")]
    InvalidDirectory {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Redirection {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("missing redirection target")]
    MissingRedirectTarget,

    #[error("alias: {0}")]
    InvalidAlias(String),

    #[error("empty pipeline stage")]
    EmptyStage,

    #[error("alias store {}: {source}", .path.display())]
    AliasStore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("alias store {}: {source}", .path.display())]
    AliasFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Terminal error: {0}")]
    Terminal(#[from] nix::Error),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
